//! `longlist move`: drop one item onto another.

use crate::cmd::{ServerArgs, request};
use crate::output::{OutputMode, render};
use clap::Args;
use longlist_client::ListApi;
use longlist_core::ItemId;
use longlist_core::config::ClientConfig;

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Item being dragged.
    pub source: ItemId,

    /// Item it is dropped onto. The source takes this item's position.
    pub target: ItemId,

    #[command(flatten)]
    pub server: ServerArgs,
}

pub fn run_move(args: &MoveArgs, config: &ClientConfig, output: OutputMode) -> anyhow::Result<()> {
    let client = args.server.client(config);
    let ack = request(output, client.move_item(args.source, args.target))?;
    render(output, &ack, |ack, w| {
        if ack.moved {
            writeln!(
                w,
                "moved {} onto {} (version {})",
                args.source, args.target, ack.version
            )
        } else {
            writeln!(w, "nothing moved (version {})", ack.version)
        }
    })
}
