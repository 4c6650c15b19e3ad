//! `longlist select`: check or uncheck items.

use crate::cmd::{ServerArgs, request};
use crate::output::{OutputMode, render};
use clap::Args;
use longlist_client::ListApi;
use longlist_core::ItemId;
use longlist_core::config::ClientConfig;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Item ids to change.
    #[arg(required = true, value_name = "ID")]
    pub ids: Vec<ItemId>,

    /// Uncheck instead of check.
    #[arg(long)]
    pub off: bool,

    #[command(flatten)]
    pub server: ServerArgs,
}

#[derive(Debug, Serialize)]
pub struct SelectResult {
    pub id: ItemId,
    pub selected: bool,
    pub version: u64,
}

pub fn run_select(
    args: &SelectArgs,
    config: &ClientConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let client = args.server.client(config);
    let selected = !args.off;
    let mut results = Vec::with_capacity(args.ids.len());
    for &id in &args.ids {
        let ack = request(output, client.set_selected(id, selected))?;
        results.push(SelectResult {
            id,
            selected,
            version: ack.version,
        });
    }

    render(output, &results, |results, w| {
        let verb = if selected { "selected" } else { "unselected" };
        for result in results {
            writeln!(w, "{verb} {} (version {})", result.id, result.version)?;
        }
        Ok(())
    })
}
