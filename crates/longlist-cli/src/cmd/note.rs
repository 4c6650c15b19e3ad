//! `longlist note`: store a note on an item.

use crate::cmd::{ServerArgs, request};
use crate::output::{OutputMode, render};
use clap::Args;
use longlist_client::ListApi;
use longlist_core::ItemId;
use longlist_core::config::ClientConfig;

#[derive(Args, Debug)]
pub struct NoteArgs {
    pub id: ItemId,

    /// Note text. Omit to clear the note.
    #[arg(default_value = "")]
    pub note: String,

    #[command(flatten)]
    pub server: ServerArgs,
}

pub fn run_note(args: &NoteArgs, config: &ClientConfig, output: OutputMode) -> anyhow::Result<()> {
    let client = args.server.client(config);
    let ack = request(output, client.save_note(args.id, &args.note))?;
    render(output, &ack, |ack, w| {
        let verb = if args.note.is_empty() { "cleared" } else { "saved" };
        writeln!(w, "{verb} note on {} (version {})", args.id, ack.version)
    })
}
