//! `longlist browse`: interactive infinite-scroll list.

use clap::Args;
use longlist_client::SessionSettings;
use longlist_core::config::ClientConfig;

use crate::cmd::ServerArgs;
use crate::tui;

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Rows fetched per page. Defaults to `client.page_size`.
    #[arg(long, value_name = "N")]
    pub page_size: Option<u64>,

    /// Send note edits to the server instead of keeping them in this session.
    #[arg(long)]
    pub persist_notes: bool,

    #[command(flatten)]
    pub server: ServerArgs,
}

impl BrowseArgs {
    fn settings(&self, config: &ClientConfig) -> SessionSettings {
        let mut settings = SessionSettings::from(config);
        if let Some(page_size) = self.page_size {
            settings.page_size = page_size;
        }
        settings.persist_notes |= self.persist_notes;
        settings
    }
}

pub fn run_browse(args: &BrowseArgs, config: &ClientConfig) -> anyhow::Result<()> {
    let client = args.server.client(config);
    tui::browse::run_browse_tui(client, args.settings(config))
}
