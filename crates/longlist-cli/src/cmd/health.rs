//! `longlist health`: check that a server is up.

use crate::cmd::{ServerArgs, request};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use clap::Args;
use longlist_client::ListApi;
use longlist_core::config::ClientConfig;

#[derive(Args, Debug)]
pub struct HealthArgs {
    #[command(flatten)]
    pub server: ServerArgs,
}

pub fn run_health(
    args: &HealthArgs,
    config: &ClientConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let client = args.server.client(config);
    let health = request(output, client.health())?;
    let url = client.base_url().to_owned();
    render_mode(
        output,
        &health,
        |h, w| writeln!(w, "{}\t{}\t{}", h.status, h.universe, h.version),
        |h, w| {
            pretty_section(w, &format!("Server {url}"))?;
            pretty_kv(w, "status", &h.status)?;
            pretty_kv(w, "universe", h.universe.to_string())?;
            pretty_kv(w, "version", h.version.to_string())
        },
    )
}
