//! `longlist serve`: run the HTTP API.

use std::io::Write;

use anyhow::Context;
use clap::Args;
use longlist_core::config::ServerConfig;
use serde::Serialize;

use crate::output::{OutputMode, render};
use crate::server::Server;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on. Port 0 picks a free port.
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<String>,

    /// Number of items in the list.
    #[arg(long, value_name = "N")]
    pub universe: Option<u32>,
}

impl ServeArgs {
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(listen) = &self.listen {
            listen.clone_into(&mut config.listen);
        }
        if let Some(universe) = self.universe {
            config.universe_size = universe;
        }
    }
}

#[derive(Debug, Serialize)]
struct Listening {
    url: String,
}

/// Bind, announce the bound URL on stdout, then serve until Ctrl-C.
pub fn run_serve(args: &ServeArgs, config: &ServerConfig, output: OutputMode) -> anyhow::Result<()> {
    let mut config = config.clone();
    args.apply(&mut config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    runtime.block_on(async move {
        let server = Server::bind(&config).await?;
        let listening = Listening {
            url: format!("http://{}", server.local_addr()?),
        };
        render(output, &listening, |l, w| {
            writeln!(w, "listening on {}", l.url)?;
            w.flush()
        })?;
        std::io::stdout().flush()?;
        server.run().await
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = ServeArgs {
            listen: Some("0.0.0.0:8080".into()),
            universe: Some(50),
        };
        let mut config = ServerConfig::default();
        args.apply(&mut config);
        assert_eq!(config.listen, "0.0.0.0:8080");
        assert_eq!(config.universe_size, 50);
        assert_eq!(config.max_limit, 500);
    }
}
