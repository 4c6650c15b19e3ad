pub mod browse;
pub mod completions;
pub mod health;
pub mod items;
pub mod move_cmd;
pub mod note;
pub mod select;
pub mod serve;
pub mod state;

use clap::Args;
use longlist_client::{ClientError, HttpClient};
use longlist_core::config::ClientConfig;

use crate::output::{CliError, OutputMode, render_error};

/// Where client commands find the server.
#[derive(Args, Debug, Clone, Default)]
pub struct ServerArgs {
    /// Base URL of a running `longlist serve` (overrides config and `LONGLIST_URL`).
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,
}

impl ServerArgs {
    pub fn url<'a>(&'a self, config: &'a ClientConfig) -> &'a str {
        self.server.as_deref().unwrap_or(&config.server_url)
    }

    pub fn client(&self, config: &ClientConfig) -> HttpClient {
        HttpClient::new(self.url(config))
    }
}

/// Unwrap a client result, reporting the failure in the active output mode.
pub fn request<T>(output: OutputMode, result: Result<T, ClientError>) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_flag_overrides_config() {
        let config = ClientConfig::default();
        let args = ServerArgs {
            server: Some("http://10.0.0.2:8080".into()),
        };
        assert_eq!(args.url(&config), "http://10.0.0.2:8080");
        assert_eq!(ServerArgs::default().url(&config), config.server_url);
    }
}
