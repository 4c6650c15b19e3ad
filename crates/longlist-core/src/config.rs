use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::universe::DEFAULT_UNIVERSE_SIZE;

/// Environment variable that overrides `client.server_url`.
pub const SERVER_URL_ENV: &str = "LONGLIST_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_universe_size")]
    pub universe_size: u32,
    #[serde(default = "default_limit")]
    pub default_limit: u64,
    #[serde(default = "default_max_limit")]
    pub max_limit: u64,
    /// Largest accepted request body. Unset means large enough for a full
    /// custom order plus a full selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_body_bytes: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            universe_size: default_universe_size(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            max_body_bytes: None,
        }
    }
}

/// Floor for the derived body limit, matching axum's own default.
const MIN_BODY_BYTES: usize = 2 * 1024 * 1024;
/// Budget per universe id: one id in `customOrder` and one in
/// `selectedItems`, each at most ten digits plus a separator.
const BODY_BYTES_PER_ITEM: usize = 24;

impl ServerConfig {
    /// Request body limit for the HTTP API.
    #[must_use]
    pub fn body_limit(&self) -> usize {
        self.max_body_bytes.unwrap_or_else(|| {
            usize::try_from(self.universe_size)
                .unwrap_or(usize::MAX)
                .saturating_mul(BODY_BYTES_PER_ITEM)
                .max(MIN_BODY_BYTES)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_limit")]
    pub page_size: u64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_near_bottom_margin")]
    pub near_bottom_margin: u32,
    #[serde(default = "default_restore_delay_ms")]
    pub restore_delay_ms: u64,
    /// Send note edits to the server's `itemEdits` instead of keeping them local.
    #[serde(default)]
    pub persist_notes: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            page_size: default_limit(),
            debounce_ms: default_debounce_ms(),
            near_bottom_margin: default_near_bottom_margin(),
            restore_delay_ms: default_restore_delay_ms(),
            persist_notes: false,
        }
    }
}

/// Default location of the user config file, if the platform has one.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("longlist/config.toml"))
}

/// Load a config file; a missing file yields the defaults.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve the effective config: explicit path, else the user config dir,
/// then apply environment overrides.
///
/// # Errors
///
/// Fails when the chosen config file exists but is unreadable or malformed,
/// or when an explicit path does not exist.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => {
            anyhow::ensure!(path.exists(), "config file {} does not exist", path.display());
            load_config_from(path)?
        }
        None => match default_config_path() {
            Some(path) => load_config_from(&path)?,
            None => Config::default(),
        },
    };

    apply_env_overrides(&mut config, env::var(SERVER_URL_ENV).ok());
    Ok(config)
}

fn apply_env_overrides(config: &mut Config, server_url: Option<String>) {
    if let Some(url) = server_url.filter(|url| !url.trim().is_empty()) {
        config.client.server_url = url.trim().to_string();
    }
}

fn default_listen() -> String {
    "127.0.0.1:3000".to_string()
}

const fn default_universe_size() -> u32 {
    DEFAULT_UNIVERSE_SIZE
}

const fn default_limit() -> u64 {
    crate::projector::DEFAULT_PAGE_LIMIT
}

const fn default_max_limit() -> u64 {
    500
}

fn default_server_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

const fn default_debounce_ms() -> u64 {
    300
}

const fn default_near_bottom_margin() -> u32 {
    20
}

const fn default_restore_delay_ms() -> u64 {
    100
}
