use codex_common::source::{CatalogSource, FetchLimits};

use crate::error::AppError;

const DEFAULT_CATALOG: &str = "skyrim_commands_and_items.json";

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the command catalog document lives (file path or URL).
    pub catalog: CatalogSource,
    pub limits: FetchLimits,
    /// Serve MCP over TCP on this address instead of stdio.
    pub tcp_listen_addr: Option<String>,
}

impl Config {
    /// Optional:
    /// - `COMMAND_CODEX_CATALOG` (default: "skyrim_commands_and_items.json")
    /// - `CATALOG_MAX_BYTES`, `CATALOG_FETCH_TIMEOUT_SECS` (see `FetchLimits::from_env`)
    /// - `MCP_TCP_LISTEN_ADDR`
    pub fn from_env() -> Result<Self, AppError> {
        let catalog = std::env::var("COMMAND_CODEX_CATALOG")
            .unwrap_or_else(|_| DEFAULT_CATALOG.to_string());
        if catalog.trim().is_empty() {
            return Err(AppError::Config(
                "COMMAND_CODEX_CATALOG must not be empty".to_string(),
            ));
        }

        Ok(Self {
            catalog: CatalogSource::parse(&catalog),
            limits: FetchLimits::from_env()?,
            tcp_listen_addr: std::env::var("MCP_TCP_LISTEN_ADDR").ok(),
        })
    }
}
