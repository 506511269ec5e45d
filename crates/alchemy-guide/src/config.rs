use codex_common::source::{CatalogSource, FetchLimits};

use crate::error::AppError;

const DEFAULT_CATALOG: &str = "alchemy_data.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: CatalogSource,
    pub limits: FetchLimits,
    pub tcp_listen_addr: Option<String>,
}

impl Config {
    /// Optional:
    /// - `ALCHEMY_GUIDE_CATALOG` (default: "alchemy_data.json"), path or URL
    /// - `CATALOG_MAX_BYTES`, `CATALOG_FETCH_TIMEOUT_SECS`
    /// - `MCP_TCP_LISTEN_ADDR`
    pub fn from_env() -> Result<Self, AppError> {
        let catalog = std::env::var("ALCHEMY_GUIDE_CATALOG")
            .unwrap_or_else(|_| DEFAULT_CATALOG.to_string());
        if catalog.trim().is_empty() {
            return Err(AppError::Config(
                "ALCHEMY_GUIDE_CATALOG must not be empty".to_string(),
            ));
        }

        Ok(Self {
            catalog: CatalogSource::parse(&catalog),
            limits: FetchLimits::from_env()?,
            tcp_listen_addr: std::env::var("MCP_TCP_LISTEN_ADDR").ok(),
        })
    }
}
