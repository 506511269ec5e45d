/// Catalog document source: a local JSON file or a static `http(s)` URL.
///
/// A fetch reads the whole document once (capped at `max_bytes`) and records a
/// sha256 fingerprint so reloads can tell whether the content changed.
use std::fmt;
use std::num::{NonZeroU64, NonZeroUsize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use futures::StreamExt;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::CommonError;

pub const DEFAULT_MAX_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FetchLimits {
    pub max_bytes: usize,
    pub timeout: Duration,
}

impl FetchLimits {
    /// Optional:
    /// - `CATALOG_MAX_BYTES` (default: 16 MiB)
    /// - `CATALOG_FETCH_TIMEOUT_SECS` (default: 30)
    ///
    /// Both must be positive integers.
    pub fn from_env() -> Result<Self, CommonError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CommonError> {
        let max_bytes = parse_positive::<NonZeroUsize>(&lookup, "CATALOG_MAX_BYTES")?
            .map_or(DEFAULT_MAX_BYTES, NonZeroUsize::get);
        let timeout = parse_positive::<NonZeroU64>(&lookup, "CATALOG_FETCH_TIMEOUT_SECS")?
            .map_or(DEFAULT_TIMEOUT, |secs| Duration::from_secs(secs.get()));
        Ok(Self { max_bytes, timeout })
    }
}

fn parse_positive<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, CommonError> {
    match lookup(name) {
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            CommonError::Config(format!("{name} must be a positive integer, got {raw:?}"))
        }),
        None => Ok(None),
    }
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Raw catalog bytes plus their content fingerprint.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub bytes: Vec<u8>,
    pub fingerprint: String,
}

impl FetchedDocument {
    pub fn new(bytes: Vec<u8>) -> Self {
        let fingerprint = fingerprint(&bytes);
        Self { bytes, fingerprint }
    }

    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, CommonError> {
        Ok(serde_json::from_slice(&self.bytes)?)
    }
}

pub async fn fetch_document(
    source: &CatalogSource,
    limits: FetchLimits,
) -> Result<FetchedDocument, CommonError> {
    let bytes = match source {
        CatalogSource::File(path) => read_file(path, limits.max_bytes).await?,
        CatalogSource::Url(url) => read_url(url, limits).await?,
    };
    let document = FetchedDocument::new(bytes);
    info!(
        source = %source,
        bytes = document.bytes.len(),
        fingerprint = %document.fingerprint,
        "catalog document fetched"
    );
    Ok(document)
}

async fn read_file(path: &Path, max_bytes: usize) -> Result<Vec<u8>, CommonError> {
    let io_err = |source: std::io::Error| CommonError::Io {
        path: path.display().to_string(),
        source,
    };
    let metadata = tokio::fs::metadata(path).await.map_err(io_err)?;
    if metadata.len() > max_bytes as u64 {
        return Err(CommonError::TooLarge { limit: max_bytes });
    }
    tokio::fs::read(path).await.map_err(io_err)
}

async fn read_url(url: &str, limits: FetchLimits) -> Result<Vec<u8>, CommonError> {
    let http = reqwest::Client::builder()
        .user_agent("codex-common/catalog-fetch")
        .timeout(limits.timeout)
        .build()?;
    let resp = http.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(CommonError::Status {
            status,
            url: url.to_string(),
        });
    }

    let mut stream = resp.bytes_stream();
    let mut body = Vec::new();
    while let Some(next) = stream.next().await {
        let chunk = next?;
        if body.len() + chunk.len() > limits.max_bytes {
            return Err(CommonError::TooLarge {
                limit: limits.max_bytes,
            });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn fingerprint(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    format!("{:x}", hash)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parse_distinguishes_urls_from_paths() {
        assert_eq!(
            CatalogSource::parse("https://example.com/data.json"),
            CatalogSource::Url("https://example.com/data.json".to_string())
        );
        assert_eq!(
            CatalogSource::parse(" data/alchemy_data.json "),
            CatalogSource::File(PathBuf::from("data/alchemy_data.json"))
        );
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn limits_default_when_unset() {
        let limits = FetchLimits::from_lookup(lookup(&[])).expect("defaults");
        assert_eq!(limits.max_bytes, DEFAULT_MAX_BYTES);
        assert_eq!(limits.timeout, DEFAULT_TIMEOUT);

        let limits = FetchLimits::from_lookup(lookup(&[
            ("CATALOG_MAX_BYTES", " 1024 "),
            ("CATALOG_FETCH_TIMEOUT_SECS", "5"),
        ]))
        .expect("valid limits");
        assert_eq!(limits.max_bytes, 1024);
        assert_eq!(limits.timeout, Duration::from_secs(5));
    }

    #[test]
    fn limits_reject_zero_and_garbage() {
        for (name, value) in [
            ("CATALOG_MAX_BYTES", "0"),
            ("CATALOG_MAX_BYTES", "lots"),
            ("CATALOG_FETCH_TIMEOUT_SECS", "0"),
            ("CATALOG_FETCH_TIMEOUT_SECS", "-3"),
        ] {
            let err = FetchLimits::from_lookup(lookup(&[(name, value)])).unwrap_err();
            assert!(
                matches!(&err, CommonError::Config(message) if message.contains(name)),
                "{name}={value} gave {err:?}"
            );
        }
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = FetchedDocument::new(b"{\"a\":1}".to_vec());
        let b = FetchedDocument::new(b"{\"a\":1}".to_vec());
        let c = FetchedDocument::new(b"{\"a\":2}".to_vec());
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_ne!(a.fingerprint, c.fingerprint);
        assert_eq!(a.fingerprint.len(), 64);
    }

    #[tokio::test]
    async fn fetch_reads_local_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{\"effects\": {{}}}}").expect("write");
        let source = CatalogSource::File(file.path().to_path_buf());

        let doc = fetch_document(&source, FetchLimits::default())
            .await
            .expect("fetch should succeed");
        let value: serde_json::Value = doc.parse().expect("valid json");
        assert!(value.get("effects").is_some());
    }

    #[tokio::test]
    async fn fetch_rejects_oversized_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{}", "x".repeat(64)).expect("write");
        let source = CatalogSource::File(file.path().to_path_buf());
        let limits = FetchLimits {
            max_bytes: 16,
            ..FetchLimits::default()
        };

        let err = fetch_document(&source, limits).await.unwrap_err();
        assert!(matches!(err, CommonError::TooLarge { limit: 16 }));
    }

    #[tokio::test]
    async fn fetch_missing_file_is_io_error() {
        let source = CatalogSource::File(PathBuf::from("/nonexistent/codex/catalog.json"));
        let err = fetch_document(&source, FetchLimits::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CommonError::Io { .. }));
    }
}
