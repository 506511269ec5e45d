/// Error types shared across the codex servers.
///
/// These cover fetching and parsing the static catalog document. Server-specific
/// errors (unknown categories, builder misuse) live in each server crate and wrap
/// `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("catalog fetch returned status {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("catalog document exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog is still loading")]
    Loading,

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}
