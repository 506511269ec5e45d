use codex_common::error::CommonError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("config error: {0}")]
    Config(String),

    #[error("unknown effect category: {0} (expected all, beneficial or harmful)")]
    UnknownCategory(String),
}
