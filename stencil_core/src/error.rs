use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContextError>;

/// Errors raised at the edges of the subsystem (loading policy files and data).
///
/// Name resolution itself never fails; a missing or blocked name is `None`.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Policy config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid policy config: {0}")]
    InvalidConfig(String),
}

impl From<String> for ContextError {
    fn from(s: String) -> Self {
        ContextError::InvalidConfig(s)
    }
}

impl From<&str> for ContextError {
    fn from(s: &str) -> Self {
        ContextError::InvalidConfig(s.to_string())
    }
}
