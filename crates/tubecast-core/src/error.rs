//! Error types for Tubecast.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TubecastError>;

/// Errors raised by Tubecast collaborators.
#[derive(Debug, Error)]
pub enum TubecastError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Network failure, timeout, or an unparseable response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered, but not with something we accept.
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Template error: {0}")]
    Template(String),
}
