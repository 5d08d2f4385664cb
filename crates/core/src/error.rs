use crate::state::SourceId;
use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("{0} is not connected")]
    NotConnected(SourceId),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = ScopeError> = std::result::Result<T, E>;
