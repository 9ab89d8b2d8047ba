//! Error types for ttsd

use std::io;
use thiserror::Error;

/// Main error type for ttsd
#[derive(Error, Debug)]
pub enum TtsdError {
    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Unknown voice: {0}")]
    UnknownVoice(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A blocking read was cut short by a signal (EINTR).
    ///
    /// Surfaced as its own variant so the daemon loop can consult the
    /// shutdown flag instead of treating the interruption as a stream
    /// failure.
    #[error("Interrupted by signal")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for ttsd operations
pub type Result<T> = std::result::Result<T, TtsdError>;

impl From<String> for TtsdError {
    fn from(s: String) -> Self {
        TtsdError::Other(s)
    }
}

impl From<&str> for TtsdError {
    fn from(s: &str) -> Self {
        TtsdError::Other(s.to_string())
    }
}
