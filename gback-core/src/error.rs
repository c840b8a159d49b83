//! Error types for gback.

use thiserror::Error;

/// Errors that can occur in gback operations.
#[derive(Error, Debug)]
pub enum GbackError {
    /// Missing or malformed client-secret file.
    #[error("Could not read {path}: {reason}")]
    Config { path: String, reason: String },

    #[error("{0} is not a known calendar.")]
    CalendarNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Calendar API request failed: {0}")]
    Transport(String),

    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GbackError {
    pub fn config(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        GbackError::Config {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for gback operations.
pub type GbackResult<T> = Result<T, GbackError>;
