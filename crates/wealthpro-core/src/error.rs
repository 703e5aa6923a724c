//! Error types for WealthPro core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.

use thiserror::Error;

/// Result type alias for WealthPro operations.
pub type Result<T> = std::result::Result<T, CrmError>;

/// Core error type for WealthPro operations.
#[derive(Debug, Error)]
pub enum CrmError {
    /// Missing or invalid configuration (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure talking to the remote drive
    #[error("Drive request failed during {operation}: {source}")]
    Http {
        operation: &'static str,
        #[source]
        source: ureq::Error,
    },

    /// The remote drive answered with something we could not use
    #[error("Drive {operation} failed: {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },

    /// Local storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}

impl CrmError {
    /// Wrap a transport error with the facade operation that produced it.
    pub fn http(operation: &'static str, source: ureq::Error) -> Self {
        CrmError::Http { operation, source }
    }

    /// Build a remote error for an unusable response.
    pub fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        CrmError::Remote {
            operation,
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CrmError {
    fn from(err: std::io::Error) -> Self {
        CrmError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CrmError {
    fn from(err: serde_json::Error) -> Self {
        CrmError::Validation(err.to_string())
    }
}

impl From<rusqlite::Error> for CrmError {
    fn from(err: rusqlite::Error) -> Self {
        CrmError::Storage(format!("SQLite error: {}", err))
    }
}
