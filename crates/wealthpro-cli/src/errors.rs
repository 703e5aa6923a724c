//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes. Core errors reaching `main`
//! are classified the same way.

use std::fmt;

use wealthpro_core::CrmError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Client, task, item or config not found
    NotFound { message: String, hint: String },

    /// Missing or unusable configuration
    Config { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } | CliError::Config { message, hint } => {
                write!(f, "{}\nHint: {}", message, hint)
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn config(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::Config {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::Config { .. } => exit_codes::CONFIG,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

/// Exit code for any error that reached `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    match err.downcast_ref::<CrmError>() {
        Some(CrmError::NotFound(_)) => exit_codes::NOT_FOUND,
        Some(CrmError::InvalidInput(_)) | Some(CrmError::Validation(_)) => {
            exit_codes::INVALID_INPUT
        }
        Some(CrmError::Config(_)) => exit_codes::CONFIG,
        Some(CrmError::Http { .. }) | Some(CrmError::Remote { .. }) => exit_codes::REMOTE,
        _ => 1,
    }
}
