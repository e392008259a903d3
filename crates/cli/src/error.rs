//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Neither a CSV, a sheet id nor a config source was given
    #[error("No recipient source: pass --recipients, set SHEET_ID or add a [source] section")]
    NoRecipientSource,

    /// Signing needs both credentials
    #[error("Missing credential '{field}' (flag or environment)")]
    MissingCredential { field: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn missing_credential(field: impl Into<String>) -> Self {
        Self::MissingCredential {
            field: field.into(),
        }
    }
}
