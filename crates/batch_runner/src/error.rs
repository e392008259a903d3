//! Batch error types

use thiserror::Error;

/// Run-level failure. Per-recipient failures never surface here.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Precondition not met, nothing was sent
    #[error("missing required value '{field}'")]
    MissingRequired { field: String },

    /// Result table could not be written
    #[error("failed to write results: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BatchError {
    pub fn missing_required(field: impl Into<String>) -> Self {
        Self::MissingRequired {
            field: field.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BatchError>;
