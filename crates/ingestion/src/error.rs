//! Ingestion error types

use thiserror::Error;

/// Recipient ingestion error
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Header row lacks required columns
    #[error("missing required columns: {}", missing.join(", "))]
    MissingColumns {
        /// Missing column names, in declaration order
        missing: Vec<String>,
    },

    /// CSV could not be parsed
    #[error("failed to parse recipients CSV: {0}")]
    Csv(#[from] csv::Error),

    /// File could not be read
    #[error("failed to read recipients file: {0}")]
    Io(#[from] std::io::Error),

    /// Remote sheet could not be downloaded
    #[error("failed to fetch sheet '{sheet}': {message}")]
    Fetch {
        /// Sheet identifier
        sheet: String,
        /// Error message
        message: String,
    },
}

impl IngestionError {
    pub fn fetch(sheet: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            sheet: sheet.into(),
            message: message.into(),
        }
    }
}

/// Ingestion Result type alias
pub type Result<T> = std::result::Result<T, IngestionError>;
