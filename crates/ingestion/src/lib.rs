//! # Ingestion
//!
//! Recipient table loading.
//!
//! Responsibilities:
//! - Read recipients from a local CSV file or a public Google Sheet
//! - Check the required columns (`to_number`, `to_name`) before any row is used
//! - Trim values and apply the optional row cap
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{load_recipients, apply_row_limit};
//!
//! let recipients = load_recipients(&source).await?;
//! let recipients = apply_row_limit(recipients, blueprint.run.row_limit());
//! ```

mod error;
mod reader;
mod sheet;

use contracts::{Recipient, SourceConfig};
use tracing::info;

pub use error::{IngestionError, Result};
pub use reader::{apply_row_limit, RecipientReader, REQUIRED_COLUMNS};
pub use sheet::{SheetSource, GOOGLE_SHEETS_BASE};

/// Rows shown by [`preview`] by default
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Load every recipient from the configured source
pub async fn load_recipients(source: &SourceConfig) -> Result<Vec<Recipient>> {
    let recipients = match source {
        SourceConfig::Csv { path } => RecipientReader::from_path(path)?,
        SourceConfig::GoogleSheet {
            sheet_id,
            sheet_name,
        } => SheetSource::new(sheet_id, sheet_name).fetch().await?,
    };

    info!(count = recipients.len(), "Recipients ingested");
    Ok(recipients)
}

/// First `rows` recipients, for display
pub fn preview(recipients: &[Recipient], rows: usize) -> &[Recipient] {
    &recipients[..recipients.len().min(rows)]
}
