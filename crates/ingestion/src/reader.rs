//! CSV recipient reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use contracts::Recipient;
use tracing::{debug, instrument};

use crate::error::{IngestionError, Result};

/// Columns every recipient table must have
pub const REQUIRED_COLUMNS: [&str; 2] = ["to_number", "to_name"];

/// Reads recipients from CSV with a header row.
///
/// Extra columns are ignored, values are trimmed, short rows read missing
/// cells as empty strings.
pub struct RecipientReader;

impl RecipientReader {
    /// Read recipients from a CSV file
    #[instrument(name = "recipient_reader_from_path", skip(path), fields(path = %path.display()))]
    pub fn from_path(path: &Path) -> Result<Vec<Recipient>> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Read recipients from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Recipient>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let [number_idx, name_idx] = Self::locate_columns(&headers)?;

        let mut recipients = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            recipients.push(Recipient::new(
                record.get(number_idx).unwrap_or_default(),
                record.get(name_idx).unwrap_or_default(),
            ));
        }

        debug!(rows = recipients.len(), "Recipients loaded");
        Ok(recipients)
    }

    fn locate_columns(headers: &csv::StringRecord) -> Result<[usize; 2]> {
        let position = |column: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == column)
        };

        let found = REQUIRED_COLUMNS.map(position);
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .zip(found.iter())
            .filter(|(_, idx)| idx.is_none())
            .map(|(column, _)| column.to_string())
            .collect();

        match found {
            [Some(number), Some(name)] => Ok([number, name]),
            _ => Err(IngestionError::MissingColumns { missing }),
        }
    }
}

/// Keep only the first `limit` rows (`None` keeps all)
pub fn apply_row_limit(mut recipients: Vec<Recipient>, limit: Option<usize>) -> Vec<Recipient> {
    if let Some(limit) = limit {
        recipients.truncate(limit);
    }
    recipients
}
