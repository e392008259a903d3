//! Public Google Sheet source, exported as CSV

use std::time::Duration;

use contracts::Recipient;
use reqwest::Url;
use tracing::{debug, instrument};

use crate::error::{IngestionError, Result};
use crate::reader::RecipientReader;

/// Public Google Sheets host
pub const GOOGLE_SHEETS_BASE: &str = "https://docs.google.com";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads one sheet tab through the gviz CSV export
#[derive(Debug, Clone)]
pub struct SheetSource {
    sheet_id: String,
    sheet_name: String,
    base_url: String,
}

impl SheetSource {
    pub fn new(sheet_id: impl Into<String>, sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            sheet_name: sheet_name.into(),
            base_url: GOOGLE_SHEETS_BASE.to_string(),
        }
    }

    /// Point at another host (mirrors, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// `{base}/spreadsheets/d/{id}/gviz/tq?tqx=out:csv&sheet={name}`
    pub fn export_url(&self) -> Result<Url> {
        let raw = format!(
            "{}/spreadsheets/d/{}/gviz/tq",
            self.base_url,
            self.sheet_id.trim()
        );
        Url::parse_with_params(&raw, &[("tqx", "out:csv"), ("sheet", self.sheet_name.as_str())])
            .map_err(|e| IngestionError::fetch(&self.sheet_id, format!("invalid export URL: {e}")))
    }

    /// Download the tab and read its recipients
    #[instrument(name = "sheet_source_fetch", skip(self), fields(sheet_id = %self.sheet_id, sheet_name = %self.sheet_name))]
    pub async fn fetch(&self) -> Result<Vec<Recipient>> {
        let url = self.export_url()?;
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| IngestionError::fetch(&self.sheet_id, e.to_string()))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| IngestionError::fetch(&self.sheet_id, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestionError::fetch(
                &self.sheet_id,
                format!("unexpected status {status}"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| IngestionError::fetch(&self.sheet_id, e.to_string()))?;
        debug!(bytes = body.len(), "Sheet export downloaded");

        RecipientReader::from_reader(body.as_ref())
    }
}
