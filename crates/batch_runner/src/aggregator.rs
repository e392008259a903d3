//! ResultAggregator - results to an exportable CSV table

use std::fs::File;
use std::io::Write;
use std::path::Path;

use contracts::BroadcastResult;
use tracing::info;

use crate::error::{BatchError, Result};

/// Output column order
pub const COLUMNS: [&str; 8] = [
    "to_number",
    "to_name",
    "status_code",
    "broadcast_id",
    "send_response",
    "log_status_code",
    "log_response",
    "error",
];

/// Default results file name for a run started at `unix_ts`
pub fn default_file_name(unix_ts: u64) -> String {
    format!("broadcast_results_{unix_ts}.csv")
}

/// One row per result, absent values as empty cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<[String; 8]>,
}

/// Build the table, preserving result order
pub fn to_table(results: &[BroadcastResult]) -> ResultTable {
    ResultTable {
        rows: results.iter().map(row).collect(),
    }
}

fn row(result: &BroadcastResult) -> [String; 8] {
    let opt = |value: &Option<String>| value.clone().unwrap_or_default();
    let code = |value: Option<u16>| value.map(|c| c.to_string()).unwrap_or_default();

    [
        result.to_number.clone(),
        result.to_name.clone(),
        code(result.status_code),
        opt(&result.broadcast_id),
        opt(&result.send_response),
        code(result.log_status_code),
        opt(&result.log_response),
        opt(&result.error),
    ]
}

impl ResultTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[[String; 8]] {
        &self.rows
    }

    /// Header row then data rows, RFC 4180 quoting
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(COLUMNS)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| BatchError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    /// Write to `path`, replacing any existing file
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(file)?;
        info!(path = %path.display(), rows = self.rows.len(), "Results written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Recipient;

    fn logged() -> BroadcastResult {
        BroadcastResult {
            status_code: Some(201),
            broadcast_id: Some("bc_1".into()),
            send_response: Some(r#"{"data":{"id":"bc_1"}}"#.into()),
            log_status_code: Some(200),
            log_response: Some(r#"{"data":[]}"#.into()),
            ..BroadcastResult::pending(&Recipient::new("62811", "Budi"))
        }
    }

    fn failed() -> BroadcastResult {
        BroadcastResult {
            error: Some("connection refused".into()),
            ..BroadcastResult::pending(&Recipient::new("62822", "Sari, S.Kom"))
        }
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(default_file_name(1700000000), "broadcast_results_1700000000.csv");
    }

    #[test]
    fn test_rows_follow_column_order() {
        let table = to_table(&[logged(), failed()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][2], "201");
        assert_eq!(table.rows()[0][3], "bc_1");
        assert_eq!(table.rows()[0][5], "200");
        assert_eq!(table.rows()[1][2], "");
        assert_eq!(table.rows()[1][7], "connection refused");
    }

    #[test]
    fn test_csv_output_quotes_fields() {
        let csv = to_table(&[logged(), failed()]).to_csv_string().unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("to_number,to_name,status_code,broadcast_id,send_response,log_status_code,log_response,error")
        );
        assert_eq!(
            lines.next(),
            Some(r#"62811,Budi,201,bc_1,"{""data"":{""id"":""bc_1""}}",200,"{""data"":[]}","#)
        );
        assert_eq!(lines.next(), Some(r#"62822,"Sari, S.Kom",,,,,,connection refused"#));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_table_has_header() {
        let table = to_table(&[]);
        assert!(table.is_empty());
        assert_eq!(table.to_csv_string().unwrap().lines().count(), 1);
    }

    #[test]
    fn test_write_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(default_file_name(1));
        to_table(&[logged()]).write_to_path(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("to_number,"));
        assert!(content.contains("bc_1"));
    }
}
