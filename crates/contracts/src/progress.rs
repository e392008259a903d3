//! Progress notifications emitted by the batch runner.

use std::sync::Arc;

/// Progress callback type
///
/// Called synchronously on the batch worker; keep it cheap.
pub type ProgressCallback = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Batch progress event
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// About to send to a recipient (1-based position)
    Sending {
        position: usize,
        total: usize,
        to_name: String,
        to_number: String,
    },
    /// Recipient finished
    Completed {
        position: usize,
        total: usize,
        fraction: f64,
    },
    /// Run ended
    Finished { processed: usize, cancelled: bool },
}

impl ProgressEvent {
    /// Human-readable line for the event
    pub fn message(&self) -> String {
        match self {
            Self::Sending {
                position,
                total,
                to_name,
                to_number,
            } => format!("Sending to {to_name} ({to_number}) [{position}/{total}] ..."),
            Self::Completed {
                position,
                total,
                fraction,
            } => format!("[{position}/{total}] {:.0}%", fraction * 100.0),
            Self::Finished {
                processed,
                cancelled: false,
            } => format!("Done. {processed} recipients processed."),
            Self::Finished {
                processed,
                cancelled: true,
            } => format!("Stopped after {processed} recipients."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sending_message() {
        let event = ProgressEvent::Sending {
            position: 2,
            total: 5,
            to_name: "Budi".to_string(),
            to_number: "62812".to_string(),
        };
        assert_eq!(event.message(), "Sending to Budi (62812) [2/5] ...");
    }

    #[test]
    fn test_completed_message() {
        let event = ProgressEvent::Completed {
            position: 1,
            total: 4,
            fraction: 0.25,
        };
        assert_eq!(event.message(), "[1/4] 25%");
    }
}
