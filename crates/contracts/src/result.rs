//! BroadcastResult - one record per recipient

use serde::{Deserialize, Serialize};

use crate::Recipient;

/// Outcome of processing one recipient.
///
/// Optional fields stay `None` for stages that never ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResult {
    pub to_number: String,
    pub to_name: String,
    pub status_code: Option<u16>,
    pub broadcast_id: Option<String>,
    pub send_response: Option<String>,
    pub log_status_code: Option<u16>,
    pub log_response: Option<String>,
    pub error: Option<String>,
}

impl BroadcastResult {
    /// Empty result for a recipient that has not been sent yet
    pub fn pending(recipient: &Recipient) -> Self {
        Self {
            to_number: recipient.to_number.clone(),
            to_name: recipient.to_name.clone(),
            ..Default::default()
        }
    }
}

/// Final per-recipient delivery state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    /// Send accepted and log fetched
    Logged,
    /// Send accepted but no broadcast id returned
    SentNoId,
    /// Send failed (transport, rejection or malformed response)
    SendFailed,
    /// Send accepted but the log request itself failed in transport
    LogFailed,
}

impl DeliveryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Logged => "logged",
            Self::SentNoId => "sent_no_id",
            Self::SendFailed => "send_failed",
            Self::LogFailed => "log_failed",
        }
    }
}

impl std::fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
