//! Dispatcher error types

use contracts::TransportError;
use thiserror::Error;

/// Failure of a send or log-fetch stage
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Connection or timeout failure, no status received
    #[error("{message}")]
    Transport { message: String },

    /// Non-success HTTP status from the broadcast endpoint
    #[error("remote rejected request with status {status}: {detail}")]
    RemoteRejection {
        status: u16,
        raw_body: String,
        /// Body as compact JSON, or `{"raw": <text>}` when not JSON
        detail: String,
    },

    /// Success status but the body could not be understood
    #[error("malformed response (status {status}): {message}")]
    Malformed {
        status: u16,
        raw_body: String,
        message: String,
    },

    /// Payload could not be encoded
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl DispatchError {
    /// HTTP status, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRejection { status, .. } | Self::Malformed { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Encode(_) => None,
        }
    }

    /// Raw response body, if one was received
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::RemoteRejection { raw_body, .. } | Self::Malformed { raw_body, .. } => {
                Some(raw_body)
            }
            Self::Transport { .. } | Self::Encode(_) => None,
        }
    }

    /// Text stored in a result's `error` column
    pub fn detail(&self) -> String {
        match self {
            Self::RemoteRejection { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }

    /// Short label for logs and metrics
    pub fn class(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::RemoteRejection { .. } => "rejected",
            Self::Malformed { .. } => "malformed",
            Self::Encode(_) => "encode",
        }
    }
}

impl From<TransportError> for DispatchError {
    fn from(err: TransportError) -> Self {
        Self::Transport {
            message: err.message,
        }
    }
}
