//! Dispatcher - signed broadcast creation

use std::sync::Arc;

use contracts::{ApiRequest, ApiResponse, BroadcastPayload, HttpMethod, HttpTransport};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use crate::error::DispatchError;
use crate::signer::Signer;
use crate::status::StatusClass;

/// Direct WhatsApp broadcast creation path
pub const BROADCAST_DIRECT_PATH: &str = "/qontak/chat/v1/broadcasts/whatsapp/direct";

/// Accepted send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub status_code: u16,
    pub raw_body: String,
    /// `data.id` from the response, when present
    pub broadcast_id: Option<String>,
}

/// Sends one signed POST per call, never retries
pub struct Dispatcher<T> {
    transport: Arc<T>,
    signer: Signer,
}

impl<T> Dispatcher<T>
where
    T: HttpTransport + Send + Sync,
{
    pub fn new(transport: Arc<T>, signer: Signer) -> Self {
        Self { transport, signer }
    }

    /// Create a broadcast for one payload
    ///
    /// # Errors
    /// - `Transport` when no response arrived
    /// - `RemoteRejection` for any status other than 200/201/202
    /// - `Malformed` when a success body is not JSON
    #[instrument(
        name = "dispatcher_send",
        skip(self, payload),
        fields(transport = self.transport.name(), to_number = %payload.to_number)
    )]
    pub async fn send(&self, payload: &BroadcastPayload) -> Result<SendOutcome, DispatchError> {
        let body = serde_json::to_string(payload)?;
        let request = ApiRequest {
            method: HttpMethod::Post,
            path: BROADCAST_DIRECT_PATH.to_string(),
            headers: self.signer.sign(HttpMethod::Post, BROADCAST_DIRECT_PATH),
            body: Some(body),
        };

        let response = self.transport.execute(&request).await?;
        debug!(status = response.status, "Broadcast response received");

        interpret_send_response(response).inspect_err(|e| {
            warn!(class = e.class(), status = ?e.status(), "Broadcast not accepted");
        })
    }
}

/// Classify a broadcast creation response
pub fn interpret_send_response(response: ApiResponse) -> Result<SendOutcome, DispatchError> {
    let ApiResponse { status, body } = response;

    match StatusClass::of(status) {
        StatusClass::Success => {
            let value: Value = match serde_json::from_str(&body) {
                Ok(value) => value,
                Err(e) => {
                    return Err(DispatchError::Malformed {
                        status,
                        raw_body: body,
                        message: format!("response is not valid JSON: {e}"),
                    })
                }
            };

            Ok(SendOutcome {
                status_code: status,
                broadcast_id: extract_broadcast_id(&value),
                raw_body: body,
            })
        }
        StatusClass::Rejected => Err(DispatchError::RemoteRejection {
            status,
            detail: rejection_detail(&body),
            raw_body: body,
        }),
    }
}

/// `data.id` as a string; numeric ids are rendered, the empty string is ignored
fn extract_broadcast_id(value: &Value) -> Option<String> {
    match value.get("data")?.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Compact JSON of the error body in its own key order, or `{"raw": <text>}`
fn rejection_detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => value.to_string(),
        Err(_) => json!({ "raw": body }).to_string(),
    }
}
