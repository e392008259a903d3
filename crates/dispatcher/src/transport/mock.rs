//! MockTransport - scripted in-memory transport for tests

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use contracts::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, SignedHeaders, TransportError};
use parking_lot::Mutex;

type Scripted = Result<ApiResponse, TransportError>;

/// Record of a call made to the mock transport
#[derive(Debug, Clone)]
pub struct MockCall {
    pub method: HttpMethod,
    pub path: String,
    pub headers: SignedHeaders,
    pub body: Option<String>,
}

/// Mock transport returning predetermined responses.
///
/// Responses are keyed by `"{METHOD} {path}"` and returned in FIFO order.
/// A key with no remaining responses falls back to the default response
/// (if set) or a transport error.
///
/// # Example
/// ```ignore
/// let mock = MockTransport::new();
/// mock.add_response(
///     "POST /qontak/chat/v1/broadcasts/whatsapp/direct",
///     Ok(ApiResponse::new(201, r#"{"data":{"id":"bc_1"}}"#)),
/// );
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, VecDeque<Scripted>>>>,
    fallback: Arc<Mutex<Option<Scripted>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a method and path
    pub fn add_response(&self, key: &str, response: Scripted) {
        self.responses
            .lock()
            .entry(key.to_string())
            .or_default()
            .push_back(response);
    }

    /// Response used when nothing is queued for a key
    pub fn set_fallback(&self, response: Scripted) {
        *self.fallback.lock() = Some(response);
    }

    /// All calls made so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn next_response(&self, key: &str) -> Scripted {
        if let Some(response) = self
            .responses
            .lock()
            .get_mut(key)
            .and_then(VecDeque::pop_front)
        {
            return response;
        }

        self.fallback
            .lock()
            .clone()
            .unwrap_or_else(|| Err(TransportError::other(format!("no mock response for {key}"))))
    }
}

impl HttpTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls.lock().push(MockCall {
            method: request.method,
            path: request.path.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
        });

        let key = format!("{} {}", request.method, request.path);
        self.next_response(&key)
    }
}
