//! HttpTransport trait - Dispatcher / LogPoller network seam
//!
//! Signing happens before the transport; a transport only moves bytes and
//! reports either an HTTP response (any status) or a transport failure.

use std::fmt;
use thiserror::Error;

/// HTTP method used by the broadcast API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Method token as it appears in the request line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headers produced by the signer.
///
/// `date` must be sent verbatim, the signature is only valid for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub authorization: String,
    pub date: String,
}

/// A signed request, relative to the transport's base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path without host, e.g. `/qontak/chat/v1/broadcasts/whatsapp/direct`
    pub path: String,
    pub headers: SignedHeaders,
    /// JSON body (POST only)
    pub body: Option<String>,
}

/// Raw HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Transport-level failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Other,
}

/// Connection / timeout failure. No HTTP status was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Other, message)
    }
}

/// Network transport trait
///
/// Implementations perform exactly one request per call and never retry.
#[trait_variant::make(HttpTransport: Send)]
pub trait LocalHttpTransport {
    /// Transport name (used for logging)
    fn name(&self) -> &str;

    /// Execute one signed request
    ///
    /// # Errors
    /// Returns [`TransportError`] when no HTTP response was received
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}
