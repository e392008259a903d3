//! ReqwestTransport - HTTPS transport with a bounded per-call timeout

use std::time::Duration;

use contracts::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, TransportError};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, DATE};
use tracing::{debug, instrument, warn};

/// Transport that talks to the real API
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    name: String,
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport for `base_url` (e.g. `https://api.mekari.com`)
    ///
    /// # Errors
    /// Returns an error if the underlying client cannot be built
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("qontak-broadcast/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            name: "https".to_string(),
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::timeout(format!(
                "request timed out after {}s: {err}",
                self.timeout.as_secs()
            ))
        } else if err.is_connect() {
            TransportError::connect(err.to_string())
        } else {
            TransportError::other(err.to_string())
        }
    }
}

impl HttpTransport for ReqwestTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "reqwest_transport_execute",
        skip(self, request),
        fields(method = %request.method, path = %request.path)
    )]
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url(&request.path);

        let builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        }
        .header(AUTHORIZATION, &request.headers.authorization)
        .header(DATE, &request.headers.date)
        .header(CONTENT_TYPE, "application/json");

        let builder = match &request.body {
            Some(body) => builder.body(body.clone()),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            self.classify(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        debug!(url = %url, status, response_len = body.len(), "HTTP response received");

        Ok(ApiResponse { status, body })
    }
}
