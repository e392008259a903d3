//! LogPoller - delayed, single-shot delivery log fetch

use std::sync::Arc;
use std::time::Duration;

use contracts::{ApiRequest, HttpMethod, HttpTransport};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::error::DispatchError;
use crate::signer::Signer;

/// Delivery log path for a broadcast
pub fn log_path(broadcast_id: &str) -> String {
    format!("/qontak/chat/v1/broadcasts/{broadcast_id}/whatsapp/log")
}

/// Log response, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOutcome {
    pub status_code: u16,
    pub raw_body: String,
}

/// Waits a fixed delay, then sends one signed GET.
///
/// A zero delay fetches immediately. Cancelling the token cuts the wait
/// short but the fetch still happens.
pub struct LogPoller<T> {
    transport: Arc<T>,
    signer: Signer,
    delay: Duration,
    cancel: CancellationToken,
}

impl<T> LogPoller<T>
where
    T: HttpTransport + Send + Sync,
{
    pub fn new(transport: Arc<T>, signer: Signer, delay: Duration) -> Self {
        Self {
            transport,
            signer,
            delay,
            cancel: CancellationToken::new(),
        }
    }

    /// Share a stop token so a pending wait can be interrupted
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Fetch the delivery log for `broadcast_id`
    ///
    /// # Errors
    /// Only `Transport`; every HTTP status is returned as a [`LogOutcome`]
    #[instrument(
        name = "log_poller_fetch",
        skip(self),
        fields(delay_ms = self.delay.as_millis() as u64)
    )]
    pub async fn fetch_log(&self, broadcast_id: &str) -> Result<LogOutcome, DispatchError> {
        self.wait().await;

        let path = log_path(broadcast_id);
        let request = ApiRequest {
            method: HttpMethod::Get,
            headers: self.signer.sign(HttpMethod::Get, &path),
            path,
            body: None,
        };

        let response = self.transport.execute(&request).await?;
        debug!(status = response.status, "Delivery log received");

        Ok(LogOutcome {
            status_code: response.status,
            raw_body: response.body,
        })
    }

    async fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }

        tokio::select! {
            _ = tokio::time::sleep(self.delay) => {}
            _ = self.cancel.cancelled() => {
                debug!("Log wait interrupted by stop request");
            }
        }
    }
}
