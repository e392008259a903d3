//! BatchRunner - sequential send/poll over a recipient list

use std::sync::Arc;
use std::time::{Duration, Instant};

use contracts::{
    BroadcastResult, Credentials, DeliveryState, HttpTransport, ProgressCallback, ProgressEvent,
    Recipient, TemplateConfig,
};
use dispatcher::{Dispatcher, LogPoller, MessageRequestBuilder, Signer};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::preflight::check_preconditions;

/// State of one batch run, returned to the caller
#[derive(Debug, Clone, Default)]
pub struct BatchRun {
    /// One per processed recipient, input order
    pub results: Vec<BroadcastResult>,
    /// Final state per result
    pub states: Vec<DeliveryState>,
    /// Send round-trip per result, milliseconds
    pub send_latencies_ms: Vec<f64>,
    /// Recipients processed so far
    pub progress: usize,
    pub total: usize,
    /// Every recipient was processed
    pub completed: bool,
    /// Stopped before the end
    pub cancelled: bool,
}

impl BatchRun {
    fn new(total: usize) -> Self {
        Self {
            results: Vec::with_capacity(total),
            states: Vec::with_capacity(total),
            send_latencies_ms: Vec::with_capacity(total),
            total,
            ..Default::default()
        }
    }

    /// Completed share in 0.0..=1.0 (1.0 for an empty run)
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.progress as f64 / self.total as f64
        }
    }

    /// Results whose final state is `state`
    pub fn count(&self, state: DeliveryState) -> usize {
        self.states.iter().filter(|s| **s == state).count()
    }
}

/// Drives Signer → MessageRequestBuilder → Dispatcher → LogPoller for each
/// recipient, one at a time.
///
/// A failure is recorded in that recipient's result and the run moves on.
/// The stop token is checked between recipients and also cuts a pending
/// log wait short.
pub struct BatchRunner<T> {
    dispatcher: Dispatcher<T>,
    poller: LogPoller<T>,
    template: TemplateConfig,
    progress: Option<ProgressCallback>,
    cancel: CancellationToken,
}

impl<T> BatchRunner<T>
where
    T: HttpTransport + Send + Sync,
{
    /// Build a runner after checking preconditions
    ///
    /// # Errors
    /// `MissingRequired` when a credential, the template id or the channel id
    /// is blank. Nothing has been sent at that point.
    pub fn new(
        transport: Arc<T>,
        credentials: Credentials,
        template: TemplateConfig,
        log_delay: Duration,
    ) -> Result<Self> {
        check_preconditions(&credentials, &template)?;

        let signer = Signer::new(credentials);
        let cancel = CancellationToken::new();

        Ok(Self {
            dispatcher: Dispatcher::new(transport.clone(), signer.clone()),
            poller: LogPoller::new(transport, signer, log_delay).with_cancellation(cancel.clone()),
            template,
            progress: None,
            cancel,
        })
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Use an externally owned stop token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.poller = self.poller.with_cancellation(cancel.clone());
        self.cancel = cancel;
        self
    }

    /// Process every recipient in order
    #[instrument(
        name = "batch_run",
        skip(self, recipients),
        fields(total = recipients.len(), delay_ms = self.poller.delay().as_millis() as u64)
    )]
    pub async fn run(&self, recipients: &[Recipient]) -> BatchRun {
        let started = Instant::now();
        let total = recipients.len();
        let mut run = BatchRun::new(total);

        info!("Batch started");

        for (idx, recipient) in recipients.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!(processed = run.progress, "Stop requested, ending batch early");
                run.cancelled = true;
                break;
            }

            let position = idx + 1;
            self.emit(&ProgressEvent::Sending {
                position,
                total,
                to_name: recipient.to_name.clone(),
                to_number: recipient.to_number.clone(),
            });

            let (result, state, latency_ms) = self.process(recipient).await;
            observability::record_recipient(state);

            run.results.push(result);
            run.states.push(state);
            run.send_latencies_ms.push(latency_ms);
            run.progress = position;
            observability::record_batch_progress(run.progress, total);

            self.emit(&ProgressEvent::Completed {
                position,
                total,
                fraction: run.fraction(),
            });
        }

        run.completed = !run.cancelled;
        observability::record_batch_duration(started.elapsed().as_secs_f64());
        info!(
            processed = run.progress,
            cancelled = run.cancelled,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch finished"
        );

        self.emit(&ProgressEvent::Finished {
            processed: run.progress,
            cancelled: run.cancelled,
        });

        run
    }

    /// Send, then fetch the log when an id came back
    async fn process(&self, recipient: &Recipient) -> (BroadcastResult, DeliveryState, f64) {
        let mut result = BroadcastResult::pending(recipient);
        let payload = MessageRequestBuilder::build(recipient, &self.template);

        let sent_at = Instant::now();
        let send = self.dispatcher.send(&payload).await;
        let latency_ms = sent_at.elapsed().as_secs_f64() * 1000.0;

        let outcome = match send {
            Ok(outcome) => {
                observability::record_send("accepted", latency_ms);
                outcome
            }
            Err(e) => {
                observability::record_send(e.class(), latency_ms);
                result.status_code = e.status();
                result.send_response = e.raw_body().map(str::to_string);
                result.error = Some(e.detail());
                return (result, DeliveryState::SendFailed, latency_ms);
            }
        };

        result.status_code = Some(outcome.status_code);
        result.send_response = Some(outcome.raw_body);
        result.broadcast_id = outcome.broadcast_id.clone();

        let Some(broadcast_id) = outcome.broadcast_id else {
            debug!(to_number = %recipient.to_number, "Accepted without broadcast id, skipping log");
            return (result, DeliveryState::SentNoId, latency_ms);
        };

        match self.poller.fetch_log(&broadcast_id).await {
            Ok(log) => {
                observability::record_log_fetch(Some(log.status_code));
                result.log_status_code = Some(log.status_code);
                result.log_response = Some(log.raw_body);
                (result, DeliveryState::Logged, latency_ms)
            }
            Err(e) => {
                observability::record_log_fetch(None);
                warn!(broadcast_id = %broadcast_id, error = %e, "Log fetch failed");
                result.error = Some(e.detail());
                (result, DeliveryState::LogFailed, latency_ms)
            }
        }
    }

    fn emit(&self, event: &ProgressEvent) {
        if let Some(callback) = &self.progress {
            callback(event);
        }
    }
}
