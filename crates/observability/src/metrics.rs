//! Broadcast metrics
//!
//! Prometheus-facing counters/histograms plus an in-memory aggregator for
//! the end-of-run report.

use std::collections::BTreeMap;

use contracts::DeliveryState;
use metrics::{counter, gauge, histogram};

/// Record one broadcast creation attempt
///
/// `class` is `accepted` or a dispatch error class
/// (`transport`, `rejected`, `malformed`, `encode`).
pub fn record_send(class: &str, latency_ms: f64) {
    counter!("broadcaster_sends_total", "class" => class.to_string()).increment(1);
    histogram!("broadcaster_send_latency_ms").record(latency_ms);
}

/// Record one delivery log fetch, `None` when no response arrived
pub fn record_log_fetch(status_code: Option<u16>) {
    let status = match status_code {
        Some(code) => code.to_string(),
        None => "transport_error".to_string(),
    };
    counter!("broadcaster_log_fetches_total", "status" => status).increment(1);
}

/// Record a recipient's final state
pub fn record_recipient(state: DeliveryState) {
    counter!("broadcaster_recipients_total", "state" => state.as_str()).increment(1);
}

/// Record batch progress
pub fn record_batch_progress(completed: usize, total: usize) {
    gauge!("broadcaster_batch_completed").set(completed as f64);
    gauge!("broadcaster_batch_total").set(total as f64);
}

pub fn record_batch_duration(seconds: f64) {
    histogram!("broadcaster_batch_duration_seconds").record(seconds);
}

/// Run metrics aggregator
///
/// Aggregates per-recipient outcomes in memory for the summary report.
#[derive(Debug, Clone, Default)]
pub struct BatchMetricsAggregator {
    /// Recipients processed
    pub total_recipients: u64,

    /// Final state counts
    pub state_counts: BTreeMap<&'static str, u64>,

    /// Log GETs attempted
    pub log_fetches: u64,

    /// Send round-trip latency
    pub send_latency: RunningStats,
}

impl BatchMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one recipient outcome
    pub fn update(&mut self, state: DeliveryState, send_latency_ms: Option<f64>) {
        self.total_recipients += 1;
        *self.state_counts.entry(state.as_str()).or_insert(0) += 1;

        if matches!(state, DeliveryState::Logged | DeliveryState::LogFailed) {
            self.log_fetches += 1;
        }
        if let Some(latency) = send_latency_ms {
            self.send_latency.push(latency);
        }
    }

    /// Count for one state
    pub fn count(&self, state: DeliveryState) -> u64 {
        self.state_counts.get(state.as_str()).copied().unwrap_or(0)
    }

    pub fn summary(&self) -> MetricsSummary {
        let accepted = self.count(DeliveryState::Logged)
            + self.count(DeliveryState::SentNoId)
            + self.count(DeliveryState::LogFailed);

        MetricsSummary {
            total_recipients: self.total_recipients,
            accepted,
            failed: self.count(DeliveryState::SendFailed),
            log_fetches: self.log_fetches,
            accept_rate: if self.total_recipients > 0 {
                accepted as f64 / self.total_recipients as f64 * 100.0
            } else {
                0.0
            },
            send_latency_ms: StatsSummary::from(&self.send_latency),
            state_counts: self.state_counts.clone(),
        }
    }
}

/// Run summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_recipients: u64,
    /// Sends answered with 200/201/202
    pub accepted: u64,
    pub failed: u64,
    pub log_fetches: u64,
    pub accept_rate: f64,
    pub send_latency_ms: StatsSummary,
    pub state_counts: BTreeMap<&'static str, u64>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Broadcast Summary ===")?;
        writeln!(f, "Recipients: {}", self.total_recipients)?;
        writeln!(
            f,
            "Accepted: {} ({:.2}%)",
            self.accepted, self.accept_rate
        )?;
        writeln!(f, "Failed: {}", self.failed)?;
        writeln!(f, "Log fetches: {}", self.log_fetches)?;
        writeln!(f, "Send latency (ms): {}", self.send_latency_ms)?;

        if !self.state_counts.is_empty() {
            writeln!(f, "States:")?;
            for (state, count) in &self.state_counts {
                writeln!(f, "  {}: {}", state, count)?;
            }
        }

        Ok(())
    }
}

/// Stats summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for v in [120.0, 80.0, 100.0] {
            stats.push(v);
        }

        assert_eq!(stats.count(), 3);
        assert!((stats.mean() - 100.0).abs() < 1e-10);
        assert!((stats.min() - 80.0).abs() < 1e-10);
        assert!((stats.max() - 120.0).abs() < 1e-10);
        assert!((stats.variance() - 400.0).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_update() {
        let mut aggregator = BatchMetricsAggregator::new();
        aggregator.update(DeliveryState::Logged, Some(100.0));
        aggregator.update(DeliveryState::SendFailed, Some(50.0));
        aggregator.update(DeliveryState::SendFailed, None);
        aggregator.update(DeliveryState::SentNoId, Some(70.0));

        assert_eq!(aggregator.total_recipients, 4);
        assert_eq!(aggregator.count(DeliveryState::SendFailed), 2);
        assert_eq!(aggregator.log_fetches, 1);
        assert_eq!(aggregator.send_latency.count(), 3);

        let summary = aggregator.summary();
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.failed, 2);
        assert!((summary.accept_rate - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = BatchMetricsAggregator::new();
        aggregator.update(DeliveryState::Logged, Some(10.0));
        let output = aggregator.summary().to_string();

        assert!(output.contains("Recipients: 1"));
        assert!(output.contains("100.00%"));
        assert!(output.contains("logged: 1"));
    }

    #[test]
    fn test_empty_summary() {
        let summary = BatchMetricsAggregator::new().summary();
        assert_eq!(summary.accept_rate, 0.0);
        assert_eq!(summary.send_latency_ms.to_string(), "N/A");
    }

    #[test]
    fn test_record_functions_without_recorder() {
        record_send("accepted", 12.0);
        record_log_fetch(Some(200));
        record_log_fetch(None);
        record_recipient(DeliveryState::Logged);
        record_batch_progress(1, 2);
        record_batch_duration(0.5);
    }
}
