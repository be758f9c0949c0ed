//! Prometheus metrics for upstream latency and view traffic.
//!
//! This module provides:
//! - Upstream fetch latency and failure counts
//! - Per-view request counts
//! - Recorder installation for the `/metrics` endpoint

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Upstream fetch latency metric name.
pub const METRIC_UPSTREAM_FETCH_LATENCY: &str = "upstream_fetch_latency_ms";
/// Upstream fetch failures counter metric name.
pub const METRIC_UPSTREAM_FETCH_FAILURES: &str = "upstream_fetch_failures_total";
/// View requests counter metric name.
pub const METRIC_VIEW_REQUESTS: &str = "view_requests_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_UPSTREAM_FETCH_LATENCY,
        "Carbon intensity history fetch latency in milliseconds"
    );
    describe_counter!(
        METRIC_UPSTREAM_FETCH_FAILURES,
        "Total number of failed carbon intensity history fetches"
    );
    describe_counter!(
        METRIC_VIEW_REQUESTS,
        "Total number of requests per dashboard view"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and describe our metrics.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Increment upstream fetch failures counter.
pub fn inc_upstream_fetch_failures() {
    counter!(METRIC_UPSTREAM_FETCH_FAILURES).increment(1);
}

/// Increment the request counter for a view.
pub fn inc_view_requests(view: &'static str) {
    counter!(METRIC_VIEW_REQUESTS, "view" => view).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for an upstream fetch.
pub fn timer_upstream_fetch() -> LatencyTimer {
    LatencyTimer::new(METRIC_UPSTREAM_FETCH_LATENCY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn latency_timer_measures_time() {
        let timer = LatencyTimer::new("test_metric");
        sleep(Duration::from_millis(10));
        let elapsed = timer.elapsed_ms();
        assert!(elapsed >= 9.0); // Allow some tolerance
    }

    #[test]
    fn counters_without_recorder_are_noops() {
        inc_upstream_fetch_failures();
        inc_view_requests("index");
        drop(timer_upstream_fetch());
    }
}
