//! Mock history source for unit testing.
//!
//! Drives the HTTP views without making real network requests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::FetchError;

use super::types::{HistorySource, Reading};

/// Mock history source for testing.
#[derive(Debug, Clone)]
pub struct MockHistorySource {
    /// Readings to return; `None` simulates an upstream failure.
    readings: Option<Vec<Reading>>,
    /// Simulated latency in milliseconds.
    latency_ms: u64,
    /// Number of fetches served.
    calls: Arc<AtomicUsize>,
}

impl MockHistorySource {
    /// Source that always returns `readings`.
    pub fn new(readings: Vec<Reading>) -> Self {
        Self {
            readings: Some(readings),
            latency_ms: 0,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Source that returns an empty history.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Source whose every fetch fails.
    pub fn failing() -> Self {
        Self {
            readings: None,
            latency_ms: 0,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add simulated latency to every fetch.
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// How many times `fetch` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistorySource for MockHistorySource {
    async fn fetch(&self) -> Result<Vec<Reading>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }

        self.readings
            .clone()
            .ok_or(FetchError::Status(StatusCode::SERVICE_UNAVAILABLE))
    }
}
