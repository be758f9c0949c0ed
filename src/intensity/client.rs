//! Electricity Maps API client.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::metrics;

use super::types::{HistoryResponse, HistorySource, Reading};

/// Client for the Electricity Maps carbon intensity history endpoint.
#[derive(Debug, Clone)]
pub struct ElectricityMapsClient {
    /// HTTP client for API requests. Reqwest defaults; no timeout override.
    http: reqwest::Client,
    /// Full history URL, zone query included.
    api_url: String,
    /// Bearer token, possibly empty.
    api_token: String,
}

impl ElectricityMapsClient {
    /// Create a new client from config.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_url: config.electricity_maps_api_url.clone(),
            api_token: config.electricity_maps_api_token.clone(),
        })
    }

    /// Get the history URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// One GET against the history endpoint.
    async fn fetch_history(&self) -> Result<Vec<Reading>, FetchError> {
        let response = self
            .http
            .get(&self.api_url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        let parsed: HistoryResponse = serde_json::from_slice(&body)
            .map_err(|e| FetchError::Malformed(format!("failed to parse history: {}", e)))?;

        Ok(parsed.history)
    }
}

#[async_trait]
impl HistorySource for ElectricityMapsClient {
    #[instrument(skip(self), fields(url = %self.api_url))]
    async fn fetch(&self) -> Result<Vec<Reading>, FetchError> {
        let timer = metrics::timer_upstream_fetch();
        let result = self.fetch_history().await;
        drop(timer);

        match &result {
            Ok(readings) => debug!(count = readings.len(), "Retrieved carbon intensity history"),
            Err(e) => {
                metrics::inc_upstream_fetch_failures();
                warn!(error = %e, "Failed to retrieve carbon intensity history");
            }
        }

        result
    }
}
