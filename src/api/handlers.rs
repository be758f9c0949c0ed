//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::error;

use crate::aggregate::average_intensity;
use crate::error::RenderError;
use crate::intensity::{HistorySource, Reading};
use crate::metrics;
use crate::render::{render_csv, render_index};

/// Body for every upstream failure.
pub const FAILED_TO_RETRIEVE: &str = "Failed to retrieve data";

/// Body when fetched readings lack what a view needs (bad datetime, null
/// intensity).
pub const FAILED_TO_PROCESS: &str = "Failed to process data";

/// Download file name for the CSV export.
pub const CSV_DISPOSITION: &str = "attachment; filename=carbon_intensity.csv";

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where carbon intensity history comes from.
    pub source: Arc<dyn HistorySource>,
    /// Prometheus handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(source: Arc<dyn HistorySource>) -> Self {
        Self {
            source,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: &'static str,
}

/// Fetch the history, logging failures. `None` means upstream unavailable.
async fn fetch_readings(state: &AppState, view: &'static str) -> Option<Vec<Reading>> {
    match state.source.fetch().await {
        Ok(readings) => Some(readings),
        Err(e) => {
            error!(view, error = %e, "Failed to retrieve carbon intensity data");
            None
        }
    }
}

fn upstream_failure_text() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, FAILED_TO_RETRIEVE).into_response()
}

fn unprocessable_text() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, FAILED_TO_PROCESS).into_response()
}

/// Summary page handler - average intensity over the fetched history.
pub async fn index(State(state): State<AppState>) -> Response {
    metrics::inc_view_requests("index");

    let Some(readings) = fetch_readings(&state, "index").await else {
        return upstream_failure_text();
    };

    match average_intensity(&readings) {
        Ok(average) => Html(render_index(average)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to average carbon intensity");
            unprocessable_text()
        }
    }
}

/// Raw data handler - upstream readings as a JSON array, unchecked.
pub async fn view_data(State(state): State<AppState>) -> Response {
    metrics::inc_view_requests("view_data");

    match fetch_readings(&state, "view_data").await {
        Some(readings) => Json(readings).into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: FAILED_TO_RETRIEVE,
            }),
        )
            .into_response(),
    }
}

/// CSV export handler - hourly readings plus the average as an attachment.
pub async fn download_csv(State(state): State<AppState>) -> Response {
    metrics::inc_view_requests("download_csv");

    let Some(readings) = fetch_readings(&state, "download_csv").await else {
        return upstream_failure_text();
    };

    let rendered = average_intensity(&readings)
        .map_err(RenderError::from)
        .and_then(|average| render_csv(&readings, average));

    match rendered {
        Ok(body) => (
            [
                (header::CONTENT_DISPOSITION, CSV_DISPOSITION),
                (header::CONTENT_TYPE, "text/csv"),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render CSV export");
            unprocessable_text()
        }
    }
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Prometheus scrape handler - 404 when no recorder is installed.
pub async fn prometheus(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
