//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{download_csv, health, index, prometheus, view_data, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Dashboard views
        .route("/", get(index))
        .route("/view_data", get(view_data))
        .route("/download_csv", get(download_csv))
        // Operational endpoints
        .route("/health", get(health))
        .route("/metrics", get(prometheus))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
