//! HTTP server startup.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::intensity::ElectricityMapsClient;
use crate::metrics;
use crate::utils::shutdown_signal;

use super::{create_router, AppState};

/// Build the client and router from `config` and serve until shutdown.
pub async fn serve(config: &Config) -> Result<()> {
    if !config.has_token() {
        warn!("ELECTRICITY_MAPS_API_TOKEN is not set; upstream requests will likely be rejected");
    }

    let prometheus = if config.metrics_enabled {
        Some(metrics::install_recorder()?)
    } else {
        None
    };

    let client = ElectricityMapsClient::new(config)?;
    info!("Upstream: {}", client.api_url());

    let app_state = AppState::new(Arc::new(client)).with_metrics(prometheus);
    let router = create_router(app_state);

    let listener = TcpListener::bind((config.bind_address.as_str(), config.port)).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
