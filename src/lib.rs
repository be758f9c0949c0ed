//! Carbon intensity dashboard.
//!
//! Fetches the last 24 hours of carbon intensity for the GB grid from the
//! Electricity Maps API and serves it three ways:
//!
//! ```text
//! GET /              HTML page with the average intensity
//! GET /view_data     upstream readings as JSON
//! GET /download_csv  hourly readings plus the average as CSV
//! ```
//!
//! Every request fetches fresh data; nothing is cached.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`intensity`]: Reading types, API client, and mock source
//! - [`aggregate`]: Average intensity calculation
//! - [`render`]: HTML and CSV rendering
//! - [`api`]: HTTP views, health, and metrics
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod intensity;
pub mod metrics;
pub mod render;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
