//! Carbon intensity data module.
//!
//! This module handles:
//! - Reading types as returned by the Electricity Maps history endpoint
//! - The `HistorySource` seam used by the HTTP views
//! - Electricity Maps API client
//! - Mock source for testing

pub mod client;
pub mod mock;
pub mod types;

pub use client::ElectricityMapsClient;
pub use mock::MockHistorySource;
pub use types::{HistoryResponse, HistorySource, Reading};
