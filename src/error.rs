//! Unified error types for the carbon dashboard.

use thiserror::Error;

/// Unified error type for the carbon dashboard.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Upstream fetch error.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// View rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Metrics recorder installation error.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures talking to the carbon intensity provider.
///
/// Handlers treat every variant the same way (upstream unavailable); the
/// variants exist for logging and tests.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, connection reset, ...).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with something other than 200.
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    /// Body was not the expected `{"history": [...]}` shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// A reading lacks a field a view needs.
///
/// Only the average and the CSV rows use typed fields; the JSON view passes
/// readings through without checking them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadingError {
    /// `datetime` missing or not a string.
    #[error("reading {index} has no datetime string")]
    MissingDatetime {
        /// Position in the history.
        index: usize,
    },

    /// `carbonIntensity` missing, null, or not a number.
    #[error("reading {index} has no numeric carbonIntensity")]
    MissingIntensity {
        /// Position in the history.
        index: usize,
    },
}

/// Failures turning readings into a response body.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A reading lacks a field the view needs.
    #[error(transparent)]
    Reading(#[from] ReadingError),

    /// A reading's datetime does not match `YYYY-MM-DDTHH:MM:SS.fffZ`.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The offending datetime string.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// CSV writer error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// CSV buffer could not be recovered from the writer.
    #[error("csv buffer error: {0}")]
    Buffer(String),

    /// CSV output was not valid UTF-8.
    #[error("csv output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
