//! Carbon intensity types for the Electricity Maps history endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::FetchError;

/// Upstream field holding the hour start.
pub const DATETIME_FIELD: &str = "datetime";

/// Upstream field holding gCO2eq/kWh.
pub const CARBON_INTENSITY_FIELD: &str = "carbonIntensity";

/// One hourly carbon intensity data point, exactly as the provider sent it.
///
/// The object is kept whole so the JSON view can hand it back unmodified,
/// nulls and unknown fields included. Typed access goes through
/// [`Reading::datetime`] and [`Reading::carbon_intensity`]; callers that need
/// those fields decide what a missing one means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reading(Map<String, Value>);

impl Reading {
    /// Create a reading with the two fields the dashboard uses.
    pub fn new(datetime: impl Into<String>, carbon_intensity: impl Into<Number>) -> Self {
        let mut fields = Map::new();
        fields.insert(DATETIME_FIELD.to_string(), Value::String(datetime.into()));
        fields.insert(
            CARBON_INTENSITY_FIELD.to_string(),
            Value::Number(carbon_intensity.into()),
        );
        Self(fields)
    }

    /// Wrap an upstream object as-is.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Attach or replace an upstream field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// All upstream fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Hour start, e.g. "2024-10-24T10:00:00.000Z", if present as a string.
    pub fn datetime(&self) -> Option<&str> {
        self.0.get(DATETIME_FIELD).and_then(Value::as_str)
    }

    /// The raw JSON number, so `200` is written back as `200`, not `200.0`.
    /// `None` when the field is missing, null, or not a number.
    pub fn carbon_intensity(&self) -> Option<&Number> {
        match self.0.get(CARBON_INTENSITY_FIELD) {
            Some(Value::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// Carbon intensity as a float.
    pub fn intensity(&self) -> Option<f64> {
        self.carbon_intensity().and_then(Number::as_f64)
    }
}

/// Body of `GET /v3/carbon-intensity/history`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    /// Zone the history belongs to.
    #[serde(default)]
    pub zone: Option<String>,
    /// Readings in chronological order.
    pub history: Vec<Reading>,
}

/// Anything that can produce the latest carbon intensity history.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch the history. Every call goes to the source; nothing is cached.
    async fn fetch(&self) -> Result<Vec<Reading>, FetchError>;
}
