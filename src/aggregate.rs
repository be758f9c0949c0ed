//! Carbon intensity aggregation.

use serde_json::Number;

use crate::error::ReadingError;
use crate::intensity::Reading;

/// Unweighted arithmetic mean.
///
/// Returns `None` for an empty slice so "no data" stays distinct from an
/// average of zero.
pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let sum: f64 = values.iter().sum();
    Some(sum / values.len() as f64)
}

/// Carbon intensity of every reading, failing on the first one without a
/// numeric `carbonIntensity`.
pub fn intensities(readings: &[Reading]) -> Result<Vec<f64>, ReadingError> {
    readings
        .iter()
        .enumerate()
        .map(|(index, reading)| {
            reading
                .intensity()
                .ok_or(ReadingError::MissingIntensity { index })
        })
        .collect()
}

/// Mean carbon intensity over the history; `Ok(None)` when it is empty.
pub fn average_intensity(readings: &[Reading]) -> Result<Option<f64>, ReadingError> {
    Ok(average(&intensities(readings)?))
}

/// Format an average the way the dashboard prints floats: integral values
/// keep a trailing `.0` (`200.0`), others use the shortest round-trip form.
/// An absent average formats as the empty string.
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(value) => Number::from_f64(value)
            .map(|n| n.to_string())
            .unwrap_or_else(|| value.to_string()),
        None => String::new(),
    }
}
