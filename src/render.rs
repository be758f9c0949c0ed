//! Response body rendering for the HTML and CSV views.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::PrimitiveDateTime;

use crate::aggregate::format_average;
use crate::error::{ReadingError, RenderError};
use crate::intensity::Reading;

/// Upstream datetime layout, e.g. `2024-10-24T10:00:00.000Z`.
const UPSTREAM_DATETIME: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]Z");

/// CSV hour column layout, e.g. `2024-10-24 10:00:00`.
const CSV_HOUR: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Most fractional-second digits accepted (microseconds).
const MAX_FRACTION_DIGITS: usize = 6;

/// CSV header row.
pub const CSV_HEADER: [&str; 2] = ["Hour", "Carbon Intensity (gCO2eq/kWh)"];

/// Reformat an upstream datetime for the CSV export.
///
/// The input must match the upstream layout exactly, with one to six
/// fractional digits; the fractional seconds and `Z` suffix are dropped.
pub fn format_hour(datetime: &str) -> Result<String, RenderError> {
    let invalid = |reason: String| RenderError::InvalidTimestamp {
        value: datetime.to_string(),
        reason,
    };

    let parsed =
        PrimitiveDateTime::parse(datetime, UPSTREAM_DATETIME).map_err(|e| invalid(e.to_string()))?;

    // The layout guarantees exactly one '.' followed by digits and 'Z'.
    let fraction_digits = datetime
        .rsplit_once('.')
        .map_or(0, |(_, rest)| rest.len().saturating_sub(1));
    if fraction_digits > MAX_FRACTION_DIGITS {
        return Err(invalid(format!(
            "{} fractional digits, at most {} allowed",
            fraction_digits, MAX_FRACTION_DIGITS
        )));
    }

    parsed.format(CSV_HOUR).map_err(|e| invalid(e.to_string()))
}

/// Build the CSV export: header, one row per reading, then the average.
pub fn render_csv(readings: &[Reading], average: Option<f64>) -> Result<String, RenderError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for (index, reading) in readings.iter().enumerate() {
        let datetime = reading
            .datetime()
            .ok_or(ReadingError::MissingDatetime { index })?;
        let intensity = reading
            .carbon_intensity()
            .ok_or(ReadingError::MissingIntensity { index })?;
        writer.write_record([format_hour(datetime)?, intensity.to_string()])?;
    }
    writer.write_record(["Average".to_string(), format_average(average)])?;

    let bytes = writer
        .into_inner()
        .map_err(|e| RenderError::Buffer(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Render the summary page.
pub fn render_index(average: Option<f64>) -> String {
    let summary = match average {
        Some(_) => format!(
            "The average carbon intensity in the last 24 hours is \
             <strong>{}</strong> gCO2eq/kWh.",
            format_average(average)
        ),
        None => "The average carbon intensity in the last 24 hours is unavailable: \
                 no readings were returned."
            .to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Carbon Intensity (GB)</title>
</head>
<body>
  <h1>Carbon Intensity (GB)</h1>
  <p>{summary}</p>
  <ul>
    <li><a href="/view_data">View raw data (JSON)</a></li>
    <li><a href="/download_csv">Download CSV</a></li>
  </ul>
</body>
</html>
"#
    )
}
