//! Wire parsing for the `/timeseries` response.
//!
//! The `data` field arrives in one of two shapes:
//!
//! ```text
//! { "data": { "1700000000": { "avgHighPrice": 120, ... }, ... } }
//! { "data": [ { "timestamp": 1700000000, "avgHighPrice": 120, ... }, ... ] }
//! ```
//!
//! Both normalize to the same ascending `Vec<PricePoint>`.

use super::PricePoint;
use crate::error::{PointError, PriceHistoryError};

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};

const AVG_HIGH_PRICE: &str = "avgHighPrice";
const AVG_LOW_PRICE: &str = "avgLowPrice";
const HIGH_PRICE_VOLUME: &str = "highPriceVolume";
const LOW_PRICE_VOLUME: &str = "lowPriceVolume";
const TIMESTAMP: &str = "timestamp";

/// Absent price fields read as this, so the positivity check rejects them.
const MISSING_PRICE: i64 = -1;

/// Parsed batch plus per-reason drop counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSeries {
    /// Ascending by timestamp; ties keep input order.
    pub points: Vec<PricePoint>,
    /// Points that could not be read at all.
    pub malformed: usize,
    /// Points older than the retention window.
    pub expired: usize,
    /// Points with a missing or non-positive price.
    pub unpriced: usize,
}

impl ParsedSeries {
    pub fn skipped(&self) -> usize {
        self.malformed + self.expired + self.unpriced
    }
}

enum PointOutcome {
    Kept(PricePoint),
    Expired,
    Unpriced,
}

/// Parse a raw `/timeseries` body.
///
/// Only top-level problems fail the whole batch; a bad point is logged,
/// counted in [`ParsedSeries::malformed`] and skipped.
pub fn parse_timeseries(
    raw: &str,
    now: DateTime<Utc>,
    retention: Duration,
) -> Result<ParsedSeries, PriceHistoryError> {
    let body: Value = serde_json::from_str(raw)
        .map_err(|e| PriceHistoryError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let mut top = match body {
        Value::Object(top) => top,
        other => {
            return Err(PriceHistoryError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                kind(&other)
            )));
        }
    };

    let cutoff = now
        .checked_sub_signed(retention)
        .map(|t| t.timestamp())
        .unwrap_or(i64::MIN);
    let mut series = ParsedSeries::default();

    match top.remove("data") {
        None | Some(Value::Null) => {
            tracing::debug!("time series response has no data");
        }
        Some(Value::Object(data)) => {
            for (key, value) in &data {
                let outcome = parse_timestamp_key(key).and_then(|ts| read_point(ts, value, cutoff));
                series.record(outcome, || format!("{}: {}", key, value));
            }
        }
        Some(Value::Array(data)) => {
            for element in &data {
                let outcome = element
                    .as_object()
                    .ok_or(PointError::NotAnObject)
                    .and_then(|obj| {
                        let ts = timestamp_field(obj)?;
                        read_point(ts, element, cutoff)
                    });
                series.record(outcome, || element.to_string());
            }
        }
        Some(other) => {
            return Err(PriceHistoryError::MalformedResponse(format!(
                "`data` must be an object or array, got {}",
                kind(&other)
            )));
        }
    }

    // `sort_by_key` is stable, so upstream duplicates keep their order.
    series.points.sort_by_key(|p| p.timestamp);
    Ok(series)
}

impl ParsedSeries {
    fn record(&mut self, outcome: Result<PointOutcome, PointError>, raw: impl FnOnce() -> String) {
        match outcome {
            Ok(PointOutcome::Kept(point)) => self.points.push(point),
            Ok(PointOutcome::Expired) => self.expired += 1,
            Ok(PointOutcome::Unpriced) => self.unpriced += 1,
            Err(e) => {
                tracing::warn!(error = %e, point = %raw(), "skipping malformed price point");
                self.malformed += 1;
            }
        }
    }
}

fn read_point(timestamp: i64, value: &Value, cutoff: i64) -> Result<PointOutcome, PointError> {
    if timestamp < cutoff {
        return Ok(PointOutcome::Expired);
    }

    let obj = value.as_object().ok_or(PointError::NotAnObject)?;
    let high = int_field(obj, AVG_HIGH_PRICE)?.unwrap_or(MISSING_PRICE);
    let low = int_field(obj, AVG_LOW_PRICE)?.unwrap_or(MISSING_PRICE);
    let high_volume = volume_field(obj, HIGH_PRICE_VOLUME)?;
    let low_volume = volume_field(obj, LOW_PRICE_VOLUME)?;

    if high <= 0 || low <= 0 {
        return Ok(PointOutcome::Unpriced);
    }

    let timestamp = DateTime::<Utc>::from_timestamp(timestamp, 0)
        .ok_or_else(|| PointError::InvalidTimestamp(timestamp.to_string()))?;

    Ok(PointOutcome::Kept(PricePoint {
        timestamp,
        avg_high_price: high as u64,
        avg_low_price: low as u64,
        high_volume,
        low_volume,
    }))
}

fn parse_timestamp_key(key: &str) -> Result<i64, PointError> {
    key.trim()
        .parse::<i64>()
        .map_err(|_| PointError::InvalidTimestamp(key.to_string()))
}

fn timestamp_field(obj: &Map<String, Value>) -> Result<i64, PointError> {
    int_field(obj, TIMESTAMP)?.ok_or(PointError::MissingField(TIMESTAMP))
}

/// `Ok(None)` when the field is absent or null.
fn int_field(obj: &Map<String, Value>, field: &'static str) -> Result<Option<i64>, PointError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| PointError::InvalidField {
                field,
                value: n.to_string(),
            }),
        Some(other) => Err(PointError::InvalidField {
            field,
            value: other.to_string(),
        }),
    }
}

fn volume_field(obj: &Map<String, Value>, field: &'static str) -> Result<u64, PointError> {
    match int_field(obj, field)? {
        None => Ok(0),
        Some(v) if v < 0 => Err(PointError::NegativeVolume { field, value: v }),
        Some(v) => Ok(v as u64),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
