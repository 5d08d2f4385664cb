use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use scope_core::{Result, Sample, ScopeError};
use serde::{Deserialize, Serialize};

/// JSON shape pushed by the servers: `{"timestamp": "...", "value": 1.5}`.
#[derive(Debug, Clone, Deserialize)]
struct Reading {
    timestamp: String,
    value:     f64,
}

/// Decode one inbound text frame into a [`Sample`].
pub fn parse_reading(text: &str) -> Result<Sample> {
    let reading: Reading =
        serde_json::from_str(text).map_err(|e| ScopeError::Decode(format!("bad reading: {e}")))?;
    let timestamp = parse_timestamp(&reading.timestamp)?;
    Ok(Sample::new(reading.value, timestamp))
}

/// Convert an ISO-8601 instant into Unix epoch seconds.
///
/// Strings with an offset (`Z`, `+02:00`) are exact. Naive strings, which is
/// what the servers send, are taken as local time.
pub fn parse_timestamp(raw: &str) -> Result<f64> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(epoch_seconds(dt.timestamp(), dt.timestamp_subsec_nanos()));
    }

    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| ScopeError::Decode(format!("unrecognised timestamp '{raw}'")))?;

    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| ScopeError::Decode(format!("timestamp '{raw}' does not exist locally")))?;

    Ok(epoch_seconds(local.timestamp(), local.timestamp_subsec_nanos()))
}

fn epoch_seconds(secs: i64, nanos: u32) -> f64 {
    secs as f64 + f64::from(nanos) / 1e9
}

/// Control message asking a server to keep values within a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    #[serde(rename = "Value_min")]
    pub value_min: i32,
    #[serde(rename = "Value_max")]
    pub value_max: i32,
}

impl Bounds {
    /// Parse the two user-entered fields. Surrounding whitespace is ignored.
    ///
    /// Values must fit in an `i32`, the widest integer the servers store.
    pub fn parse(min: &str, max: &str) -> Result<Self> {
        let field = |name: &str, raw: &str| {
            raw.trim().parse::<i32>().map_err(|_| {
                ScopeError::InvalidBounds(format!("{name} must be a whole number, got '{raw}'"))
            })
        };
        Ok(Self {
            value_min: field("Value min", min)?,
            value_max: field("Value max", max)?,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ScopeError::Decode(format!("encode bounds: {e}")))
    }
}

/// Validate every source's `(min, max)` pair; fails on the first bad field so
/// that nothing is sent unless all inputs are valid.
pub fn parse_all<'a, I>(inputs: I) -> Result<Vec<Bounds>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    inputs
        .into_iter()
        .map(|(min, max)| Bounds::parse(min, max))
        .collect()
}
