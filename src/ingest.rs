//! Ingest — decodes newline-delimited JSON log events into [`Record`]s.
//!
//! Each line is one flat JSON object, GELF-style:
//!
//! ```json
//! {"timestamp": 1700000000.123, "source": "web-1", "level": "error", "retries": 3}
//! ```
//!
//! `timestamp` may be integer milliseconds, fractional seconds, or an RFC 3339
//! string; when absent the ingest time is used. `source` falls back to `host`,
//! then to `"unknown"`. Every key, including those two, stays in the record's
//! field map.

use chrono::{DateTime, TimeZone, Utc};
use logflux_core::Record;
use serde_json::Value;

const UNKNOWN_SOURCE: &str = "unknown";

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("unusable timestamp: {0}")]
    Timestamp(String),
}

/// Decode one line into a record.
pub fn parse_record(line: &str) -> Result<Record, IngestError> {
    let fields = match serde_json::from_str::<Value>(line)? {
        Value::Object(map) => map,
        other => return Err(IngestError::NotAnObject(kind_name(&other))),
    };

    let timestamp = match fields.get("timestamp") {
        None | Some(Value::Null) => Utc::now(),
        Some(value) => parse_timestamp(value)?,
    };
    let source = ["source", "host"]
        .iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_str))
        .unwrap_or(UNKNOWN_SOURCE)
        .to_string();

    Ok(Record {
        timestamp,
        source,
        fields: fields.into_iter().collect(),
    })
}

fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>, IngestError> {
    let parsed = match value {
        Value::Number(n) => match n.as_i64() {
            Some(millis) => Utc.timestamp_millis_opt(millis).single(),
            None => n.as_f64().and_then(|secs| {
                let millis = (secs * 1000.0).round();
                Utc.timestamp_millis_opt(millis as i64).single()
            }),
        },
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    };
    parsed.ok_or_else(|| IngestError::Timestamp(value.to_string()))
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
