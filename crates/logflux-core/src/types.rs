//! Core types for logflux-core.
//!
//! This module defines the data structures that flow through the engine: the
//! inbound [`Record`], the outbound [`Point`], and the typed [`FieldValue`]
//! stored in a point's field set.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

/// Tag key every point carries, set from [`Record::source`].
pub const SOURCE_TAG: &str = "source";

/// An inbound structured log event.
///
/// Records are produced by the host pipeline (or the NDJSON ingestor) once
/// per log event and are read-only to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Event timestamp (UTC). Only millisecond precision reaches the point.
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Source identifier (usually the emitting host).
    pub source: String,
    /// Named field values. A JSON `null` is treated the same as a missing key.
    pub fields: HashMap<String, Value>,
}

impl Record {
    pub fn new(timestamp: chrono::DateTime<chrono::Utc>, source: impl Into<String>) -> Self {
        Self {
            timestamp,
            source: source.into(),
            fields: HashMap::new(),
        }
    }

    /// Add a field, consuming and returning the record.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up a field. Returns `None` for missing keys and JSON nulls.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }
}

/// Render a field value the way tags, equality matchers and regex matchers
/// see it: strings verbatim, scalars via their display form, arrays and
/// objects as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// A value stored in a point's field set.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Boolean(bool),
    /// Signed integer, the default for integral JSON numbers.
    Integer(i64),
    /// Only used for integers above `i64::MAX`.
    UInteger(u64),
    Float(f64),
    String(String),
}

impl FieldValue {
    /// Coerce a mapped value into a field value.
    ///
    /// Precedence is boolean, then number (keeping the integer/float
    /// distinction of the source), then any other non-null value as text.
    /// Null yields `None`: the field is omitted.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Boolean(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Integer(i))
                } else if let Some(u) = n.as_u64() {
                    Some(Self::UInteger(u))
                } else {
                    n.as_f64().map(Self::Float)
                }
            }
            other => Some(Self::String(stringify(other))),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Boolean(b) => write!(f, "{b}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::UInteger(u) => write!(f, "{u}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::String(s) => write!(f, "{s}"),
        }
    }
}

/// An outbound time-series sample.
///
/// Tags and fields are kept in `BTreeMap`s so iteration (and therefore any
/// serialised form) is ordered by key.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub measurement: String,
    pub timestamp_millis: i64,
    /// Always contains [`SOURCE_TAG`].
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, FieldValue>,
}

impl Point {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}
