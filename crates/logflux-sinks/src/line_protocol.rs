//! Influx line protocol encoding.
//!
//! ```text
//! measurement,tag1=val1,tag2=val2 field1=val1,field2=val2 timestamp_ms
//! ```
//!
//! Timestamps are written in milliseconds; the consumer must be told to use
//! `precision=ms`. Tags and fields come out sorted by key because [`Point`]
//! stores them in ordered maps.

use std::fmt::Write as _;

use logflux_core::{FieldValue, Point};

/// Encode a point as one line (no trailing newline).
///
/// Returns `None` for a point without fields, which the protocol cannot
/// represent. Tags with an empty key or value are left out. Line breaks in
/// any name or value are written as `\n` / `\r` so a point never spans two
/// lines.
pub fn encode_point(point: &Point) -> Option<String> {
    if point.fields.is_empty() {
        return None;
    }

    let mut line = escape_measurement(&point.measurement);
    for (key, value) in &point.tags {
        if key.is_empty() || value.is_empty() {
            continue;
        }
        line.push(',');
        line.push_str(&escape_key(key));
        line.push('=');
        line.push_str(&escape_key(value));
    }

    line.push(' ');
    for (i, (key, value)) in point.fields.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        line.push_str(&escape_key(key));
        line.push('=');
        push_field_value(&mut line, value);
    }

    // Writing into a String cannot fail.
    let _ = write!(line, " {}", point.timestamp_millis);
    Some(line)
}

fn push_field_value(line: &mut String, value: &FieldValue) {
    match value {
        FieldValue::Boolean(b) => line.push_str(if *b { "true" } else { "false" }),
        FieldValue::Integer(i) => {
            let _ = write!(line, "{i}i");
        }
        FieldValue::UInteger(u) => {
            let _ = write!(line, "{u}u");
        }
        FieldValue::Float(v) => {
            let _ = write!(line, "{v}");
        }
        FieldValue::String(s) => {
            line.push('"');
            line.push_str(&escape(s, &['\\', '"']));
            line.push('"');
        }
    }
}

/// Measurement names escape commas and spaces.
fn escape_measurement(s: &str) -> String {
    escape(s, &[',', ' '])
}

/// Tag keys, tag values and field keys escape commas, equals signs and spaces.
fn escape_key(s: &str) -> String {
    escape(s, &[',', '=', ' '])
}

/// Backslash-escape `special` and spell out line breaks.
fn escape(s: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if special.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
