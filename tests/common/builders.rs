//! Test builders — ergonomic constructors for `Record`, `RuleSet` and configs.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chrono::TimeZone;
use logflux_core::config::{OutputConfig, RulesConfig};
use logflux_core::{Record, RuleSet};

/// Fixed timestamp used by every builder unless overridden.
pub const TS_MILLIS: i64 = 1_705_312_800_250;

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Record`] test fixtures.
///
/// # Example
///
/// ```rust
/// let record = RecordBuilder::new("n1")
///     .field("level", "error")
///     .field("retries", 3)
///     .build();
/// ```
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new(source: &str) -> Self {
        let ts = chrono::Utc
            .timestamp_millis_opt(TS_MILLIS)
            .single()
            .expect("fixture timestamp is valid");
        Self {
            record: Record::new(ts, source),
        }
    }

    pub fn ts_millis(mut self, millis: i64) -> Self {
        self.record.timestamp = chrono::Utc
            .timestamp_millis_opt(millis)
            .single()
            .expect("valid millis");
        self
    }

    pub fn field(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.record = self.record.with_field(key, value);
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}

// ---------------------------------------------------------------------------
// Rule helpers
// ---------------------------------------------------------------------------

/// Compile a rule set, panicking on invalid specs.
pub fn rules(filters: &[&str], tags: &[&str], fields: &[&str]) -> RuleSet {
    RuleSet::compile(filters, tags, fields).expect("test rules must compile")
}

/// Raw rule config, as the output consumes it.
pub fn rules_config(filters: &[&str], tags: &[&str], fields: &[&str]) -> RulesConfig {
    let owned = |specs: &[&str]| -> Vec<String> { specs.iter().map(|s| s.to_string()).collect() };
    RulesConfig {
        filters: owned(filters),
        tags: owned(tags),
        fields: owned(fields),
    }
}

/// Output settings with a recognisable database and measurement.
pub fn output_config() -> OutputConfig {
    OutputConfig {
        database: "telemetry".to_string(),
        measurement: "events".to_string(),
        ..OutputConfig::default()
    }
}

/// Build `n` records alternating error/warn/info levels with a `seq` field.
pub fn build_corpus(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let level = match i % 3 {
                0 => "error",
                1 => "warn",
                _ => "info",
            };
            RecordBuilder::new(&format!("node-{}", i % 4))
                .ts_millis(TS_MILLIS + i as i64)
                .field("level", level)
                .field("seq", i as u64)
                .build()
        })
        .collect()
}
