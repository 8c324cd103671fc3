//! Point builder — turns one [`Record`] into zero or one [`Point`].
//!
//! The steps run in a fixed order and stop at the first drop:
//!
//! 1. seed the point with the measurement, timestamp and `source` tag;
//! 2. every filter must match (evaluation stops at the first miss);
//! 3. copy tag fields as strings;
//! 4. map value fields and coerce them into [`FieldValue`]s.
//!
//! Building never fails. Unexpected value shapes fall back to their string
//! form.

use std::collections::BTreeMap;

use crate::rules::RuleSet;
use crate::types::{stringify, FieldValue, Point, Record, SOURCE_TAG};

/// Build a point from `record`, or `None` if the rules drop it.
pub fn build(rules: &RuleSet, measurement: &str, record: &Record) -> Option<Point> {
    if let Some(filter) = rules
        .filters()
        .iter()
        .find(|filter| !filter.matches(record.get(filter.field())))
    {
        tracing::trace!(field = filter.field(), "record dropped by filter");
        return None;
    }

    let mut tags = BTreeMap::new();
    tags.insert(SOURCE_TAG.to_string(), record.source.clone());
    for rule in rules.tags() {
        match record.get(&rule.field) {
            Some(value) => {
                tags.insert(rule.field.clone(), stringify(value));
            }
            None if rule.required => {
                tracing::trace!(field = %rule.field, "record dropped: required tag missing");
                return None;
            }
            None => {}
        }
    }

    let mut fields = BTreeMap::new();
    for rule in rules.fields() {
        let key = rule.mapper.field();
        let mapped = rule.mapper.map(record.get(key));
        match mapped.as_deref().and_then(FieldValue::from_value) {
            Some(value) => {
                fields.insert(key.to_string(), value);
            }
            None if rule.required => {
                tracing::trace!(field = key, "record dropped: required field missing");
                return None;
            }
            None => {}
        }
    }

    Some(Point {
        measurement: measurement.to_string(),
        timestamp_millis: record.timestamp.timestamp_millis(),
        tags,
        fields,
    })
}
