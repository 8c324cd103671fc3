//! Domain-specific assertion macros for logflux harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* part of a built point was wrong.

// ---------------------------------------------------------------------------
// Point assertions
// ---------------------------------------------------------------------------

/// Assert that a `Point` has a tag with an expected value.
///
/// ```rust
/// assert_tag!(point, "host", "n1");
/// ```
#[macro_export]
macro_rules! assert_tag {
    ($point:expr, $key:expr, $value:expr) => {{
        let point: &logflux_core::Point = &$point;
        let key: &str = $key;
        let expected: &str = $value;
        match point.tags.get(key) {
            Some(actual) if actual == expected => {}
            Some(actual) => panic!(
                "assert_tag! failed:\n  point.tags[{:?}]\n  expected: {:?}\n  actual:   {:?}",
                key, expected, actual
            ),
            None => panic!(
                "assert_tag! failed: tag {:?} not found.\n  Available tags: {:?}",
                key, point.tags
            ),
        }
    }};
}

/// Assert that a `Point` has a field with an expected `FieldValue`.
///
/// ```rust
/// assert_field!(point, "retries", FieldValue::Integer(1));
/// ```
#[macro_export]
macro_rules! assert_field {
    ($point:expr, $key:expr, $value:expr) => {{
        let point: &logflux_core::Point = &$point;
        let key: &str = $key;
        let expected: logflux_core::FieldValue = $value;
        match point.fields.get(key) {
            Some(actual) => pretty_assertions::assert_eq!(
                actual, &expected,
                "assert_field! failed for field {:?}", key
            ),
            None => panic!(
                "assert_field! failed: field {:?} not found.\n  Available fields: {:?}",
                key, point.fields
            ),
        }
    }};
}

/// Assert that a `Point` has no field with the given key.
#[macro_export]
macro_rules! assert_no_field {
    ($point:expr, $key:expr) => {{
        let point: &logflux_core::Point = &$point;
        let key: &str = $key;
        if let Some(actual) = point.fields.get(key) {
            panic!(
                "assert_no_field! failed: field {:?} present with value {:?}",
                key, actual
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Build outcome assertions
// ---------------------------------------------------------------------------

/// Assert that building a record yields a point, and return it.
#[macro_export]
macro_rules! assert_built {
    ($rules:expr, $record:expr) => {{
        match logflux_core::build(&$rules, "m", &$record) {
            Some(point) => point,
            None => panic!("assert_built! failed: record was dropped.\n  record: {:?}", $record),
        }
    }};
}

/// Assert that building a record drops it.
#[macro_export]
macro_rules! assert_dropped {
    ($rules:expr, $record:expr) => {{
        if let Some(point) = logflux_core::build(&$rules, "m", &$record) {
            panic!(
                "assert_dropped! failed: record produced a point.\n  point: {:?}",
                point
            );
        }
    }};
}
