//! Static corpora used across harnesses.

/// NDJSON input for the CLI harness. Line 3 is malformed on purpose.
pub const NDJSON_MIXED: &str = r#"{"timestamp":1705312800000,"source":"web-1","level":"error","host":"web-1","retries":"3"}
{"timestamp":1705312801000,"source":"web-1","level":"warn","host":"web-1","retries":"3"}
{not json
{"timestamp":"2024-01-15T10:00:02Z","source":"db-1","level":"error","host":"db-1","retries":"5"}
"#;

/// Config selecting error records, tagging by host and flagging retries == 3.
pub const CONFIG_ERRORS: &str = r#"
[output]
database    = "telemetry"
measurement = "errors"

[rules]
filters = ["level=error"]
tags    = ["host"]
fields  = "retries=3"
"#;

/// Config with a pattern that does not compile.
pub const CONFIG_BROKEN: &str = r#"
[rules]
filters = ["message~(unclosed"]
fields  = ["cpu"]
"#;
