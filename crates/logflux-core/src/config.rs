//! Configuration types for logflux.
//!
//! [`Config::load`] layers, in order: the embedded defaults, the user's
//! config file (`$XDG_CONFIG_HOME/logflux/config.toml` unless a path is
//! given), and `LOGFLUX_*` environment variables (`LOGFLUX_OUTPUT__DATABASE`,
//! `LOGFLUX_RULES__FILTERS`, ...). [`Config::defaults`] returns the embedded
//! defaults without touching the filesystem or environment.
//!
//! Rule lists accept either a TOML array or a single comma-separated string.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RuleError;
use crate::rules::RuleSet;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[output]
url         = "http://localhost:8086"
username    = ""
password    = ""
database    = "graylog"
measurement = "graylog"

[rules]
filters = []
tags    = []
fields  = []
"#;

const ENV_PREFIX: &str = "LOGFLUX";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub rules: RulesConfig,
}

/// `[output]` section: where points go and under which measurement.
#[derive(Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_measurement")]
    pub measurement: String,
}

fn default_url() -> String { "http://localhost:8086".to_string() }
fn default_database() -> String { "graylog".to_string() }
fn default_measurement() -> String { "graylog".to_string() }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            username: String::new(),
            password: String::new(),
            database: default_database(),
            measurement: default_measurement(),
        }
    }
}

impl std::fmt::Debug for OutputConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("database", &self.database)
            .field("measurement", &self.measurement)
            .finish()
    }
}

/// `[rules]` section: raw, uncompiled rule specs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesConfig {
    #[serde(default, deserialize_with = "string_list")]
    pub filters: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub fields: Vec<String>,
}

impl RulesConfig {
    /// Compile into an immutable [`RuleSet`].
    pub fn compile(&self) -> Result<RuleSet, RuleError> {
        RuleSet::compile(&self.filters, &self.tags, &self.fields)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load configuration layered over the built-in defaults.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let path = path.map_or_else(config_path, Path::to_path_buf);

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Parse a TOML document layered over the built-in defaults.
    pub fn from_toml(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Describe every configuration key for a host UI.
    pub fn schema() -> Vec<ConfigField> {
        vec![
            ConfigField::text("output.url", "Server URL", "http://localhost:8086", "URL of the time-series server", false),
            ConfigField::text("output.username", "Username", "", "Username to connect to the database", true),
            ConfigField::text("output.password", "Password", "", "Password to connect to the database", true).secret(),
            ConfigField::text("output.database", "Database", "graylog", "Database name", false),
            ConfigField::text("output.measurement", "Measurement", "graylog", "Measurement name", false),
            ConfigField::list(
                "rules.filters",
                "Filters",
                "Filters on source fields (name and optional value). A name can be prefixed by ! to negate the match. \
                 A value to match can be given (eg. my_field=myvalue or my_field~myregexp).",
                true,
            ),
            ConfigField::list(
                "rules.tags",
                "Extract tags",
                "Source fields to use as tags (name). Prefix with + to drop records lacking the field.",
                true,
            ),
            ConfigField::list(
                "rules.fields",
                "Extract fields",
                "Source fields to use as values (name and optional value). A non-numeric field can be converted \
                 to 0 or 1 by matching its value (eg. text_field=myvalue or text_field~myregexp). \
                 Prefix with + to drop records lacking the field.",
                false,
            ),
        ]
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Kind of input a host UI should render for a [`ConfigField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    List,
}

/// Descriptor of one configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigField {
    pub key: &'static str,
    pub title: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub default: serde_json::Value,
    pub description: &'static str,
    pub optional: bool,
    pub secret: bool,
}

impl ConfigField {
    fn text(
        key: &'static str,
        title: &'static str,
        default: &'static str,
        description: &'static str,
        optional: bool,
    ) -> Self {
        Self {
            key,
            title,
            field_type: FieldType::Text,
            default: default.into(),
            description,
            optional,
            secret: false,
        }
    }

    fn list(key: &'static str, title: &'static str, description: &'static str, optional: bool) -> Self {
        Self {
            key,
            title,
            field_type: FieldType::List,
            default: serde_json::Value::Array(Vec::new()),
            description,
            optional,
            secret: false,
        }
    }

    fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum StringList {
    List(Vec<String>),
    Joined(String),
}

/// Accept `["a", "b"]` or `"a, b"`. Array entries pass through as written.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringList::deserialize(deserializer)? {
        StringList::List(items) => items,
        // A blank joined string means no rules; a trailing comma is tolerated.
        StringList::Joined(joined) => {
            let mut items: Vec<String> = joined.split(',').map(|s| s.trim().to_string()).collect();
            if items.last().is_some_and(String::is_empty) {
                items.pop();
            }
            items
        }
    })
}

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("logflux")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
