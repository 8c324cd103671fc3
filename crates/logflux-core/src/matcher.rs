//! Field matchers: compiled, optionally negated predicates over one field.
//!
//! A matcher is built once by the [parser](crate::parser) and evaluated against
//! the value a record holds for [`Matcher::field`]. Evaluation never fails: a
//! missing value simply does not satisfy `Equals` or `Regex`.

use regex::Regex;
use serde_json::Value;

use crate::types::stringify;

/// What a matcher checks, before negation is applied.
#[derive(Debug, Clone)]
pub enum MatchKind {
    /// The field is present and not null.
    Exists,
    /// The stringified value equals a literal.
    Equals { value: String },
    /// The stringified value fully matches a pattern. The stored regex is
    /// already anchored.
    Regex(Regex),
}

/// A predicate over a single named field.
#[derive(Debug, Clone)]
pub struct Matcher {
    field: String,
    negate: bool,
    kind: MatchKind,
}

impl Matcher {
    pub fn exists(field: impl Into<String>, negate: bool) -> Self {
        Self {
            field: field.into(),
            negate,
            kind: MatchKind::Exists,
        }
    }

    pub fn equals(field: impl Into<String>, negate: bool, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            negate,
            kind: MatchKind::Equals {
                value: value.into(),
            },
        }
    }

    /// Compile `pattern` as a full-match regular expression.
    pub fn regex(
        field: impl Into<String>,
        negate: bool,
        pattern: &str,
    ) -> Result<Self, regex::Error> {
        let anchored = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self {
            field: field.into(),
            negate,
            kind: MatchKind::Regex(anchored),
        })
    }

    /// Name of the field this matcher reads.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }

    pub fn kind(&self) -> &MatchKind {
        &self.kind
    }

    /// Evaluate against the field's value (`None` when absent).
    pub fn matches(&self, value: Option<&Value>) -> bool {
        self.negate ^ self.kind_matches(value)
    }

    fn kind_matches(&self, value: Option<&Value>) -> bool {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return false;
        };
        match &self.kind {
            MatchKind::Exists => true,
            MatchKind::Equals { value: expected } => stringify(value) == *expected,
            MatchKind::Regex(re) => re.is_match(&stringify(value)),
        }
    }
}
