//! Rule compilation errors.

use thiserror::Error;

/// Errors raised while compiling filter, tag and field rules.
///
/// Every variant is fatal to startup: an output whose rules fail to compile
/// never becomes active.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The rule (or the field name inside it) is empty after trimming.
    #[error("{kind} rule is empty")]
    Empty { kind: RuleKind },

    /// A `~` / `!~` pattern failed to compile.
    #[error("malformed pattern in rule {spec:?}: {source}")]
    MalformedPattern {
        spec: String,
        #[source]
        source: regex::Error,
    },

    /// A boolean field rule whose embedded matcher failed to compile.
    #[error("boolean mapper error in rule {spec:?}: {source}")]
    Mapper {
        spec: String,
        #[source]
        source: Box<RuleError>,
    },

    /// Positional context added when compiling a whole rule list.
    #[error("{list}[{index}]: {source}")]
    InList {
        list: &'static str,
        index: usize,
        #[source]
        source: Box<RuleError>,
    },
}

impl RuleError {
    /// The innermost error, skipping list and mapper wrappers.
    pub fn root_cause(&self) -> &RuleError {
        match self {
            RuleError::Mapper { source, .. } | RuleError::InList { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

/// Which grammar produced a [`RuleError::Empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Matcher,
    Mapper,
    Tag,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleKind::Matcher => write!(f, "matcher"),
            RuleKind::Mapper => write!(f, "mapper"),
            RuleKind::Tag => write!(f, "tag"),
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, RuleError>;
