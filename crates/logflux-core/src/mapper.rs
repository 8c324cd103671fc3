//! Field mappers: the value written into a point for one source field.

use std::borrow::Cow;

use serde_json::Value;

use crate::matcher::Matcher;

/// Transform applied to a field's value before it is coerced into a
/// [`FieldValue`](crate::FieldValue).
#[derive(Debug, Clone)]
pub enum Mapper {
    /// Pass the raw value through.
    Identity { field: String },
    /// `1` when the embedded matcher matches, `0` otherwise.
    Boolean(Matcher),
}

impl Mapper {
    pub fn identity(field: impl Into<String>) -> Self {
        Self::Identity {
            field: field.into(),
        }
    }

    /// Source field, which is also the key of the produced point field.
    pub fn field(&self) -> &str {
        match self {
            Mapper::Identity { field } => field,
            Mapper::Boolean(matcher) => matcher.field(),
        }
    }

    /// Map the field's value. `None` means nothing to store.
    pub fn map<'v>(&self, value: Option<&'v Value>) -> Option<Cow<'v, Value>> {
        match self {
            Mapper::Identity { .. } => value.filter(|v| !v.is_null()).map(Cow::Borrowed),
            Mapper::Boolean(matcher) => {
                let flag = i64::from(matcher.matches(value));
                Some(Cow::Owned(Value::from(flag)))
            }
        }
    }
}
