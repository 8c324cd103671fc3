//! Rule grammar — compiles configuration strings into matchers and mappers.
//!
//! # Matcher grammar
//!
//! Operators are tried longest-first because `!=` contains `=` and `!~`
//! contains `~`. Each operator only counts when its first occurrence is past
//! the start of the (trimmed) spec.
//!
//! | Spec | Matcher |
//! |------|---------|
//! | `key!=value` | negated string equality |
//! | `key=value` | string equality |
//! | `key!~pattern` | negated full-match regex |
//! | `key~pattern` | full-match regex |
//! | `!key` | field is absent |
//! | `key` | field is present |
//!
//! # Mapper grammar
//!
//! A spec with `=` or `~` past position 0 becomes a boolean mapper over the
//! matcher it describes; anything else is an identity mapper over a field name.
//!
//! # Required flag
//!
//! Tag and field rules accept a leading `+` (`+host`, `+status=ok`). A record
//! missing a required tag or field is dropped instead of having that entry
//! omitted.

use crate::error::{Result, RuleError, RuleKind};
use crate::mapper::Mapper;
use crate::matcher::Matcher;
use crate::rules::{FieldRule, TagRule};

const REQUIRED_PREFIX: char = '+';

/// Compile a filter spec into a [`Matcher`].
pub fn parse_matcher(spec: &str) -> Result<Matcher> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(RuleError::Empty {
            kind: RuleKind::Matcher,
        });
    }

    if let Some((key, value)) = split_operator(spec, "!=") {
        return Ok(Matcher::equals(non_empty_key(key)?, true, value));
    }
    if let Some((key, value)) = split_operator(spec, "=") {
        return Ok(Matcher::equals(non_empty_key(key)?, false, value));
    }
    if let Some((key, pattern)) = split_operator(spec, "!~") {
        return regex_matcher(spec, non_empty_key(key)?, true, pattern);
    }
    if let Some((key, pattern)) = split_operator(spec, "~") {
        return regex_matcher(spec, non_empty_key(key)?, false, pattern);
    }
    if let Some(rest) = spec.strip_prefix('!') {
        return Ok(Matcher::exists(non_empty_key(rest)?, true));
    }
    Ok(Matcher::exists(spec, false))
}

/// Compile a field spec into a [`Mapper`].
pub fn parse_mapper(spec: &str) -> Result<Mapper> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(RuleError::Empty {
            kind: RuleKind::Mapper,
        });
    }

    if operator_position(spec, "=").is_some() || operator_position(spec, "~").is_some() {
        return parse_matcher(spec)
            .map(Mapper::Boolean)
            .map_err(|source| RuleError::Mapper {
                spec: spec.to_string(),
                source: Box::new(source),
            });
    }
    Ok(Mapper::identity(spec))
}

/// Compile a tag spec: a field name with an optional leading `+`.
pub fn parse_tag_rule(spec: &str) -> Result<TagRule> {
    let (required, field) = strip_required(spec);
    if field.is_empty() {
        return Err(RuleError::Empty {
            kind: RuleKind::Tag,
        });
    }
    Ok(TagRule {
        field: field.to_string(),
        required,
    })
}

/// Compile a field spec with an optional leading `+`.
pub fn parse_field_rule(spec: &str) -> Result<FieldRule> {
    let (required, rest) = strip_required(spec);
    Ok(FieldRule {
        mapper: parse_mapper(rest)?,
        required,
    })
}

fn strip_required(spec: &str) -> (bool, &str) {
    let spec = spec.trim();
    match spec.strip_prefix(REQUIRED_PREFIX) {
        Some(rest) => (true, rest.trim()),
        None => (false, spec),
    }
}

/// Byte offset of the first occurrence of `op`, when it is past position 0.
fn operator_position(spec: &str, op: &str) -> Option<usize> {
    spec.find(op).filter(|&pos| pos > 0)
}

fn split_operator<'s>(spec: &'s str, op: &str) -> Option<(&'s str, &'s str)> {
    operator_position(spec, op)
        .map(|pos| (spec[..pos].trim(), spec[pos + op.len()..].trim()))
}

fn non_empty_key(key: &str) -> Result<&str> {
    let key = key.trim();
    if key.is_empty() {
        Err(RuleError::Empty {
            kind: RuleKind::Matcher,
        })
    } else {
        Ok(key)
    }
}

fn regex_matcher(spec: &str, key: &str, negate: bool, pattern: &str) -> Result<Matcher> {
    Matcher::regex(key, negate, pattern).map_err(|source| RuleError::MalformedPattern {
        spec: spec.to_string(),
        source,
    })
}
