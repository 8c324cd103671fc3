//! The compiled rule set driving point construction.

use crate::error::{Result, RuleError};
use crate::mapper::Mapper;
use crate::matcher::Matcher;
use crate::parser;

/// A record field copied into the point's tag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRule {
    pub field: String,
    /// Drop records that lack the field instead of omitting the tag.
    pub required: bool,
}

/// A record field mapped into the point's field set.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub mapper: Mapper,
    /// Drop records whose mapped value is null instead of omitting the field.
    pub required: bool,
}

/// Filters, tag rules and field rules, compiled once and never mutated.
///
/// A `RuleSet` holds no interior mutability, so one instance can be shared
/// by reference across any number of concurrent [`build`](crate::build) calls.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    filters: Vec<Matcher>,
    tags: Vec<TagRule>,
    fields: Vec<FieldRule>,
}

impl RuleSet {
    /// Compile the three rule lists. The first invalid rule aborts the whole
    /// compilation; there is no partially compiled rule set.
    pub fn compile<F, T, M>(filters: F, tags: T, fields: M) -> Result<Self>
    where
        F: IntoIterator,
        F::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
        M: IntoIterator,
        M::Item: AsRef<str>,
    {
        let filters = compile_list("filters", filters, parser::parse_matcher)?;
        let tag_rules = compile_list("tags", tags, parser::parse_tag_rule)?;
        let fields = compile_list("fields", fields, parser::parse_field_rule)?;

        Ok(Self {
            filters,
            tags: dedup_tags(tag_rules),
            fields,
        })
    }

    /// Filters in configuration order.
    pub fn filters(&self) -> &[Matcher] {
        &self.filters
    }

    /// Tag rules, one per distinct field name, sorted by name.
    pub fn tags(&self) -> &[TagRule] {
        &self.tags
    }

    /// Field rules in configuration order.
    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.tags.is_empty() && self.fields.is_empty()
    }
}

fn compile_list<I, T>(
    list: &'static str,
    specs: I,
    parse: impl Fn(&str) -> Result<T>,
) -> Result<Vec<T>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    specs
        .into_iter()
        .enumerate()
        .map(|(index, spec)| {
            parse(spec.as_ref()).map_err(|source| RuleError::InList {
                list,
                index,
                source: Box::new(source),
            })
        })
        .collect()
}

/// Tag fields form a set. A name listed twice is required if any listing is.
fn dedup_tags(mut rules: Vec<TagRule>) -> Vec<TagRule> {
    rules.sort_by(|a, b| a.field.cmp(&b.field).then(b.required.cmp(&a.required)));
    rules.dedup_by(|next, kept| next.field == kept.field);
    rules
}
