//! Limit projection
//!
//! Translates a policy's limit rules (quantities still in string form)
//! into the resolved entries an enforcement object carries. All-or-nothing:
//! the first unparsable quantity aborts the whole projection, so a
//! partially valid rule set never produces a partial object.

use limitgate_model::{LimitRule, Quantity, QuantityError, ResolvedLimit};
use std::collections::BTreeMap;
use thiserror::Error;

/// A quantity in a limit rule failed to parse
///
/// Identifies the offending rule, map, resource name and raw value so the
/// operator can fix the policy without guesswork.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("limit rule {rule_index} ({kind}): {field}[{resource}] = {value:?}: {source}")]
pub struct ProjectionError {
    pub rule_index: usize,
    pub kind: String,
    pub field: &'static str,
    pub resource: String,
    pub value: String,
    #[source]
    pub source: QuantityError,
}

fn parse_map(
    rule_index: usize,
    kind: &str,
    field: &'static str,
    entries: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, Quantity>, ProjectionError> {
    let mut parsed = BTreeMap::new();
    for (resource, value) in entries {
        let quantity = Quantity::parse(value).map_err(|source| ProjectionError {
            rule_index,
            kind: kind.to_string(),
            field,
            resource: resource.clone(),
            value: value.clone(),
            source,
        })?;
        parsed.insert(resource.clone(), quantity);
    }
    Ok(parsed)
}

/// Project limit rules into resolved entries
///
/// Rule order is preserved; enforcement semantics downstream may be
/// order-sensitive.
pub fn project(rules: &[LimitRule]) -> Result<Vec<ResolvedLimit>, ProjectionError> {
    let mut resolved = Vec::with_capacity(rules.len());
    for (rule_index, rule) in rules.iter().enumerate() {
        let kind = rule.kind.as_str();
        resolved.push(ResolvedLimit {
            kind: rule.kind.clone(),
            default: parse_map(rule_index, kind, "default", &rule.default)?,
            default_request: parse_map(rule_index, kind, "defaultRequest", &rule.default_request)?,
            max: parse_map(rule_index, kind, "max", &rule.max)?,
            min: parse_map(rule_index, kind, "min", &rule.min)?,
        });
    }
    Ok(resolved)
}
