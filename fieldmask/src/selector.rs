//! Selection of the masking rule that applies to a request.
//!
//! A source type is first looked up as an explicit token of a pattern key;
//! only when no key lists it does the entry containing [`WILDCARD`] apply.

use std::sync::Arc;

use crate::{
    config::{RuleEntry, RuleMap, WILDCARD},
    error::MaskError,
    policy::MaskingRule,
    registry::RuleRegistry,
};

/// Returns the rule id for `source_type`, falling back to the wildcard entry.
///
/// Entries are scanned in configuration order and the first match wins.
pub fn select_rule_id<'m>(map: &'m RuleMap, source_type: &str) -> Option<&'m str> {
    find_entry(map, source_type)
        .or_else(|| find_entry(map, WILDCARD))
        .map(RuleEntry::rule_id)
}

fn find_entry<'m>(map: &'m RuleMap, token: &str) -> Option<&'m RuleEntry> {
    if token.is_empty() {
        return None;
    }
    map.entries().find(|entry| entry.contains(token))
}

/// Resolves the masking rule for a request.
///
/// Fails with [`MaskError::MissingSelector`] for an empty source type,
/// [`MaskError::RuleNotFound`] when no pattern (explicit or wildcard)
/// matches, and [`MaskError::UnknownRule`] when the matched id is not in
/// `registry`.
pub fn resolve_rule(
    registry: &RuleRegistry,
    map: &RuleMap,
    source_type: &str,
) -> Result<Arc<dyn MaskingRule>, MaskError> {
    resolve_named_rule(registry, map, source_type).map(|(_, rule)| rule)
}

/// Like [`resolve_rule`], also returning the id the rule was selected by.
pub fn resolve_named_rule<'m>(
    registry: &RuleRegistry,
    map: &'m RuleMap,
    source_type: &str,
) -> Result<(&'m str, Arc<dyn MaskingRule>), MaskError> {
    if source_type.is_empty() {
        return Err(MaskError::MissingSelector);
    }
    let rule_id = select_rule_id(map, source_type).ok_or_else(|| MaskError::RuleNotFound {
        source_type: source_type.to_string(),
    })?;
    let rule = registry.get(rule_id).ok_or_else(|| MaskError::UnknownRule {
        rule_id: rule_id.to_string(),
    })?;
    Ok((rule_id, rule))
}
