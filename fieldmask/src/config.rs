//! Masking configuration as supplied by route configuration.
//!
//! A route carries a plugin configuration object of the form
//!
//! ```json
//! {
//!   "maskingRule": { "web,ios": "aliRule", "*": "aliRule" },
//!   "maskingTemplate": { "mobile": "phone", "idNo": "idcard", "realName": "name" }
//! }
//! ```
//!
//! [`RuleMap`] and [`FieldTemplate`] are immutable once loaded and are
//! consulted read-only for each response.

use std::{collections::HashMap, fmt};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

use crate::{error::ConfigError, policy::MaskKind};

/// Token in a pattern key that matches any source type.
pub const WILDCARD: &str = "*";

/// Nesting limit applied when no other is configured.
///
/// Matches the recursion limit of the `serde_json` parser.
pub const DEFAULT_MAX_DEPTH: usize = 128;

// =============================================================================
// RuleMap
// =============================================================================

/// Splits a pattern key into its source-type tokens.
///
/// Full-width commas (`，`) separate tokens like ASCII commas. Tokens are
/// trimmed and empty tokens are dropped.
pub fn split_pattern(pattern: &str) -> Vec<String> {
    pattern
        .split([',', '，'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// One `pattern key -> rule id` entry of a [`RuleMap`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleEntry {
    pattern: String,
    tokens: Vec<String>,
    rule_id: String,
}

impl RuleEntry {
    /// The pattern key as written in configuration.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// Returns `true` if `token` is one of this entry's source types.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|candidate| candidate == token)
    }
}

/// Ordered mapping from source-type pattern keys to masking rule ids.
///
/// Entries keep configuration order. Loading rejects configurations where a
/// source type (including [`WILDCARD`]) is listed under more than one key, so
/// at most one entry can match any token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleMap {
    entries: Vec<RuleEntry>,
}

impl RuleMap {
    /// Builds a rule map from `(pattern key, rule id)` pairs in order.
    pub fn try_from_entries<I, K, V>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut owners: HashMap<String, String> = HashMap::new();
        let mut built = Vec::new();

        for (pattern, rule_id) in entries {
            let pattern = pattern.into();
            let tokens = split_pattern(&pattern);
            if tokens.is_empty() {
                return Err(ConfigError::EmptyPattern { pattern });
            }
            for token in &tokens {
                match owners.get(token) {
                    Some(owner) if *owner != pattern => {
                        return Err(ConfigError::OverlappingPattern {
                            token: token.clone(),
                            first: owner.clone(),
                            second: pattern,
                        });
                    }
                    Some(_) => {}
                    None => {
                        owners.insert(token.clone(), pattern.clone());
                    }
                }
            }
            built.push(RuleEntry {
                pattern,
                tokens,
                rule_id: rule_id.into(),
            });
        }

        Ok(Self { entries: built })
    }

    /// Entries in configuration order.
    pub fn entries(&self) -> impl Iterator<Item = &RuleEntry> {
        self.entries.iter()
    }

    /// Rule ids referenced by this map, in configuration order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(RuleEntry::rule_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct RuleMapVisitor;

impl<'de> Visitor<'de> for RuleMapVisitor {
    type Value = RuleMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of source-type patterns to rule ids")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        while let Some(entry) = access.next_entry::<String, String>()? {
            entries.push(entry);
        }
        RuleMap::try_from_entries(entries).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for RuleMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RuleMapVisitor)
    }
}

impl Serialize for RuleMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.pattern, &entry.rule_id)?;
        }
        map.end()
    }
}

// =============================================================================
// FieldTemplate
// =============================================================================

/// Mapping from JSON field names to the kind of masking they receive.
///
/// Template values that are not a known [`MaskKind`] token are dropped when
/// the template is loaded; such fields pass through unmasked.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldTemplate {
    fields: HashMap<String, MaskKind>,
}

impl FieldTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the mask kind for `field`.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, kind: MaskKind) -> Self {
        self.fields.insert(field.into(), kind);
        self
    }

    /// Returns the mask kind configured for `field`, if any.
    pub fn kind_for(&self, field: &str) -> Option<MaskKind> {
        self.fields.get(field).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, MaskKind)> for FieldTemplate {
    fn from_iter<I: IntoIterator<Item = (K, MaskKind)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<'de> Deserialize<'de> for FieldTemplate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(field, token)| {
                let kind = MaskKind::from_token(token.as_str()?)?;
                Some((field, kind))
            })
            .collect())
    }
}

// =============================================================================
// PluginConfig
// =============================================================================

/// Per-route masking configuration.
///
/// Both parts are optional at load time; a route missing either one is not
/// masked.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masking_rule: Option<RuleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masking_template: Option<FieldTemplate>,
}

impl PluginConfig {
    /// Parses the plugin configuration object from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads the plugin configuration from an already parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }
}

// =============================================================================
// EngineOptions
// =============================================================================

/// Tuning knobs for [`MaskingEngine`](crate::MaskingEngine).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
    /// Deepest container nesting the traversal accepts. The root document is
    /// at depth 0.
    pub max_depth: usize,
}

impl EngineOptions {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
