//! Registry of named masking rules.
//!
//! The registry is assembled once at start-up through [`RuleRegistryBuilder`]
//! and is read-only afterwards. Share it behind an `Arc`; lookups hand out
//! clones of the `Arc` wrapping each rule.

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    config::RuleMap,
    error::ConfigError,
    policy::{AlipayRule, MaskingRule},
};

/// Immutable mapping from rule id to masking rule.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<dyn MaskingRule>>,
}

impl RuleRegistry {
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::default()
    }

    /// Registry containing the rules shipped with this crate.
    pub fn with_builtin() -> Self {
        Self::builder().register(AlipayRule::ID, AlipayRule).build()
    }

    /// Looks up a rule by id.
    pub fn get(&self, rule_id: &str) -> Option<Arc<dyn MaskingRule>> {
        self.rules.get(rule_id).cloned()
    }

    pub fn contains(&self, rule_id: &str) -> bool {
        self.rules.contains_key(rule_id)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Verifies that every rule id referenced by `map` is registered.
    pub fn check(&self, map: &RuleMap) -> Result<(), ConfigError> {
        match map.rule_ids().find(|rule_id| !self.contains(rule_id)) {
            Some(rule_id) => Err(ConfigError::UnknownRule {
                rule_id: rule_id.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("RuleRegistry").field("rules", &ids).finish()
    }
}

/// Collects rules before freezing them into a [`RuleRegistry`].
#[derive(Default)]
pub struct RuleRegistryBuilder {
    rules: HashMap<String, Arc<dyn MaskingRule>>,
}

impl RuleRegistryBuilder {
    /// Registers `rule` under `rule_id`, replacing any earlier registration.
    #[must_use]
    pub fn register<R>(self, rule_id: impl Into<String>, rule: R) -> Self
    where
        R: MaskingRule + 'static,
    {
        self.register_shared(rule_id, Arc::new(rule))
    }

    /// Registers an already shared rule.
    #[must_use]
    pub fn register_shared(
        mut self,
        rule_id: impl Into<String>,
        rule: Arc<dyn MaskingRule>,
    ) -> Self {
        self.rules.insert(rule_id.into(), rule);
        self
    }

    pub fn build(self) -> RuleRegistry {
        RuleRegistry { rules: self.rules }
    }
}
