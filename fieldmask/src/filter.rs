//! Response filter glue for a request-processing pipeline.
//!
//! The host extracts the source type from the request, hands over the route's
//! [`PluginConfig`], and later feeds the buffered response body through the
//! [`PreparedMask`] returned by [`MaskingFilter::prepare`]. Every failure is
//! logged and turns into "send the original body".
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use fieldmask::{MaskingEngine, MaskingFilter, PluginConfig, RuleRegistry};
//!
//! let filter = MaskingFilter::new(Arc::new(RuleRegistry::with_builtin()), MaskingEngine::default());
//! let config = PluginConfig::from_json_str(
//!     r#"{"maskingRule":{"*":"aliRule"},"maskingTemplate":{"mobile":"phone"}}"#,
//! )
//! .unwrap();
//!
//! let prepared = filter.prepare(Some("ios"), &config).unwrap();
//! let body = prepared.apply_or_original(br#"{"mobile":"15011327983"}"#);
//! assert_eq!(&body[..], br#"{"mobile":"150******83"}"#);
//! ```

use std::{borrow::Cow, sync::Arc};

use tracing::{debug, warn};

use crate::{
    config::{FieldTemplate, PluginConfig},
    engine::{MaskedBody, MaskingEngine},
    error::MaskError,
    policy::MaskingRule,
    registry::RuleRegistry,
    selector::resolve_named_rule,
};

/// Request header carrying the source type.
pub const SOURCE_TYPE_HEADER: &str = "sourceType";

/// Returns the first non-empty [`SOURCE_TYPE_HEADER`] value.
///
/// Header names are compared case-insensitively.
pub fn source_type_from_headers<'h, I>(headers: I) -> Option<&'h str>
where
    I: IntoIterator<Item = (&'h str, &'h str)>,
{
    headers
        .into_iter()
        .find(|(name, value)| name.eq_ignore_ascii_case(SOURCE_TYPE_HEADER) && !value.is_empty())
        .map(|(_, value)| value)
}

/// Resolves masking for requests and applies it to their responses.
#[derive(Clone, Debug)]
pub struct MaskingFilter {
    registry: Arc<RuleRegistry>,
    engine: MaskingEngine,
}

impl MaskingFilter {
    pub fn new(registry: Arc<RuleRegistry>, engine: MaskingEngine) -> Self {
        Self { registry, engine }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Decides whether a request's response will be masked, and with what.
    ///
    /// This runs before any body bytes exist. The error explains why the
    /// response must pass through unchanged.
    pub fn prepare<'c>(
        &self,
        source_type: Option<&str>,
        config: &'c PluginConfig,
    ) -> Result<PreparedMask<'c>, MaskError> {
        let result = self.try_prepare(source_type, config);
        if let Err(err) = &result {
            warn!(
                reason = err.code(),
                source_type = source_type.unwrap_or_default(),
                error = %err,
                "response masking skipped"
            );
        }
        result
    }

    fn try_prepare<'c>(
        &self,
        source_type: Option<&str>,
        config: &'c PluginConfig,
    ) -> Result<PreparedMask<'c>, MaskError> {
        let source_type = source_type
            .filter(|value| !value.is_empty())
            .ok_or(MaskError::MissingSelector)?;
        let rule_map = config
            .masking_rule
            .as_ref()
            .ok_or(MaskError::MissingConfig {
                missing: "maskingRule",
            })?;
        let template = config
            .masking_template
            .as_ref()
            .ok_or(MaskError::MissingConfig {
                missing: "maskingTemplate",
            })?;
        let (rule_id, rule) = resolve_named_rule(&self.registry, rule_map, source_type)?;

        Ok(PreparedMask {
            source_type: source_type.to_string(),
            rule_id: rule_id.to_string(),
            rule,
            template,
            engine: self.engine,
        })
    }

    /// Runs the whole filter for one response, returning the bytes to send.
    pub fn filter<'b>(
        &self,
        source_type: Option<&str>,
        config: &PluginConfig,
        body: &'b [u8],
    ) -> Cow<'b, [u8]> {
        match self.prepare(source_type, config) {
            Ok(prepared) => prepared.apply_or_original(body),
            Err(_) => Cow::Borrowed(body),
        }
    }
}

/// Masking resolved for one request, waiting for its response body.
pub struct PreparedMask<'c> {
    source_type: String,
    rule_id: String,
    rule: Arc<dyn MaskingRule>,
    template: &'c FieldTemplate,
    engine: MaskingEngine,
}

impl PreparedMask<'_> {
    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    /// Id of the rule selected for this request.
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    pub fn rule(&self) -> &dyn MaskingRule {
        self.rule.as_ref()
    }

    /// Masks `body`, leaving the input untouched.
    pub fn apply(&self, body: &[u8]) -> Result<MaskedBody, MaskError> {
        let masked = self.engine.mask(body, self.template, self.rule.as_ref())?;
        debug!(
            source_type = %self.source_type,
            rule_id = %self.rule_id,
            original_length = body.len(),
            content_length = masked.content_length(),
            "response body masked"
        );
        Ok(masked)
    }

    /// Masks `body`, or returns it unchanged if masking is not possible.
    pub fn apply_or_original<'b>(&self, body: &'b [u8]) -> Cow<'b, [u8]> {
        match self.apply(body) {
            Ok(masked) => Cow::Owned(masked.into_bytes()),
            Err(err) => {
                warn!(
                    reason = err.code(),
                    source_type = %self.source_type,
                    rule_id = %self.rule_id,
                    error = %err,
                    "response masking failed, sending original body"
                );
                Cow::Borrowed(body)
            }
        }
    }
}

impl std::fmt::Debug for PreparedMask<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedMask")
            .field("source_type", &self.source_type)
            .field("rule_id", &self.rule_id)
            .field("template", &self.template)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}
