//! Error types.
//!
//! None of these errors is fatal to a response: every [`MaskError`] means
//! "leave the original body as it is". [`ConfigError`] is raised while
//! loading configuration and surfaces through [`MaskError::InvalidConfig`].

/// Reasons masking was not performed for a response.
#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    /// The request carried no source-type identifier.
    #[error("request has no source type")]
    MissingSelector,

    /// The route configuration lacks the rule map or the field template.
    #[error("masking configuration is missing `{missing}`")]
    MissingConfig { missing: &'static str },

    /// The route configuration was present but could not be loaded.
    #[error("invalid masking configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Neither an exact nor a wildcard pattern matched the source type.
    #[error("no masking rule matches source type `{source_type}`")]
    RuleNotFound { source_type: String },

    /// A pattern matched but its rule id is not registered.
    #[error("masking rule `{rule_id}` is not registered")]
    UnknownRule { rule_id: String },

    /// The response body was empty.
    #[error("response body is empty")]
    EmptyBody,

    /// The response body is not a JSON document.
    #[error("response body is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// The document nests deeper than the configured limit.
    #[error("document nesting exceeds the limit of {limit}")]
    DepthExceeded { limit: usize },

    /// The masked document could not be written back to text.
    #[error("failed to serialize masked document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A masking rule panicked while the document was being traversed.
    #[error("masking rule failed while traversing the document")]
    Internal,
}

impl MaskError {
    /// Stable identifier for logs and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            MaskError::MissingSelector => "missing_selector",
            MaskError::MissingConfig { .. } => "missing_config",
            MaskError::InvalidConfig(_) => "invalid_config",
            MaskError::RuleNotFound { .. } => "rule_not_found",
            MaskError::UnknownRule { .. } => "unknown_rule",
            MaskError::EmptyBody => "empty_body",
            MaskError::Parse(_) => "parse_error",
            MaskError::DepthExceeded { .. } => "depth_exceeded",
            MaskError::Serialize(_) => "serialize_error",
            MaskError::Internal => "internal",
        }
    }

    /// Returns `true` when the body itself could not be used as a document.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            MaskError::EmptyBody | MaskError::Parse(_) | MaskError::DepthExceeded { .. }
        )
    }
}

/// Problems found while loading masking configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The same source-type token appears under two pattern keys.
    #[error("source type `{token}` appears in both `{first}` and `{second}`")]
    OverlappingPattern {
        token: String,
        first: String,
        second: String,
    },

    /// A pattern key contains no source-type tokens.
    #[error("pattern `{pattern}` contains no source types")]
    EmptyPattern { pattern: String },

    /// The rule map references a rule id that is not registered.
    #[error("rule map references unregistered rule `{rule_id}`")]
    UnknownRule { rule_id: String },

    /// The configuration is not shaped as expected.
    #[error("malformed masking configuration: {0}")]
    Json(#[from] serde_json::Error),
}
