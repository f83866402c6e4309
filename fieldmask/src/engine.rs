//! Parse, mask and re-serialize a response body.

use std::panic::{AssertUnwindSafe, catch_unwind};

use serde_json::Value;

use crate::{
    config::{EngineOptions, FieldTemplate},
    error::MaskError,
    policy::MaskingRule,
    traverse::mask_document,
};

/// A masked response body ready to replace the original.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskedBody {
    text: String,
}

impl MaskedBody {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte length of the masked body, for the `Content-Length` header.
    pub fn content_length(&self) -> usize {
        self.text.len()
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.text.into_bytes()
    }
}

/// Stateless masking entry point.
///
/// The engine holds only its options, so one instance can serve any number
/// of concurrent responses. The body passed in is never modified.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaskingEngine {
    options: EngineOptions,
}

impl MaskingEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Masks a UTF-8 JSON body.
    ///
    /// Empty bodies and bodies that are not JSON yield an error; the caller
    /// is expected to send the original bytes unchanged in that case.
    pub fn mask(
        &self,
        body: &[u8],
        template: &FieldTemplate,
        rule: &dyn MaskingRule,
    ) -> Result<MaskedBody, MaskError> {
        if body.is_empty() {
            return Err(MaskError::EmptyBody);
        }
        let mut document: Value = serde_json::from_slice(body).map_err(MaskError::Parse)?;
        self.mask_value(&mut document, template, rule)?;
        let text = serde_json::to_string(&document).map_err(MaskError::Serialize)?;
        Ok(MaskedBody { text })
    }

    /// Masks a body held as text.
    pub fn mask_str(
        &self,
        body: &str,
        template: &FieldTemplate,
        rule: &dyn MaskingRule,
    ) -> Result<MaskedBody, MaskError> {
        self.mask(body.as_bytes(), template, rule)
    }

    /// Masks an already parsed document in place.
    ///
    /// A panic inside `rule` is caught and reported as
    /// [`MaskError::Internal`]. On any error `value` may be partially masked.
    pub fn mask_value(
        &self,
        value: &mut Value,
        template: &FieldTemplate,
        rule: &dyn MaskingRule,
    ) -> Result<(), MaskError> {
        let max_depth = self.options.max_depth;
        catch_unwind(AssertUnwindSafe(|| {
            mask_document(value, template, rule, max_depth)
        }))
        .unwrap_or(Err(MaskError::Internal))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::policy::{AlipayRule, MaskKind};

    fn template() -> FieldTemplate {
        FieldTemplate::new()
            .with_field("phone", MaskKind::Phone)
            .with_field("name", MaskKind::Name)
    }

    struct Exploding;

    impl MaskingRule for Exploding {
        fn default_out(&self, _value: &str) -> String {
            panic!("masker failure")
        }
        fn id_card(&self, value: &str) -> String {
            self.default_out(value)
        }
        fn name(&self, value: &str) -> String {
            self.default_out(value)
        }
        fn phone(&self, value: &str) -> String {
            self.default_out(value)
        }
    }

    #[test]
    fn masks_and_reports_byte_length() {
        let engine = MaskingEngine::default();
        let masked = engine
            .mask_str(r#"{"name":"锦江酒店","phone":"15011327983"}"#, &template(), &AlipayRule)
            .unwrap();
        assert_eq!(masked.text(), r#"{"name":"***店","phone":"150******83"}"#);
        assert_eq!(masked.content_length(), masked.text().len());
        assert_eq!(masked.content_length(), 39);
    }

    #[test]
    fn keeps_field_order() {
        let engine = MaskingEngine::default();
        let masked = engine
            .mask_str(r#"{"z":1,"phone":"88157923","a":2}"#, &template(), &AlipayRule)
            .unwrap();
        assert_eq!(masked.text(), r#"{"z":1,"phone":"881***23","a":2}"#);
    }

    #[test]
    fn empty_body_is_not_masked() {
        let engine = MaskingEngine::default();
        let err = engine.mask(b"", &template(), &AlipayRule).unwrap_err();
        assert!(matches!(err, MaskError::EmptyBody));
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let engine = MaskingEngine::default();
        let err = engine.mask(b"{not json", &template(), &AlipayRule).unwrap_err();
        assert!(matches!(err, MaskError::Parse(_)));
        assert!(err.is_parse_error());
    }

    #[test]
    fn non_utf8_body_is_a_parse_error() {
        let engine = MaskingEngine::default();
        let err = engine
            .mask(b"{\"phone\":\"\xff\xfe\"}", &template(), &AlipayRule)
            .unwrap_err();
        assert!(matches!(err, MaskError::Parse(_)));
    }

    #[test]
    fn depth_limit_comes_from_options() {
        let engine = MaskingEngine::new(EngineOptions::default().with_max_depth(1));
        let err = engine
            .mask_str(r#"{"a":{"b":{"phone":"15011327983"}}}"#, &template(), &AlipayRule)
            .unwrap_err();
        assert!(matches!(err, MaskError::DepthExceeded { limit: 1 }));
        assert!(err.is_parse_error());
    }

    #[test]
    fn panicking_rule_is_contained() {
        let engine = MaskingEngine::default();
        let mut doc = json!({"phone": "15011327983"});
        let err = engine.mask_value(&mut doc, &template(), &Exploding).unwrap_err();
        assert!(matches!(err, MaskError::Internal));
    }

    #[test]
    fn scalar_documents_round_trip() {
        let engine = MaskingEngine::default();
        let masked = engine.mask_str("42", &template(), &AlipayRule).unwrap();
        assert_eq!(masked.text(), "42");
    }
}
