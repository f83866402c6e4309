//! Recursive masking of a parsed JSON document.
//!
//! Only string values sitting directly under an object field listed in the
//! [`FieldTemplate`] change. Objects and arrays are walked but never masked
//! themselves, and array elements are only reached through the objects they
//! contain. The document keeps its shape: same keys, same array lengths, same
//! node kinds.

use serde_json::Value;

use crate::{config::FieldTemplate, error::MaskError, policy::MaskingRule};

/// Applies `template` with `rule` to every object in `value`.
///
/// Containers nested deeper than `max_depth` (the root is depth 0) abort the
/// walk with [`MaskError::DepthExceeded`]; the document may then be partially
/// masked and should be discarded.
pub fn mask_document(
    value: &mut Value,
    template: &FieldTemplate,
    rule: &dyn MaskingRule,
    max_depth: usize,
) -> Result<(), MaskError> {
    Traversal {
        template,
        rule,
        max_depth,
    }
    .visit(value, 0)
}

struct Traversal<'a> {
    template: &'a FieldTemplate,
    rule: &'a dyn MaskingRule,
    max_depth: usize,
}

impl Traversal<'_> {
    fn visit(&self, value: &mut Value, depth: usize) -> Result<(), MaskError> {
        match value {
            Value::Object(map) => {
                self.enter(depth)?;
                for (field, child) in map.iter_mut() {
                    match child {
                        Value::String(text) => {
                            if let Some(kind) = self.template.kind_for(field) {
                                let masked = self.rule.apply(kind, text);
                                *text = masked;
                            }
                        }
                        _ => self.visit(child, depth + 1)?,
                    }
                }
                Ok(())
            }
            Value::Array(items) => {
                self.enter(depth)?;
                for item in items {
                    self.visit(item, depth + 1)?;
                }
                Ok(())
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(()),
        }
    }

    fn enter(&self, depth: usize) -> Result<(), MaskError> {
        if depth > self.max_depth {
            return Err(MaskError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::policy::{AlipayRule, MaskKind};

    fn phone_template() -> FieldTemplate {
        FieldTemplate::new().with_field("b", MaskKind::Phone)
    }

    #[test]
    fn masks_matching_fields_at_every_depth() {
        let mut doc = json!({
            "a": {"b": "15011327983", "c": 1},
            "d": [{"b": "15011327983"}]
        });
        mask_document(&mut doc, &phone_template(), &AlipayRule, 16).unwrap();
        assert_eq!(
            doc,
            json!({
                "a": {"b": "150******83", "c": 1},
                "d": [{"b": "150******83"}]
            })
        );
    }

    #[test]
    fn non_string_values_are_never_masked() {
        let mut doc = json!({
            "b": 15011327983_u64,
            "list": [{"b": true}, {"b": null}, {"b": 1.5}]
        });
        let expected = doc.clone();
        mask_document(&mut doc, &phone_template(), &AlipayRule, 16).unwrap();
        assert_eq!(doc, expected);
    }

    #[test]
    fn matched_containers_are_recursed_not_masked() {
        let template = FieldTemplate::new()
            .with_field("contact", MaskKind::Blank)
            .with_field("mobile", MaskKind::Phone);
        let mut doc = json!({
            "contact": {"mobile": "15011327983", "contact": "x"},
            "items": ["15011327983", {"mobile": "88157923"}]
        });
        mask_document(&mut doc, &template, &AlipayRule, 16).unwrap();
        assert_eq!(
            doc,
            json!({
                "contact": {"mobile": "150******83", "contact": ""},
                "items": ["15011327983", {"mobile": "881***23"}]
            })
        );
    }

    #[test]
    fn scalar_root_is_left_alone() {
        let mut doc = json!("15011327983");
        mask_document(&mut doc, &phone_template(), &AlipayRule, 16).unwrap();
        assert_eq!(doc, json!("15011327983"));
    }

    #[test]
    fn empty_template_changes_nothing() {
        let mut doc = json!({"b": "15011327983", "nested": [{"b": "x"}]});
        let expected = doc.clone();
        mask_document(&mut doc, &FieldTemplate::new(), &AlipayRule, 16).unwrap();
        assert_eq!(doc, expected);
    }

    #[test]
    fn depth_limit_counts_nested_containers() {
        // object(0) -> array(1) -> object(2)
        let mut doc = json!({"d": [{"b": "15011327983"}]});
        assert!(mask_document(&mut doc, &phone_template(), &AlipayRule, 2).is_ok());

        let mut doc = json!({"d": [{"b": "15011327983"}]});
        let err = mask_document(&mut doc, &phone_template(), &AlipayRule, 1).unwrap_err();
        assert!(matches!(err, MaskError::DepthExceeded { limit: 1 }));
    }

    #[test]
    fn scalars_below_the_limit_do_not_count() {
        let mut doc = json!({"b": "15011327983"});
        assert!(mask_document(&mut doc, &phone_template(), &AlipayRule, 0).is_ok());
        assert_eq!(doc, json!({"b": "150******83"}));
    }
}
