//! End-to-end tests for the public masking API.
//!
//! These tests exercise the integration of:
//! - rule selection from a source type with wildcard fallback,
//! - JSON traversal driven by a field template, and
//! - the built-in masking rule.

use fieldmask::{
    AlipayRule, EngineOptions, FieldTemplate, MASK_CHAR, MaskError, MaskKind, MaskingEngine,
    MaskingRule, PluginConfig, RuleMap, RuleRegistry, resolve_rule, select_rule_id,
};
use serde_json::{Value, json};

fn mask_json(body: &Value, template: &FieldTemplate) -> Value {
    let text = serde_json::to_string(body).unwrap();
    let masked = MaskingEngine::default()
        .mask_str(&text, template, &AlipayRule)
        .unwrap();
    serde_json::from_str(masked.text()).unwrap()
}

mod string_maskers {
    use super::*;

    #[test]
    fn phone_numbers() {
        assert_eq!(AlipayRule.phone("15011327983"), "150******83");
        assert_eq!(AlipayRule.phone("88157923"), "881***23");
    }

    #[test]
    fn id_cards_keep_only_outer_characters() {
        for value in ["211330199010105551", "432815157233119"] {
            let masked: Vec<char> = AlipayRule.id_card(value).chars().collect();
            let original: Vec<char> = value.chars().collect();
            assert_eq!(masked.len(), original.len());
            assert_eq!(masked[0], original[0]);
            assert_eq!(masked[masked.len() - 1], original[original.len() - 1]);
            assert!(masked[1..masked.len() - 1].iter().all(|&ch| ch == MASK_CHAR));
        }
        assert_eq!(AlipayRule.id_card("2231898"), AlipayRule.default_out("2231898"));
    }

    #[test]
    fn default_out_window_for_every_length() {
        let source = "abcdefghijklmnopqrstuvwxyz";
        for len in 0..=source.len() {
            let value = &source[..len];
            let masked: Vec<char> = AlipayRule.default_out(value).chars().collect();
            assert_eq!(masked.len(), len);

            let (first, last) = if len % 3 == 0 {
                (len / 3, len / 3)
            } else {
                (len / 3 + 1, len / 3)
            };
            for (i, (masked_ch, original_ch)) in masked.iter().zip(value.chars()).enumerate() {
                if i >= first && i < len - last {
                    assert_eq!(*masked_ch, MASK_CHAR, "len {len} index {i}");
                } else {
                    assert_eq!(*masked_ch, original_ch, "len {len} index {i}");
                }
            }
        }
    }

    #[test]
    fn names() {
        assert_eq!(AlipayRule.name("锦江酒店"), "***店");
        assert_eq!(AlipayRule.name("JinJiang Online"), "* Online");
    }

    #[test]
    fn blank() {
        assert_eq!(AlipayRule.blank("this is blank text"), "");
        assert_eq!(AlipayRule.blank(""), "");
    }
}

mod traversal {
    use super::*;

    #[test]
    fn nested_fields_are_masked_and_shape_is_preserved() {
        let body = json!({"a": {"b": "15011327983", "c": 1}, "d": [{"b": "15011327983"}]});
        let template = FieldTemplate::new().with_field("b", MaskKind::Phone);

        let masked = mask_json(&body, &template);
        assert_eq!(
            masked,
            json!({"a": {"b": "150******83", "c": 1}, "d": [{"b": "150******83"}]})
        );
        assert_eq!(masked["d"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn every_mask_kind_in_one_document() {
        let template: FieldTemplate = serde_json::from_value(json!({
            "testUserName": "name",
            "testIdCard": "idcard",
            "testMobile": "phone",
            "testBlank": "blank",
            "testContent": "default",
            "testIgnored": "unknown"
        }))
        .unwrap();
        let body = json!({
            "code": 0,
            "data": {
                "testUserName": "锦江酒店",
                "testIdCard": "211330199010105551",
                "testMobile": "15011327983",
                "testBlank": "this is blank text",
                "testContent": "abcdefghi",
                "testIgnored": "keep me",
                "list": [
                    {"testUserName": "JinJiang Online", "testMobile": 15011327983_u64},
                    "testMobile"
                ]
            }
        });

        assert_eq!(
            mask_json(&body, &template),
            json!({
                "code": 0,
                "data": {
                    "testUserName": "***店",
                    "testIdCard": "2****************1",
                    "testMobile": "150******83",
                    "testBlank": "",
                    "testContent": "abc***ghi",
                    "testIgnored": "keep me",
                    "list": [
                        {"testUserName": "* Online", "testMobile": 15011327983_u64},
                        "testMobile"
                    ]
                }
            })
        );
    }

    #[test]
    fn top_level_arrays_are_walked() {
        let body = json!([{"name": "Alice"}, [{"name": "Bob Smith"}], "Carol"]);
        let template = FieldTemplate::new().with_field("name", MaskKind::Name);
        assert_eq!(
            mask_json(&body, &template),
            json!([{"name": "A*"}, [{"name": "* Smith"}], "Carol"])
        );
    }

    #[test]
    fn untouched_numbers_keep_their_exact_text() {
        let template = FieldTemplate::new().with_field("phone", MaskKind::Phone);
        let engine = MaskingEngine::default();

        let masked = engine
            .mask_str(
                r#"{"phone":"15011327983","orderId":123456789012345678901234567890,"amount":1.10}"#,
                &template,
                &AlipayRule,
            )
            .unwrap();
        assert_eq!(
            masked.text(),
            r#"{"phone":"150******83","orderId":123456789012345678901234567890,"amount":1.10}"#
        );

        let body = r#"{"big":1e400,"phone":"88157923"}"#;
        let masked = engine.mask_str(body, &template, &AlipayRule).unwrap();
        assert_eq!(masked.text(), r#"{"big":1e400,"phone":"881***23"}"#);
    }

    #[test]
    fn deep_documents_hit_the_depth_limit() {
        let mut body = json!({"phone": "15011327983"});
        for _ in 0..10 {
            body = json!({ "inner": body });
        }
        let text = body.to_string();
        let template = FieldTemplate::new().with_field("phone", MaskKind::Phone);

        let shallow = MaskingEngine::new(EngineOptions::default().with_max_depth(5));
        let err = shallow.mask_str(&text, &template, &AlipayRule).unwrap_err();
        assert!(matches!(err, MaskError::DepthExceeded { limit: 5 }));

        let deep = MaskingEngine::new(EngineOptions::default().with_max_depth(10));
        let masked = deep.mask_str(&text, &template, &AlipayRule).unwrap();
        assert!(masked.text().contains("150******83"));
    }
}

mod selection {
    use super::*;

    #[test]
    fn explicit_wildcard_and_missing() {
        let rules: RuleMap = serde_json::from_value(json!({"ios,android": "r1", "*": "r2"})).unwrap();
        assert_eq!(select_rule_id(&rules, "ios"), Some("r1"));
        assert_eq!(select_rule_id(&rules, "web"), Some("r2"));

        let no_wildcard: RuleMap = serde_json::from_value(json!({"ios,android": "r1"})).unwrap();
        assert_eq!(select_rule_id(&no_wildcard, "web"), None);
    }

    #[test]
    fn resolved_rule_drives_masking() {
        let registry = RuleRegistry::with_builtin();
        let config = PluginConfig::from_value(json!({
            "maskingRule": {"ch1，ch2": "aliRule"},
            "maskingTemplate": {"testMobile": "phone"}
        }))
        .unwrap();
        let rules = config.masking_rule.as_ref().unwrap();
        let template = config.masking_template.as_ref().unwrap();

        let rule = resolve_rule(&registry, rules, "ch2").unwrap();
        let masked = MaskingEngine::default()
            .mask_str(r#"{"testMobile":"15011327983"}"#, template, rule.as_ref())
            .unwrap();
        assert_eq!(masked.text(), r#"{"testMobile":"150******83"}"#);

        let err = resolve_rule(&registry, rules, "ch3").err().unwrap();
        assert!(matches!(err, MaskError::RuleNotFound { .. }));
    }

    #[test]
    fn overlapping_patterns_are_rejected_at_load() {
        let result = PluginConfig::from_value(json!({
            "maskingRule": {"ios,web": "r1", "web": "r2"},
            "maskingTemplate": {}
        }));
        assert!(result.is_err());
    }
}

mod custom_rules {
    use super::*;

    struct Hashes;

    impl MaskingRule for Hashes {
        fn default_out(&self, value: &str) -> String {
            "#".repeat(value.chars().count())
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
    fn registered_rules_are_selected_by_id() {
        let registry = RuleRegistry::builder()
            .register(AlipayRule::ID, AlipayRule)
            .register("hashes", Hashes)
            .build();
        let rules = RuleMap::try_from_entries([("web", "hashes"), ("*", AlipayRule::ID)]).unwrap();
        let template = FieldTemplate::new().with_field("mobile", MaskKind::Phone);
        let body = r#"{"mobile":"15011327983"}"#;
        let engine = MaskingEngine::default();

        let web = resolve_rule(&registry, &rules, "web").unwrap();
        let masked = engine.mask_str(body, &template, web.as_ref()).unwrap();
        assert_eq!(masked.text(), "{\"mobile\":\"###########\"}");

        let other = resolve_rule(&registry, &rules, "ios").unwrap();
        let masked = engine.mask_str(body, &template, other.as_ref()).unwrap();
        assert_eq!(masked.text(), r#"{"mobile":"150******83"}"#);
    }

    #[test]
    fn blank_has_a_default_implementation() {
        assert_eq!(Hashes.blank("anything"), "");
        assert_eq!(Hashes.apply(MaskKind::Blank, "anything"), "");
    }
}
