//! Masking rules: named bundles of string maskers, one per [`MaskKind`].
//!
//! A rule is constructed once, shared behind an `Arc` and never mutated, so
//! implementations must not keep interior mutable state. Every masker is a
//! total function: empty input yields an empty string and no input can make
//! a masker fail.
//!
//! # Custom rules
//!
//! ```rust
//! use fieldmask::{MaskingRule, hide_char};
//!
//! struct LastFour;
//!
//! impl MaskingRule for LastFour {
//!     fn default_out(&self, value: &str) -> String {
//!         let len = value.chars().count();
//!         hide_char(value, 0, len.min(4))
//!     }
//!     fn id_card(&self, value: &str) -> String {
//!         self.default_out(value)
//!     }
//!     fn name(&self, value: &str) -> String {
//!         self.default_out(value)
//!     }
//!     fn phone(&self, value: &str) -> String {
//!         self.default_out(value)
//!     }
//! }
//!
//! assert_eq!(LastFour.phone("13800001234"), "*******1234");
//! ```

use super::{
    kind::MaskKind,
    text::{KeepConfig, MASK_CHAR, hide_char, is_cjk},
};

// =============================================================================
// MaskingRule trait
// =============================================================================

/// A set of string maskers selected as a unit for one request.
pub trait MaskingRule: Send + Sync {
    /// Generic masking for free text.
    fn default_out(&self, value: &str) -> String;

    /// Masking for identity documents.
    fn id_card(&self, value: &str) -> String;

    /// Masking for personal names.
    fn name(&self, value: &str) -> String;

    /// Masking for phone numbers.
    fn phone(&self, value: &str) -> String;

    /// Replaces the value entirely. Always returns an empty string.
    fn blank(&self, _value: &str) -> String {
        String::new()
    }

    /// Dispatches to the masker for `kind`.
    fn apply(&self, kind: MaskKind, value: &str) -> String {
        match kind {
            MaskKind::Default => self.default_out(value),
            MaskKind::IdCard => self.id_card(value),
            MaskKind::Name => self.name(value),
            MaskKind::Phone => self.phone(value),
            MaskKind::Blank => self.blank(value),
        }
    }
}

// =============================================================================
// AlipayRule
// =============================================================================

const MOBILE_LEN: usize = 11;
const ID_CARD_LEN: usize = 18;
const LEGACY_ID_CARD_LEN: usize = 15;

/// Masking rule following the Alipay open platform privacy guidelines.
///
/// - phone: 11-digit numbers keep the first 3 and last 2 characters
/// - id card: 15 or 18 characters keep the first and last character
/// - name: CJK names keep only the final character; other names hide
///   the first segment (multi-part) or everything after the initial
/// - default: keep the outer thirds of the value
#[derive(Clone, Copy, Debug, Default)]
pub struct AlipayRule;

impl AlipayRule {
    /// Identifier this rule is registered under by
    /// [`RuleRegistry::with_builtin`](crate::RuleRegistry::with_builtin).
    pub const ID: &str = "aliRule";
}

impl MaskingRule for AlipayRule {
    fn default_out(&self, value: &str) -> String {
        if value.is_empty() {
            return String::new();
        }
        KeepConfig::thirds(value.chars().count()).apply_to(value)
    }

    fn id_card(&self, value: &str) -> String {
        match value.chars().count() {
            0 => String::new(),
            ID_CARD_LEN | LEGACY_ID_CARD_LEN => hide_char(value, 1, 1),
            _ => self.default_out(value),
        }
    }

    fn name(&self, value: &str) -> String {
        let trimmed = value.trim();
        let Some(last) = trimmed.chars().last() else {
            return String::new();
        };

        if is_cjk(last) {
            return mask_cjk_name(trimmed, last);
        }

        let mut segments = trimmed.split(' ');
        let first = segments.next().unwrap_or_default();
        let rest: Vec<&str> = segments.collect();
        if !rest.is_empty() {
            let mut masked = String::with_capacity(trimmed.len());
            masked.push(MASK_CHAR);
            for segment in rest {
                masked.push(' ');
                masked.push_str(segment);
            }
            return masked;
        }

        // Single-character names are returned as-is.
        let mut chars = first.chars();
        match (chars.next(), chars.next()) {
            (Some(initial), Some(_)) => {
                let mut masked = String::with_capacity(initial.len_utf8() + 1);
                masked.push(initial);
                masked.push(MASK_CHAR);
                masked
            }
            _ => first.to_string(),
        }
    }

    fn phone(&self, value: &str) -> String {
        match value.chars().count() {
            0 => String::new(),
            MOBILE_LEN => hide_char(value, 3, 2),
            _ => self.default_out(value),
        }
    }
}

/// Masks every character but the last, leaving spaces in place.
fn mask_cjk_name(trimmed: &str, last: char) -> String {
    let len = trimmed.chars().count();
    let mut masked: String = trimmed
        .chars()
        .take(len - 1)
        .map(|ch| if ch == ' ' { ch } else { MASK_CHAR })
        .collect();
    masked.push(if len == 1 { MASK_CHAR } else { last });
    masked
}

// =============================================================================
// Tests
// =============================================================================
