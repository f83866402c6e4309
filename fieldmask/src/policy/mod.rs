//! Masking policies: character-level primitives and masking rules.
//!
//! This module provides:
//!
//! - **Text primitives** (`text`): the mask character, the keep-window used by
//!   every masker ([`KeepConfig`]) and CJK detection.
//!
//! - **Mask kinds** (`kind`): the closed set of [`MaskKind`] tokens a field
//!   template may reference.
//!
//! - **Rules** (`rules`): the [`MaskingRule`] trait bundling one masker per
//!   kind, and the built-in [`AlipayRule`].
//!
//! # Example
//!
//! ```rust
//! use fieldmask::{AlipayRule, MaskKind, MaskingRule};
//!
//! assert_eq!(AlipayRule.apply(MaskKind::Phone, "15011327983"), "150******83");
//! assert_eq!(AlipayRule.apply(MaskKind::Name, "JinJiang Online"), "* Online");
//! ```

pub mod kind;
pub mod rules;
pub mod text;

pub use kind::{MaskKind, UnknownMaskKind};
pub use rules::{AlipayRule, MaskingRule};
pub use text::{CJK_RANGE, KeepConfig, MASK_CHAR, hide_char, is_cjk};
