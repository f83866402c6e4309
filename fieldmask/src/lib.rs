//! Field-level masking of sensitive values inside JSON response bodies.
//!
//! This crate separates:
//! - **Masking rules**: how a phone number, id card number, name or free text
//!   is redacted (`MaskingRule`, `AlipayRule`).
//! - **Configuration**: which rule applies to which request source type
//!   (`RuleMap`) and which fields are sensitive (`FieldTemplate`).
//!
//! The engine parses a response body, walks every object in it, masks the
//! string values of templated fields and serializes the result.
//!
//! What this crate does:
//! - defines the masking rules and the rule registry
//! - selects a rule from the request's source type with wildcard fallback
//! - masks JSON documents of any shape, bounded in nesting depth
//! - provides a response-filter adapter and an optional `slog` integration
//!
//! What it does not do:
//! - perform I/O or buffer streaming bodies
//! - make masking reversible
//!
//! # Example
//!
//! ```rust
//! use fieldmask::{MaskingEngine, PluginConfig, RuleRegistry, resolve_rule};
//!
//! let registry = RuleRegistry::with_builtin();
//! let config = PluginConfig::from_json_str(
//!     r#"{"maskingRule":{"ios,android":"aliRule"},
//!         "maskingTemplate":{"mobile":"phone","realName":"name"}}"#,
//! )
//! .unwrap();
//!
//! let rule = resolve_rule(&registry, config.masking_rule.as_ref().unwrap(), "ios").unwrap();
//! let masked = MaskingEngine::default()
//!     .mask_str(
//!         r#"{"user":{"realName":"JinJiang Online","mobile":"15011327983"}}"#,
//!         config.masking_template.as_ref().unwrap(),
//!         rule.as_ref(),
//!     )
//!     .unwrap();
//!
//! assert_eq!(
//!     masked.text(),
//!     r#"{"user":{"realName":"* Online","mobile":"150******83"}}"#
//! );
//! ```

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

// Module declarations
pub mod config;
mod engine;
mod error;
mod filter;
pub mod policy;
mod registry;
pub mod selector;
#[cfg(feature = "slog")]
pub mod slog;
mod traverse;

// Re-exports from policy module
pub use policy::{
    AlipayRule, CJK_RANGE, KeepConfig, MASK_CHAR, MaskKind, MaskingRule, UnknownMaskKind,
    hide_char, is_cjk,
};
// Re-exports from configuration and selection
pub use config::{
    DEFAULT_MAX_DEPTH, EngineOptions, FieldTemplate, PluginConfig, RuleEntry, RuleMap, WILDCARD,
    split_pattern,
};
pub use selector::{resolve_named_rule, resolve_rule, select_rule_id};
// Re-exports from the engine and its collaborators
pub use engine::{MaskedBody, MaskingEngine};
pub use error::{ConfigError, MaskError};
pub use filter::{MaskingFilter, PreparedMask, SOURCE_TYPE_HEADER, source_type_from_headers};
pub use registry::{RuleRegistry, RuleRegistryBuilder};
pub use traverse::mask_document;
#[cfg(feature = "slog")]
pub use crate::slog::{MaskedJson, SlogMaskedExt};
