//! Adapters for emitting masking results through `slog`.
//!
//! This module provides `slog::Value` implementations so hosts that log with
//! `slog` can record masked documents and skip reasons:
//!
//! - [`MaskedJson`] holds an already masked document and serializes it as
//!   nested JSON via `slog`'s nested-value support.
//! - [`MaskError`] is emitted as its stable code.
//! - [`MaskedBody`] is emitted as its masked text.
//!
//! Nothing here ever sees the unmasked document: [`MaskedJson`] can only be
//! built by running the engine.

use serde_json::Value as JsonValue;
use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{
    config::FieldTemplate,
    engine::{MaskedBody, MaskingEngine},
    error::MaskError,
    policy::MaskingRule,
};

/// A JSON document that has been through the masking engine.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskedJson(JsonValue);

impl MaskedJson {
    pub fn value(&self) -> &JsonValue {
        &self.0
    }

    pub fn into_inner(self) -> JsonValue {
        self.0
    }
}

impl SlogValue for MaskedJson {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.0.clone());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

impl SlogValue for MaskError {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        serializer.emit_str(key, self.code())
    }
}

impl SlogValue for MaskedBody {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        serializer.emit_str(key, self.text())
    }
}

/// Extension for producing loggable masked documents.
pub trait SlogMaskedExt {
    /// Masks `value` and wraps the result for logging.
    fn slog_masked_json(
        &self,
        value: JsonValue,
        template: &FieldTemplate,
        rule: &dyn MaskingRule,
    ) -> Result<MaskedJson, MaskError>;
}

impl SlogMaskedExt for MaskingEngine {
    fn slog_masked_json(
        &self,
        mut value: JsonValue,
        template: &FieldTemplate,
        rule: &dyn MaskingRule,
    ) -> Result<MaskedJson, MaskError> {
        self.mask_value(&mut value, template, rule)?;
        Ok(MaskedJson(value))
    }
}
