//! Validation rule and violation types.

use serde::{Deserialize, Serialize};

/// The check a [`FieldRule`] applies to its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Field must be present, non-null and not an empty string.
    Required,
    /// Field, when a non-null value, must be a string shaped like an email.
    Email,
    /// Field, when a non-null value, must be a JSON string.
    String,
    /// Field, when present, must be a JSON boolean (null is rejected).
    Boolean,
    /// Field, when a string, must not exceed this many characters.
    MaxLength(usize),
}

impl RuleKind {
    /// Stable identifier reported in [`FieldViolation::rule_type`].
    pub fn name(self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::Email => "email",
            RuleKind::String => "type_string",
            RuleKind::Boolean => "type_boolean",
            RuleKind::MaxLength(_) => "max_length",
        }
    }
}

/// One row of a rule table: a field, the check applied to it, and the
/// message reported when the check fails.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: RuleKind,
    pub message: &'static str,
}

impl FieldRule {
    pub const fn new(field: &'static str, kind: RuleKind, message: &'static str) -> Self {
        Self {
            field,
            kind,
            message,
        }
    }
}

/// Whether absent fields are an error (create) or left untouched (update).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    pub field: String,
    pub rule_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}
