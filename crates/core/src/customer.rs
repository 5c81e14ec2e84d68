//! Customer field names and the rule table shared by create and update.
//!
//! Field names are the camelCase keys used on the wire.

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::validation::evaluator::{evaluate_rules, unknown_fields};
use crate::validation::rules::{FieldRule, RuleKind, ValidationMode};

pub const ENTITY: &str = "Customer";

pub const FIELD_EMAIL: &str = "email";
pub const FIELD_FIRST_NAME: &str = "firstName";
pub const FIELD_LAST_NAME: &str = "lastName";
pub const FIELD_PHONE: &str = "phone";
pub const FIELD_COMPANY_NAME: &str = "companyName";
pub const FIELD_ADDRESS: &str = "address";
pub const FIELD_CITY: &str = "city";
pub const FIELD_IS_ACTIVE: &str = "isActive";

/// Maximum length of `firstName` and `lastName`.
pub const MAX_NAME_LENGTH: usize = 100;

/// Every field a client may send on create or update.
pub const MUTABLE_FIELDS: &[&str] = &[
    FIELD_EMAIL,
    FIELD_FIRST_NAME,
    FIELD_LAST_NAME,
    FIELD_PHONE,
    FIELD_COMPANY_NAME,
    FIELD_ADDRESS,
    FIELD_CITY,
    FIELD_IS_ACTIVE,
];

pub const CUSTOMER_RULES: &[FieldRule] = &[
    FieldRule::new(FIELD_EMAIL, RuleKind::Required, "email should not be empty"),
    FieldRule::new(FIELD_EMAIL, RuleKind::Email, "email must be an email"),
    FieldRule::new(FIELD_FIRST_NAME, RuleKind::String, "firstName must be a string"),
    FieldRule::new(
        FIELD_FIRST_NAME,
        RuleKind::MaxLength(MAX_NAME_LENGTH),
        "firstName must be shorter than or equal to 100 characters",
    ),
    FieldRule::new(FIELD_LAST_NAME, RuleKind::String, "lastName must be a string"),
    FieldRule::new(
        FIELD_LAST_NAME,
        RuleKind::MaxLength(MAX_NAME_LENGTH),
        "lastName must be shorter than or equal to 100 characters",
    ),
    FieldRule::new(FIELD_PHONE, RuleKind::String, "phone must be a string"),
    FieldRule::new(FIELD_COMPANY_NAME, RuleKind::String, "companyName must be a string"),
    FieldRule::new(FIELD_ADDRESS, RuleKind::String, "address must be a string"),
    FieldRule::new(FIELD_CITY, RuleKind::String, "city must be a string"),
    FieldRule::new(FIELD_IS_ACTIVE, RuleKind::Boolean, "isActive must be a boolean value"),
];

/// Validate a create payload. Unknown keys are rejected.
pub fn validate_create(payload: &Map<String, Value>) -> Result<(), CoreError> {
    validate(payload, ValidationMode::Create)
}

/// Validate a partial-update payload. Only the keys present are checked.
pub fn validate_update(payload: &Map<String, Value>) -> Result<(), CoreError> {
    validate(payload, ValidationMode::Update)
}

fn validate(payload: &Map<String, Value>, mode: ValidationMode) -> Result<(), CoreError> {
    let mut violations = unknown_fields(payload, MUTABLE_FIELDS);
    violations.extend(evaluate_rules(CUSTOMER_RULES, payload, mode));
    CoreError::from_violations(violations)
}
