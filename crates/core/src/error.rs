use crate::types::DbId;
use crate::validation::rules::FieldViolation;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// One or more payload fields failed their rules.
    #[error("Validation failed for {} field(s)", .0.len())]
    InvalidFields(Vec<FieldViolation>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build an [`CoreError::InvalidFields`] unless `violations` is empty.
    pub fn from_violations(violations: Vec<FieldViolation>) -> Result<(), CoreError> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidFields(violations))
        }
    }
}
