//! Field validation engine.
//!
//! Rules are plain data ([`rules::FieldRule`]) and the evaluator is pure
//! logic, so the same table validates both create and partial-update
//! payloads without any database access.

pub mod evaluator;
pub mod rules;
