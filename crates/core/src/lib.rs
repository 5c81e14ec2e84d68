//! Shared domain types for the customer records service.
//!
//! Pure logic only: primitive type aliases, the domain error type, the
//! field validation engine and the customer rule table. Nothing here
//! touches the database or the network.

pub mod customer;
pub mod error;
pub mod types;
pub mod validation;
