//! Client application for the customer records service.
//!
//! - [`api`]: HTTP client for the `/customer` endpoints.
//! - [`model`]: wire record and editor form values.
//! - [`state`]: the view state machine (list, editor, delete dialog).
//! - [`controller`]: drives the state machine against a backend.
//! - [`render`]: text rendering of the views.

pub mod api;
pub mod controller;
pub mod error;
pub mod model;
pub mod render;
pub mod state;
