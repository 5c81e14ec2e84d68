use std::sync::Arc;

use crm_db::CustomerStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Customer persistence (Postgres, or in-memory when no database is configured).
    pub store: Arc<dyn CustomerStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
