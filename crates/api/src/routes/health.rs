use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the store is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    /// Which store serves customers: `postgres` or `memory`.
    pub store: &'static str,
    pub db_healthy: bool,
    pub request_timeout_secs: u64,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = state
        .store
        .health_check()
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Store health check failed"))
        .is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store: state.store.backend(),
        db_healthy,
        request_timeout_secs: state.config.request_timeout_secs,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
