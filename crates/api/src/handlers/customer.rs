//! Handlers for the `/customer` resource.
//!
//! Each handler validates its input, makes exactly one store call and
//! returns the resulting record. Bodies are the bare record (or array of
//! records); errors use the JSON shape produced by [`AppError`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use crm_core::customer::{self as rules, ENTITY};
use crm_core::error::CoreError;
use crm_core::types::DbId;
use crm_db::models::customer::{CreateCustomer, UpdateCustomer};

use crate::error::{AppError, AppResult};
use crate::extract::{IdPath, JsonObject};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

/// POST /customer
///
/// Create a customer. Returns 201 with the full record.
pub async fn create(
    State(state): State<AppState>,
    payload: JsonObject,
) -> AppResult<impl IntoResponse> {
    rules::validate_create(&payload.0)?;
    let input: CreateCustomer = payload.into_dto()?;

    let customer = state.store.create(&input).await?;
    tracing::info!(customer_id = customer.id, "Customer created");

    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /customer
///
/// List every customer. No pagination, no filtering.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let customers = state.store.list().await?;
    Ok(Json(customers))
}

/// GET /customer/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<impl IntoResponse> {
    let customer = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(customer))
}

/// PATCH /customer/{id}
///
/// Apply a partial update. Fields absent from the body are left unchanged.
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    payload: JsonObject,
) -> AppResult<impl IntoResponse> {
    rules::validate_update(&payload.0)?;
    let input: UpdateCustomer = payload.into_dto()?;

    let customer = state
        .store
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(customer_id = id, "Customer updated");

    Ok(Json(customer))
}

/// DELETE /customer/{id}
///
/// Hard-delete a customer and return the removed record. Deleting the same
/// id again yields 404.
pub async fn delete(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<impl IntoResponse> {
    let customer = state
        .store
        .delete(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(customer_id = id, "Customer deleted");

    Ok(Json(customer))
}
