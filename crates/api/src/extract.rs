//! Request extractors that reject with [`AppError`] instead of Axum's
//! plain-text rejections, so every client error has the same JSON shape.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use crm_core::error::CoreError;
use crm_core::types::DbId;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// A request body that parsed as a JSON object.
///
/// Handlers run field validation on the raw map first, then convert it
/// into a typed DTO with [`JsonObject::into_dto`].
pub struct JsonObject(pub Map<String, Value>);

impl JsonObject {
    /// Deserialize the (already validated) object into `T`.
    pub fn into_dto<T: DeserializeOwned>(self) -> AppResult<T> {
        serde_json::from_value(Value::Object(self.0))
            .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))
    }
}

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        match value {
            Value::Object(map) => Ok(JsonObject(map)),
            _ => Err(AppError::BadRequest(
                "Request body must be a JSON object".into(),
            )),
        }
    }
}

/// A numeric `{id}` path segment.
///
/// Non-numeric ids are rejected with 400 before the handler runs.
pub struct IdPath(pub DbId);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        raw.parse::<DbId>().map(IdPath).map_err(|_| {
            AppError::Core(CoreError::Validation(
                "Validation failed (numeric string is expected)".into(),
            ))
        })
    }
}
