use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use crm_core::error::CoreError;
use crm_core::validation::rules::FieldViolation;
use crm_db::StoreError;
use serde::Serialize;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error type returned by every handler and extractor.
///
/// Renders as `{"error": <message>, "code": <CODE>, "details"?: [...]}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// No route or resource matches the request.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request (bad JSON, wrong body shape).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Logged in full; the client only sees a generic message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a [FieldViolation]>,
}

impl AppError {
    /// Status, code and client-facing message.
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Core(CoreError::InvalidFields(violations)) => {
                let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", messages.join("; "))
            }
            AppError::Core(CoreError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::Core(CoreError::Internal(msg)) | AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
            AppError::Store(StoreError::DuplicateEmail(_)) => {
                (StatusCode::CONFLICT, "CONFLICT", self.to_string())
            }
            AppError::Store(StoreError::Database(err)) => classify_sqlx_error(err),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        }
    }

    fn details(&self) -> Option<&[FieldViolation]> {
        match self {
            AppError::Core(CoreError::InvalidFields(violations)) => Some(violations),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.classify();
        let body = ErrorBody {
            error,
            code,
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

/// Map a sqlx error that reached the handler layer.
///
/// `RowNotFound` is 404, a Postgres unique violation (23505) on a `uq_`
/// constraint is 409, anything else is a logged 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some("23505")
                && db_err.constraint().is_some_and(|c| c.starts_with("uq_")) =>
        {
            (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!(
                    "Duplicate value violates unique constraint: {}",
                    db_err.constraint().unwrap_or_default()
                ),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
