//! REST client for the `/customer` endpoints.
//!
//! [`CustomerApi`] talks to a running service over HTTP using [`reqwest`].
//! The [`CustomerBackend`] trait lets the controller be driven by any
//! implementation, including in-process fakes in tests.

use async_trait::async_trait;
use crm_core::types::DbId;
use crm_core::validation::rules::FieldViolation;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::model::Customer;

/// Operations the client needs from the customer service.
#[async_trait]
pub trait CustomerBackend: Send + Sync {
    async fn list(&self) -> Result<Vec<Customer>, ApiError>;
    async fn get(&self, id: DbId) -> Result<Customer, ApiError>;
    async fn create(&self, payload: &Map<String, Value>) -> Result<Customer, ApiError>;
    async fn update(&self, id: DbId, payload: &Map<String, Value>) -> Result<Customer, ApiError>;
    async fn delete(&self, id: DbId) -> Result<Customer, ApiError>;
}

/// Errors from the customer REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (connection refused, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("API error ({status}) {code}: {message}")]
    Status {
        status: u16,
        /// Machine-readable code from the error body, e.g. `NOT_FOUND`.
        code: String,
        message: String,
        /// Per-field violations, present on validation failures.
        details: Vec<FieldViolation>,
    },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Status { status: 400, .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Status { status: 409, .. })
    }

    /// The service could not be reached, or the response could not be read.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Request(_))
    }
}

/// Error body written by the service.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    details: Vec<FieldViolation>,
}

/// HTTP client for a single customer service instance.
pub struct CustomerApi {
    client: reqwest::Client,
    base_url: String,
}

impl CustomerApi {
    /// * `base_url` - Service root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] and its connection pool.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/customer", self.base_url)
    }

    fn record_url(&self, id: DbId) -> String {
        format!("{}/customer/{id}", self.base_url)
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or an [`ApiError::Status`]
    /// built from the service's JSON error body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_else(|_| ErrorBody {
            error: text,
            ..Default::default()
        });

        Err(ApiError::Status {
            status: status.as_u16(),
            code: body.code,
            message: body.error,
            details: body.details,
        })
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CustomerBackend for CustomerApi {
    async fn list(&self) -> Result<Vec<Customer>, ApiError> {
        let response = self.client.get(self.collection_url()).send().await?;
        Self::parse_response(response).await
    }

    async fn get(&self, id: DbId) -> Result<Customer, ApiError> {
        let response = self.client.get(self.record_url(id)).send().await?;
        Self::parse_response(response).await
    }

    async fn create(&self, payload: &Map<String, Value>) -> Result<Customer, ApiError> {
        let response = self
            .client
            .post(self.collection_url())
            .json(payload)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn update(&self, id: DbId, payload: &Map<String, Value>) -> Result<Customer, ApiError> {
        let response = self
            .client
            .patch(self.record_url(id))
            .json(payload)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn delete(&self, id: DbId) -> Result<Customer, ApiError> {
        let response = self.client.delete(self.record_url(id)).send().await?;
        Self::parse_response(response).await
    }
}
