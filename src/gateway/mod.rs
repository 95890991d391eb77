//! Remote data gateway: typed access to the backend's CRUD and spatial endpoints.
//!
//! The backend is the only source of truth. Every call is a single attempt;
//! failures are surfaced to the caller as [`RequestError`] and never retried.

mod http;

pub use http::HttpGateway;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::models::{
    Claimant, ClaimantCreate, ClaimantUpdate, Service, ServiceCreate, ServiceFilter, ServiceUpdate,
};

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, RequestError>;

/// Errors from a backend request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    /// The request could not complete (connection refused, DNS, TLS, ...).
    #[error("Network error: {0}")]
    Network(String),
    /// The backend answered with a non-success status.
    #[error("HTTP error! status: {status} - {detail}")]
    Api { status: u16, detail: String },
    /// A success response carried a body we could not decode.
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl RequestError {
    /// Build an API error from a failed response, preferring the body's `detail`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = extract_detail(body).unwrap_or_else(|| generic_detail(status));
        RequestError::Api { status, detail }
    }

    /// HTTP status, for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Single displayable message for any error kind.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Pull a human-readable `detail` out of an error body.
///
/// Understands `{"detail": "text"}` and the validation shape
/// `{"detail": [{"msg": "..."}, ...]}`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

fn generic_detail(status: u16) -> String {
    match StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
    {
        Some(reason) => format!("Request failed ({})", reason),
        None => format!("Request failed with status {}", status),
    }
}

/// Backend operations the client depends on.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `GET /services/` with optional category/fees filters.
    async fn list_services(&self, filter: &ServiceFilter) -> GatewayResult<Vec<Service>>;

    /// `GET /services/within/claimant/{id}`: services inside the claimant's travel extent.
    async fn list_services_within_claimant(&self, claimant_id: i64)
        -> GatewayResult<Vec<Service>>;

    async fn create_service(&self, payload: &ServiceCreate) -> GatewayResult<Service>;

    async fn update_service(&self, id: i64, payload: &ServiceUpdate) -> GatewayResult<Service>;

    async fn delete_service(&self, id: i64) -> GatewayResult<()>;

    async fn list_claimants(&self) -> GatewayResult<Vec<Claimant>>;

    async fn get_claimant(&self, id: i64) -> GatewayResult<Claimant>;

    async fn create_claimant(&self, payload: &ClaimantCreate) -> GatewayResult<Claimant>;

    async fn update_claimant(&self, id: i64, payload: &ClaimantUpdate)
        -> GatewayResult<Claimant>;

    async fn delete_claimant(&self, id: i64) -> GatewayResult<()>;
}
