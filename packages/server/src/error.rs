//! Request-level error type and its HTTP mapping.
//!
//! Taxonomy: configuration errors are 500 before any external call;
//! auth errors (no stored token, bad CSRF state) are 401/400; upstream
//! dependency failures are 400 with the upstream body attached;
//! enrichment quality failures are 400 with a human-readable message.
//! Nothing is retried anywhere — the user re-triggers manually.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing credentials or other deployment misconfiguration
    #[error("config error: {0}")]
    Config(String),

    /// Caller must (re-)do OAuth
    #[error("{0}")]
    Auth(String),

    /// Invalid input or an enrichment quality failure
    #[error("{0}")]
    BadRequest(String),

    /// An upstream dependency (CRM, LLM) rejected the call; body verbatim
    #[error("upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// Local store unavailable
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Config(_) | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) | ApiError::Upstream { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<pipedrive::PipedriveError> for ApiError {
    fn from(e: pipedrive::PipedriveError) -> Self {
        match e {
            pipedrive::PipedriveError::Api { status, body } => ApiError::Upstream { status, body },
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<enrichment::EnrichmentError> for ApiError {
    fn from(e: enrichment::EnrichmentError) -> Self {
        use enrichment::EnrichmentError::*;
        match e {
            SourceUnreadable(msg) => ApiError::BadRequest(msg),
            Config(msg) => ApiError::Config(msg),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
