//! # API Request/Response Types
//!
//! JSON shapes specific to the HTTP layer. Search and pocket bodies are the
//! service types themselves.

use crate::client::ClientError;
use crate::service::ServiceError;
use axum::http::StatusCode;
use mabi_core::HornBugleMessage;
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body of every non-2xx JSON answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    /// Create an error body.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Status code for a service error.
///
/// Bad input is the caller's fault (400). A missing upstream key is a
/// deployment problem (503). Everything else happened upstream (502).
#[must_use]
pub fn status_for(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::Invalid(_) | ServiceError::Upstream(ClientError::EmptyKeyword) => {
            StatusCode::BAD_REQUEST
        }
        ServiceError::Upstream(ClientError::MissingApiKey) => StatusCode::SERVICE_UNAVAILABLE,
        ServiceError::Upstream(_) => StatusCode::BAD_GATEWAY,
    }
}

// =============================================================================
// QUERY STRINGS
// =============================================================================

/// `GET /auction/keyword` parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordQuery {
    pub keyword: String,
    pub cursor: Option<String>,
}

/// `GET /auction/list` parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub category: String,
    pub item_name: String,
    pub cursor: Option<String>,
}

/// `GET /horn-bugle` parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HornQuery {
    pub server: String,
}

// =============================================================================
// HORN BUGLE RESPONSE
// =============================================================================

/// Recent horn bugle messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HornBugleResponse {
    pub server: String,
    pub messages: Vec<HornBugleMessage>,
}
