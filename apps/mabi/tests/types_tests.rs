//! Unit tests for API types serialization/deserialization.

#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use mabi::api::{ErrorResponse, HealthResponse, HornQuery, KeywordQuery, ListQuery, status_for};
use mabi::client::ClientError;
use mabi::service::{PocketRequest, SearchRequest, ServiceError};
use mabi_core::{ColorPart, MabiError, SortOrder};

// =============================================================================
// HEALTH & ERROR RESPONSES
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_error_response_shape() {
    let json = serde_json::to_string(&ErrorResponse::new("nope")).unwrap();
    assert_eq!(json, r#"{"success":false,"error":"nope"}"#);
}

#[test]
fn test_status_mapping() {
    let invalid = ServiceError::Invalid(MabiError::InvalidInput("x".into()));
    assert_eq!(status_for(&invalid), StatusCode::BAD_REQUEST);
    assert_eq!(
        status_for(&ServiceError::Upstream(ClientError::EmptyKeyword)),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_for(&ServiceError::Upstream(ClientError::MissingApiKey)),
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
        status_for(&ServiceError::Upstream(ClientError::RateLimited)),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        status_for(&ServiceError::Upstream(ClientError::Upstream(500, String::new()))),
        StatusCode::BAD_GATEWAY
    );
}

// =============================================================================
// REQUESTS
// =============================================================================

#[test]
fn test_search_request_defaults() {
    let request: SearchRequest = serde_json::from_str("{}").unwrap();
    assert!(request.keyword.is_none());
    assert!(request.criteria.is_empty());
    assert_eq!(request.sort, SortOrder::Asc);
    assert_eq!(request.page, 0);
    assert!(!request.compact);
}

#[test]
fn test_search_request_full() {
    let json = r#"{
        "keyword": "롱 소드",
        "category": "검",
        "criteria": { "min_attack": 10, "enchant_prefix": "신속한" },
        "sort": "desc",
        "page": 3,
        "page_size": 10,
        "compact": true
    }"#;
    let request: SearchRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.category.as_deref(), Some("검"));
    assert_eq!(request.criteria.min_attack, Some(10));
    assert_eq!(request.sort, SortOrder::Desc);
    assert_eq!(request.page_size, Some(10));
}

#[test]
fn test_pocket_request_parts() {
    let json = r#"{"npc":"델","server":"류트","channel":2,"parts":{"A":{"r":1},"F":{"g":2,"b":3}}}"#;
    let request: PocketRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.parts.len(), 2);
    assert_eq!(request.parts[&ColorPart::A].r, Some(1));
    assert!(request.parts[&ColorPart::A].g.is_none());
    assert!(request.tolerance.is_none());
}

#[test]
fn test_pocket_request_requires_channel() {
    let json = r#"{"npc":"델","server":"류트"}"#;
    assert!(serde_json::from_str::<PocketRequest>(json).is_err());
}

#[test]
fn test_query_defaults() {
    let keyword: KeywordQuery = serde_json::from_str("{}").unwrap();
    assert!(keyword.keyword.is_empty());
    let list: ListQuery = serde_json::from_str(r#"{"category":"검"}"#).unwrap();
    assert!(list.item_name.is_empty());
    let horn: HornQuery = serde_json::from_str(r#"{"server":"울프"}"#).unwrap();
    assert_eq!(horn.server, "울프");
}
