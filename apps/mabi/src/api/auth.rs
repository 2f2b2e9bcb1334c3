//! # Bearer Authentication
//!
//! When `MABI_API_KEY` is set every route except `/health` requires
//! `Authorization: Bearer <key>`. A bare key without the scheme is also
//! accepted. Rejections use the regular JSON error body.

use super::types::ErrorResponse;
use axum::{
    Json,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

const HEALTH_PATH: &str = "/health";

/// `MABI_API_KEY`, when set and non-empty.
pub fn get_api_key_from_env() -> Option<String> {
    std::env::var("MABI_API_KEY").ok().filter(|k| !k.is_empty())
}

/// Token from the `Authorization` header, scheme stripped.
fn presented_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    Some(value.strip_prefix("Bearer ").map_or(value, str::trim))
}

/// Constant-time equality. Both sides are zero-padded to the longer
/// length so the comparison time does not depend on where they differ.
fn keys_match(presented: &[u8], expected: &[u8]) -> bool {
    let width = presented.len().max(expected.len());
    let pad = |key: &[u8]| {
        let mut padded = key.to_vec();
        padded.resize(width, 0);
        padded
    };
    let same_bytes: bool = pad(presented).ct_eq(&pad(expected)).into();
    same_bytes && presented.len() == expected.len()
}

fn unauthorized(reason: &'static str) -> Response {
    tracing::warn!(event = "auth_failure", reason, "Rejected unauthenticated request");
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        Json(ErrorResponse::new("Unauthorized")),
    )
        .into_response()
}

/// Checks the bearer key against `MABI_API_KEY`.
pub async fn api_key_auth_middleware(request: Request<Body>, next: Next) -> Response {
    let Some(expected) = get_api_key_from_env() else {
        return next.run(request).await;
    };
    if request.uri().path() == HEALTH_PATH {
        return next.run(request).await;
    }

    match presented_token(request.headers()) {
        None => unauthorized("missing_authorization_header"),
        Some(token) if !keys_match(token.as_bytes(), expected.as_bytes()) => {
            unauthorized("invalid_api_key")
        }
        Some(_) => next.run(request).await,
    }
}
