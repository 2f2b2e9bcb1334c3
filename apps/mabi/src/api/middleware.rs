//! # Rate Limiting
//!
//! One process-wide `governor` bucket in front of every route. Each search
//! fans out to the upstream API, which enforces its own per-key quota, so
//! the default stays low.
//!
//! `MABI_RATE_LIMIT` sets requests per second (default 20, `0` disables).

use super::types::ErrorResponse;
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Default requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 20;

/// Shared, unkeyed limiter.
pub type SharedLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Build a limiter allowing `per_second` requests. Zero is treated as the
/// default.
pub fn create_rate_limiter(per_second: u32) -> SharedLimiter {
    let rate = NonZeroU32::new(per_second)
        .or(NonZeroU32::new(DEFAULT_RATE_LIMIT))
        .unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(Quota::per_second(rate)))
}

/// `MABI_RATE_LIMIT`, or the default when unset or not a number.
pub fn get_rate_limit_from_env() -> u32 {
    std::env::var("MABI_RATE_LIMIT")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_RATE_LIMIT)
}

/// Whole seconds to wait, rounded up, at least one.
fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}

/// 429 with `Retry-After` once the bucket is empty.
pub async fn rate_limit_middleware(
    State(limiter): State<SharedLimiter>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Err(not_until) = limiter.check() else {
        return next.run(request).await;
    };

    let wait = not_until.wait_time_from(DefaultClock::default().now());
    tracing::warn!(path = %request.uri().path(), "Rate limit exceeded");
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, retry_after_secs(wait).to_string())],
        Json(ErrorResponse::new("Too Many Requests")),
    )
        .into_response()
}
