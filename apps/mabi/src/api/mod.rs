//! # mabi HTTP API Module
//!
//! Parsed and filtered access to the Mabinogi Open API. The upstream key
//! stays on the server; clients only see typed results.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /categories` - Category tree
//! - `POST /auction/search` - Search with filters, sorting and paging
//! - `GET /auction/keyword?keyword=&cursor=` - Parsed keyword-search page
//! - `GET /auction/list?category=&item_name=&cursor=` - Parsed category page
//! - `POST /npcshop/pocket` - Pocket colour search
//! - `GET /horn-bugle?server=` - Horn bugle history
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `MABI_CORS_ORIGINS`: Comma-separated origins, or "*" for all (default: local dev servers)
//! - `MABI_RATE_LIMIT`: Requests per second (default: 20, 0 to disable)
//! - `MABI_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::get_api_key_from_env;
pub use handlers::{
    categories_handler, health_handler, horn_bugle_handler, keyword_handler, list_handler,
    pocket_handler, search_handler,
};
pub use middleware::{DEFAULT_RATE_LIMIT, create_rate_limiter, get_rate_limit_from_env};
pub use types::{
    ErrorResponse, HealthResponse, HornBugleResponse, HornQuery, KeywordQuery, ListQuery,
    status_for,
};

use crate::service::{SearchService, ServiceError};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use mabi_core::MabiError;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body.
const MAX_BODY_BYTES: usize = 256 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
}

impl AppState {
    /// Wrap a service for sharing across handlers.
    #[must_use]
    pub fn new(service: SearchService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Dev-server origins allowed when `MABI_CORS_ORIGINS` is unset.
const LOCAL_ORIGINS: [&str; 6] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:8080",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:8080",
];

/// Allowed browser origins.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

/// Read a `MABI_CORS_ORIGINS` value. Unparseable entries are skipped; an
/// unset or fully invalid value falls back to the local dev origins.
fn parse_origins(raw: Option<&str>) -> AllowedOrigins {
    let raw = raw.map(str::trim).filter(|r| !r.is_empty());
    if raw == Some("*") {
        return AllowedOrigins::Any;
    }

    let parsed: Vec<HeaderValue> = raw
        .into_iter()
        .flat_map(|r| r.split(','))
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("CORS: skipping invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        AllowedOrigins::List(
            LOCAL_ORIGINS
                .into_iter()
                .map(HeaderValue::from_static)
                .collect(),
        )
    } else {
        AllowedOrigins::List(parsed)
    }
}

fn build_cors_layer() -> CorsLayer {
    match parse_origins(std::env::var("MABI_CORS_ORIGINS").ok().as_deref()) {
        AllowedOrigins::Any => {
            tracing::warn!("CORS: allowing every origin (MABI_CORS_ORIGINS=*)");
            CorsLayer::permissive()
        }
        AllowedOrigins::List(origins) => {
            tracing::info!("CORS: {} allowed origin(s)", origins.len());
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        }
    }
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Routes without middleware.
fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/categories", get(handlers::categories_handler))
        .route("/auction/search", post(handlers::search_handler))
        .route("/auction/keyword", get(handlers::keyword_handler))
        .route("/auction/list", get(handlers::list_handler))
        .route("/npcshop/pocket", post(handlers::pocket_handler))
        .route("/horn-bugle", get(handlers::horn_bugle_handler))
}

/// Build the router. Layers, outermost first: trace, CORS, body limit,
/// rate limit (unless `MABI_RATE_LIMIT=0`), bearer auth (when
/// `MABI_API_KEY` is set).
pub fn create_router(state: AppState) -> Router {
    let mut router = routes();

    if get_api_key_from_env().is_some() {
        tracing::info!("Bearer authentication enabled");
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    } else {
        tracing::warn!("MABI_API_KEY not set, the API is open to any caller");
    }

    match get_rate_limit_from_env() {
        0 => tracing::info!("Rate limiting disabled"),
        per_second => {
            tracing::info!(per_second, "Rate limiting enabled");
            router = router.layer(axum_middleware::from_fn_with_state(
                create_rate_limiter(per_second),
                middleware::rate_limit_middleware,
            ));
        }
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Bind and serve until Ctrl+C.
pub async fn run_server(addr: &str, service: SearchService) -> Result<(), ServiceError> {
    let router = create_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| MabiError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("mabi HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MabiError::IoError(format!("Server error: {}", e)).into())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
