//! # API Endpoint Handlers

use super::{
    AppState,
    types::{
        ErrorResponse, HealthResponse, HornBugleResponse, HornQuery, KeywordQuery, ListQuery,
        status_for,
    },
};
use crate::service::{
    ListingResponse, PocketRequest, PocketResponse, SearchRequest, SearchResponse, ServiceError,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use mabi_core::CategoryNode;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn reject(error: ServiceError) -> (StatusCode, Json<ErrorResponse>) {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::warn!(status = status.as_u16(), "Request failed: {}", error);
    } else {
        tracing::debug!(status = status.as_u16(), "Request rejected: {}", error);
    }
    (status, Json(ErrorResponse::new(error.to_string())))
}

// =============================================================================
// HEALTH & CATEGORIES
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// The category tree.
pub async fn categories_handler(State(state): State<AppState>) -> Json<Vec<CategoryNode>> {
    Json(state.service.categories().to_vec())
}

// =============================================================================
// AUCTION
// =============================================================================

/// Full search: fetch, filter, sort and page.
pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<SearchResponse> {
    state.service.search(request).await.map(Json).map_err(reject)
}

/// Parsed keyword-search page.
pub async fn keyword_handler(
    State(state): State<AppState>,
    Query(query): Query<KeywordQuery>,
) -> ApiResult<ListingResponse> {
    state
        .service
        .keyword_listing(&query.keyword, query.cursor.as_deref())
        .await
        .map(Json)
        .map_err(reject)
}

/// Parsed category listing page.
pub async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<ListingResponse> {
    state
        .service
        .category_listing(&query.category, &query.item_name, query.cursor.as_deref())
        .await
        .map(Json)
        .map_err(reject)
}

// =============================================================================
// POCKETS & HORN BUGLE
// =============================================================================

/// Pocket colour search.
pub async fn pocket_handler(
    State(state): State<AppState>,
    Json(request): Json<PocketRequest>,
) -> ApiResult<PocketResponse> {
    state.service.pocket(request).await.map(Json).map_err(reject)
}

/// Horn bugle history.
pub async fn horn_bugle_handler(
    State(state): State<AppState>,
    Query(query): Query<HornQuery>,
) -> ApiResult<HornBugleResponse> {
    let messages = state.service.horn_bugle(&query.server).await.map_err(reject)?;
    Ok(Json(HornBugleResponse {
        server: query.server.trim().to_string(),
        messages,
    }))
}
