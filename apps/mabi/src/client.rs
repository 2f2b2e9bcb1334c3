//! # Nexon Open API Client
//!
//! Thin reqwest wrapper around the Mabinogi endpoints of the Nexon Open API.
//! Every request carries the `x-nxopen-api-key` header; the key is held
//! here and never returned to API callers.

use mabi_core::primitives::MIN_ITEM_NAME_CHARS;
use mabi_core::{AuctionPage, HornBugleHistory, HornBugleMessage, NpcShop};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Header carrying the upstream API key.
pub const API_KEY_HEADER: &str = "x-nxopen-api-key";

/// Errors from the upstream client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No API key configured.
    #[error("Nexon API key is not configured (set NEXON_API_KEY)")]
    MissingApiKey,

    /// Keyword search with a blank keyword.
    #[error("Keyword is empty")]
    EmptyKeyword,

    /// Cannot reach the upstream.
    #[error("Cannot connect to upstream at {0}")]
    ConnectionFailed(String),

    /// 401/403 - the upstream rejected the key.
    #[error("Unauthorized: upstream rejected the API key")]
    Unauthorized,

    /// 429 Too Many Requests.
    #[error("Rate limited by upstream")]
    RateLimited,

    /// Any other non-success status.
    #[error("Upstream error ({0}): {1}")]
    Upstream(u16, String),

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Client for the Mabinogi Open API.
#[derive(Clone)]
pub struct NexonClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for NexonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NexonClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl NexonClient {
    /// Create a client. A missing or blank key is an error.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(ClientError::MissingApiKey)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an authenticated GET request.
    fn request(&self, path: &str, query: &[(&str, String)]) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.http
            .get(url)
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
    }

    /// Send a request and handle connection errors.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        req.send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.base_url)))
    }

    /// Check status codes and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ClientError::Unauthorized);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Upstream(status.as_u16(), body));
        }
        resp.json::<T>()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }

    // =========================================================================
    // AUCTION
    // =========================================================================

    /// GET /auction/list
    ///
    /// The category is always sent. The item name is sent only when it has
    /// at least two characters after trimming. A 400 answer is read as an
    /// empty listing.
    pub async fn fetch_auction_list(
        &self,
        item_name: &str,
        category: &str,
        cursor: Option<&str>,
    ) -> Result<AuctionPage, ClientError> {
        let mut query = vec![("auction_item_category", category.trim().to_string())];
        let name = item_name.trim();
        if name.chars().count() >= MIN_ITEM_NAME_CHARS {
            query.push(("item_name", name.to_string()));
        }
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            query.push(("cursor", cursor.to_string()));
        }

        let resp = self.send(self.request("/auction/list", &query)).await?;
        if resp.status() == reqwest::StatusCode::BAD_REQUEST {
            tracing::debug!(category, "Upstream rejected listing request, treating as empty");
            return Ok(AuctionPage::empty());
        }
        self.handle_response(resp).await
    }

    /// GET /auction/keyword-search
    pub async fn search_auction_items(
        &self,
        keyword: &str,
        cursor: Option<&str>,
    ) -> Result<AuctionPage, ClientError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ClientError::EmptyKeyword);
        }

        let mut query = vec![("keyword", keyword.to_string())];
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            query.push(("cursor", cursor.to_string()));
        }

        let resp = self.send(self.request("/auction/keyword-search", &query)).await?;
        self.handle_response(resp).await
    }

    // =========================================================================
    // HORN BUGLE & NPC SHOP
    // =========================================================================

    /// GET /horn-bugle-world/history
    pub async fn horn_bugle_history(
        &self,
        server: &str,
    ) -> Result<Vec<HornBugleMessage>, ClientError> {
        let query = [("server_name", server.to_string())];
        let resp = self
            .send(self.request("/horn-bugle-world/history", &query))
            .await?;
        let history: HornBugleHistory = self.handle_response(resp).await?;
        Ok(history.horn_bugle_world_history)
    }

    /// GET /npcshop/list
    pub async fn npc_shop(
        &self,
        npc: &str,
        server: &str,
        channel: u32,
    ) -> Result<NpcShop, ClientError> {
        let query = [
            ("npc_name", npc.to_string()),
            ("server_name", server.to_string()),
            ("channel", channel.to_string()),
        ];
        let resp = self.send(self.request("/npcshop/list", &query)).await?;
        self.handle_response(resp).await
    }
}
