//! # Search Service
//!
//! Orchestrates the upstream client and the core pipeline:
//! fetch, parse, narrow, filter, sort, page.

use crate::client::{ClientError, NexonClient};
use crate::config::{Config, ListingConfig};
use chrono::Utc;
use mabi_core::category::{find_by_label, leaves};
use mabi_core::color::ColorTarget;
use mabi_core::primitives::{MAX_CHANNEL_VALUES, MAX_KEYWORD_LENGTH};
use mabi_core::shop::{format_remaining, is_known_npc, time_until_refresh};
use mabi_core::{
    AuctionItem, Category, CategoryNode, ColorPart, FilterCriteria, HornBugleMessage, MabiError,
    PageWindow, PocketColorQuery, Server, ShopItem, SortOrder, apply_filters, matches_keyword,
    paginate, parse_auction_items, sort_by_price, validate_channel,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Shown when a keyword search finds nothing.
pub const NO_RESULTS: &str = "검색 결과가 없습니다.";
/// Shown when a category has no listings.
pub const EMPTY_CATEGORY: &str = "해당 카테고리 매물이 없습니다.";
/// Shown when listings exist but none pass the filters.
pub const NO_MATCHES: &str = "해당 조건에 맞는 아이템이 없습니다.";

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was invalid.
    #[error(transparent)]
    Invalid(#[from] MabiError),

    /// The upstream call failed.
    #[error(transparent)]
    Upstream(#[from] ClientError),
}

// =============================================================================
// REQUESTS & RESPONSES
// =============================================================================

/// An auction search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub keyword: Option<String>,
    /// Category label; switches to category listing with local keyword match.
    pub category: Option<String>,
    pub criteria: FilterCriteria,
    pub sort: SortOrder,
    pub page: usize,
    pub page_size: Option<usize>,
    pub cursor: Option<String>,
    /// Use the compact page-button group.
    pub compact: bool,
}

/// One page of search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub items: Vec<AuctionItem>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub sort: SortOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<PageWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A pocket colour search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PocketRequest {
    pub npc: String,
    pub server: String,
    pub channel: u32,
    #[serde(default)]
    pub parts: BTreeMap<ColorPart, ColorTarget>,
    #[serde(default)]
    pub tolerance: Option<u8>,
}

/// Matching pockets and the shop refresh countdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PocketResponse {
    pub items: Vec<ShopItem>,
    pub total_pockets: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_inquire: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_shop_next_update: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_in_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_in: Option<String>,
}

/// A raw upstream page, parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingResponse {
    pub items: Vec<AuctionItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

// =============================================================================
// SERVICE
// =============================================================================

/// Search orchestration over one upstream client.
#[derive(Debug, Clone)]
pub struct SearchService {
    client: NexonClient,
    listing: ListingConfig,
    default_tolerance: u8,
    categories: Vec<CategoryNode>,
}

impl SearchService {
    /// Create a service with default listing settings.
    #[must_use]
    pub fn new(client: NexonClient) -> Self {
        Self::with_config(client, &Config::default())
    }

    /// Create a service using the listing, pocket and category settings.
    #[must_use]
    pub fn with_config(client: NexonClient, config: &Config) -> Self {
        Self {
            client,
            listing: config.listing,
            default_tolerance: config.pocket.tolerance,
            categories: config.category_tree(),
        }
    }

    /// Build the client and service from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let client = NexonClient::new(
            config.upstream.base_url.clone(),
            config.upstream.api_key.clone(),
            config.timeout(),
        )?;
        Ok(Self::with_config(client, config))
    }

    /// The category tree in effect.
    #[must_use]
    pub fn categories(&self) -> &[CategoryNode] {
        &self.categories
    }

    fn resolve_category(&self, label: &str) -> Result<Category, MabiError> {
        find_by_label(&self.categories, label)
            .cloned()
            .ok_or_else(|| MabiError::InvalidInput(format!("Unknown category: {}", label.trim())))
    }

    // =========================================================================
    // AUCTION
    // =========================================================================

    /// Run a full search.
    pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse, ServiceError> {
        let keyword = request.keyword.as_deref().map(str::trim).unwrap_or_default();
        validate_keyword(keyword)?;
        validate_criteria(&request.criteria)?;

        let category = request
            .category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(|label| self.resolve_category(label))
            .transpose()?;

        let (items, next_cursor, empty_message) = match &category {
            Some(category) => {
                let page = self
                    .client
                    .fetch_auction_list("", &category.label, request.cursor.as_deref())
                    .await?;
                let items: Vec<AuctionItem> = parse_auction_items(page.auction_item)
                    .into_iter()
                    .filter(|item| matches_keyword(item, keyword))
                    .collect();
                let message = if keyword.is_empty() {
                    EMPTY_CATEGORY.to_string()
                } else {
                    format!("'{}' 카테고리에서 '{}' 검색 결과가 없습니다.", category.label, keyword)
                };
                (items, page.next_cursor, message)
            }
            None => {
                let page = self
                    .client
                    .search_auction_items(keyword, request.cursor.as_deref())
                    .await?;
                (
                    parse_auction_items(page.auction_item),
                    page.next_cursor,
                    NO_RESULTS.to_string(),
                )
            }
        };

        let fetched = items.len();
        let criteria = request.criteria.for_category(category.as_ref());
        let mut items = apply_filters(items, &criteria);
        sort_by_price(&mut items, request.sort);

        tracing::debug!(
            keyword,
            category = category.as_ref().map(|c| c.label.as_str()),
            fetched,
            kept = items.len(),
            "Search completed"
        );

        let message = if fetched == 0 {
            Some(empty_message)
        } else if items.is_empty() {
            Some(NO_MATCHES.to_string())
        } else {
            None
        };

        let page_size = request.page_size.unwrap_or(self.listing.page_size);
        let page = paginate(items, request.page, page_size);
        let group = if request.compact {
            self.listing.compact_page_group_size
        } else {
            self.listing.page_group_size
        };

        Ok(SearchResponse {
            window: PageWindow::new(page.page, page.total_pages, group),
            items: page.items,
            page: page.page,
            page_size: page.page_size,
            total_items: page.total_items,
            total_pages: page.total_pages,
            sort: request.sort,
            next_cursor,
            message,
        })
    }

    /// Keyword search, parsed but otherwise untouched.
    pub async fn keyword_listing(
        &self,
        keyword: &str,
        cursor: Option<&str>,
    ) -> Result<ListingResponse, ServiceError> {
        validate_keyword(keyword.trim())?;
        let page = self.client.search_auction_items(keyword, cursor).await?;
        Ok(ListingResponse {
            items: parse_auction_items(page.auction_item),
            next_cursor: page.next_cursor,
        })
    }

    /// Category listing, parsed but otherwise untouched.
    pub async fn category_listing(
        &self,
        category: &str,
        item_name: &str,
        cursor: Option<&str>,
    ) -> Result<ListingResponse, ServiceError> {
        let category = self.resolve_category(category)?;
        validate_keyword(item_name.trim())?;
        let page = self
            .client
            .fetch_auction_list(item_name, &category.label, cursor)
            .await?;
        Ok(ListingResponse {
            items: parse_auction_items(page.auction_item),
            next_cursor: page.next_cursor,
        })
    }

    // =========================================================================
    // POCKETS & HORN BUGLE
    // =========================================================================

    /// Pocket colour search on one NPC shop.
    pub async fn pocket(&self, request: PocketRequest) -> Result<PocketResponse, ServiceError> {
        let npc = request.npc.trim();
        if !is_known_npc(npc) {
            return Err(MabiError::InvalidInput(format!("Unknown NPC: {}", npc)).into());
        }
        let server = Server::from_name(&request.server)?;
        let channel = validate_channel(server, request.channel)?;

        let shop = self.client.npc_shop(npc, server.name(), channel).await?;

        let query = PocketColorQuery {
            parts: request.parts,
            tolerance: request.tolerance.unwrap_or(self.default_tolerance),
        };
        let total_pockets = mabi_core::pocket_items(&shop).len();
        let items: Vec<ShopItem> = query.search(&shop).into_iter().cloned().collect();

        tracing::debug!(
            npc,
            server = server.name(),
            channel,
            total_pockets,
            matched = items.len(),
            "Pocket search completed"
        );

        let remaining = shop
            .date_shop_next_update
            .as_deref()
            .map(|next| time_until_refresh(next, Utc::now()));

        Ok(PocketResponse {
            items,
            total_pockets,
            refresh_in_seconds: remaining.map(|r| r.as_secs()),
            refresh_in: remaining.map(format_remaining),
            date_inquire: shop.date_inquire,
            date_shop_next_update: shop.date_shop_next_update,
        })
    }

    /// Recent horn bugle messages of a server.
    pub async fn horn_bugle(&self, server: &str) -> Result<Vec<HornBugleMessage>, ServiceError> {
        let server = Server::from_name(server)?;
        Ok(self.client.horn_bugle_history(server.name()).await?)
    }

    /// Number of selectable categories.
    #[must_use]
    pub fn category_count(&self) -> usize {
        leaves(&self.categories).len()
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

fn validate_keyword(keyword: &str) -> Result<(), MabiError> {
    if keyword.len() > MAX_KEYWORD_LENGTH {
        return Err(MabiError::InvalidInput(format!(
            "Keyword exceeds maximum length of {} bytes",
            MAX_KEYWORD_LENGTH
        )));
    }
    Ok(())
}

fn validate_criteria(criteria: &FilterCriteria) -> Result<(), MabiError> {
    for (part, set) in &criteria.colors {
        let longest = set.r.len().max(set.g.len()).max(set.b.len());
        if longest > MAX_CHANNEL_VALUES {
            return Err(MabiError::InvalidInput(format!(
                "{} lists more than {} values for one channel",
                part, MAX_CHANNEL_VALUES
            )));
        }
    }
    Ok(())
}
