//! # mabi-core
//!
//! The pure data-shaping core of the Mabinogi market tools - THE LOGIC.
//!
//! This crate turns upstream auction and NPC shop records into typed items
//! and answers every question the front-ends ask of them: does an item pass
//! a detail filter, which pockets carry a colour, which page is shown, how
//! is a price written.
//!
//! ## Architectural Constraints
//!
//! - No network, no async, no I/O: callers fetch and hand records in.
//! - Parsing is total: malformed option values leave a stat unset rather
//!   than failing the listing.
//! - Deterministic: the same records and criteria give the same output,
//!   including the order of equal-priced listings.

// =============================================================================
// MODULES
// =============================================================================

pub mod category;
pub mod color;
pub mod display;
pub mod filter;
pub mod gold;
pub mod listing;
pub mod parser;
pub mod primitives;
pub mod shop;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    AuctionItem, AuctionPage, ColorPart, HornBugleHistory, HornBugleMessage, ItemOption,
    MabiError, NpcShop, NpcShopTab, RawAuctionItem, Rgb, SetEffect, ShopItem,
};

// =============================================================================
// RE-EXPORTS: Pipeline
// =============================================================================

pub use category::{Category, CategoryNode, default_categories, is_armor_category};
pub use color::{ColorTarget, matches_color, within_tolerance};
pub use display::{Highlight, OptionLine, render_options};
pub use filter::{Channel, ChannelSet, FilterCriteria, apply_filters, match_filter, matches_keyword};
pub use gold::gold_format;
pub use listing::{Page, PageWindow, SortOrder, paginate, sort_by_price};
pub use parser::{OptionKind, parse_auction_item, parse_auction_items};
pub use shop::{NPCS, PocketColorQuery, Server, pocket_items, validate_channel};
