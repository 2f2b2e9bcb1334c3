//! # Innate Primitives
//!
//! Fixed constants of the game vocabulary and of the listing pipeline.
//! These are compiled into the binary and immutable at runtime.

/// Keyword used for the initial listing when no query is given.
pub const DEFAULT_KEYWORD: &str = "롱 소드";

/// Minimum trimmed length (in characters) of an item name before it is
/// forwarded to a category listing request.
///
/// Shorter names are dropped and the category is listed in full.
pub const MIN_ITEM_NAME_CHARS: usize = 2;

/// Name of the NPC shop tab holding pockets.
pub const POCKET_TAB_NAME: &str = "주머니";

/// Option type carrying an item part colour.
pub const COLOR_OPTION_TYPE: &str = "아이템 색상";

// =============================================================================
// LISTING LIMITS
// =============================================================================

/// Default number of listings per page.
pub const DEFAULT_PAGE_SIZE: usize = 7;

/// Maximum number of listings per page.
///
/// Requests asking for more are clamped.
pub const MAX_PAGE_SIZE: usize = 200;

/// Page buttons shown per group on wide layouts.
pub const PAGE_GROUP_SIZE: usize = 8;

/// Page buttons shown per group on compact layouts.
pub const COMPACT_PAGE_GROUP_SIZE: usize = 6;

// =============================================================================
// COLOUR MATCHING
// =============================================================================

/// Default per-channel tolerance for pocket colour searches.
pub const DEFAULT_COLOR_TOLERANCE: u8 = 0;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for search keywords, in bytes.
///
/// Longer keywords are rejected before any upstream request.
pub const MAX_KEYWORD_LENGTH: usize = 100;

/// Maximum number of accepted values per colour channel in a filter.
pub const MAX_CHANNEL_VALUES: usize = 256;
