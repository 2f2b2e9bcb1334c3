//! # Core Type Definitions
//!
//! This module contains all core types shared by the parser, the filter
//! evaluator and the applications:
//! - Wire records as returned by the upstream API (`RawAuctionItem`, `ItemOption`,
//!   `AuctionPage`, `NpcShop`, `HornBugleMessage`)
//! - The parsed listing (`AuctionItem`) with typed stats
//! - Colour primitives (`Rgb`, `ColorPart`)
//! - Error types (`MabiError`)
//!
//! ## Wire Tolerance
//!
//! Every wire field carries `#[serde(default)]`: the upstream API omits keys
//! freely and a missing key must never fail a whole page of results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// ITEM OPTION
// =============================================================================

/// One `{type, sub_type, value, value2, desc}` tuple of an item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemOption {
    pub option_type: String,
    pub option_sub_type: Option<String>,
    pub option_value: String,
    pub option_value2: Option<String>,
    pub option_desc: Option<String>,
}

impl ItemOption {
    /// Create an option with just a type and a value.
    #[must_use]
    pub fn new(option_type: impl Into<String>, option_value: impl Into<String>) -> Self {
        Self {
            option_type: option_type.into(),
            option_value: option_value.into(),
            ..Self::default()
        }
    }

    /// Set the sub type.
    #[must_use]
    pub fn with_sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.option_sub_type = Some(sub_type.into());
        self
    }

    /// Set the secondary value.
    #[must_use]
    pub fn with_value2(mut self, value2: impl Into<String>) -> Self {
        self.option_value2 = Some(value2.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.option_desc = Some(desc.into());
        self
    }

    /// Secondary value, treating an empty string like an absent one.
    #[must_use]
    pub fn value2(&self) -> Option<&str> {
        self.option_value2.as_deref().filter(|v| !v.is_empty())
    }

    /// Sub type as a string slice, if any.
    #[must_use]
    pub fn sub_type(&self) -> Option<&str> {
        self.option_sub_type.as_deref()
    }
}

// =============================================================================
// AUCTION LISTINGS (WIRE)
// =============================================================================

/// One auction listing exactly as the upstream API returns it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAuctionItem {
    pub auction_price_per_unit: u64,
    pub date_auction_expire: String,
    pub item_count: u32,
    pub item_display_name: String,
    pub item_name: String,
    pub item_option: Vec<ItemOption>,
}

/// One page of auction results plus the cursor for the next page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionPage {
    pub auction_item: Vec<RawAuctionItem>,
    pub next_cursor: Option<String>,
}

impl AuctionPage {
    /// An empty page with no continuation.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

// =============================================================================
// COLOUR PRIMITIVES
// =============================================================================

/// An RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a new colour.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel by index (0 = R, 1 = G, 2 = B).
    #[must_use]
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

/// One of the six dyeable regions of an item.
///
/// Serialized as the bare letter (`"A"`), labelled upstream as `"파트 A"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColorPart {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl ColorPart {
    /// All parts in display order.
    pub const ALL: [Self; 6] = [Self::A, Self::B, Self::C, Self::D, Self::E, Self::F];

    /// The upstream sub type label, e.g. `"파트 A"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "파트 A",
            Self::B => "파트 B",
            Self::C => "파트 C",
            Self::D => "파트 D",
            Self::E => "파트 E",
            Self::F => "파트 F",
        }
    }

    /// The bare letter.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
        }
    }

    /// Resolve an upstream sub type label. Only exact labels match.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|part| part.label() == label)
    }
}

impl fmt::Display for ColorPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ColorPart {
    type Err = MabiError;

    /// Accepts `"A"`, `"a"` or the upstream label `"파트 A"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(part) = Self::from_label(trimmed) {
            return Ok(part);
        }
        let mut chars = trimmed.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c.to_ascii_uppercase()),
            _ => None,
        };
        Self::ALL
            .into_iter()
            .find(|part| Some(part.letter()) == letter)
            .ok_or_else(|| MabiError::InvalidInput(format!("Unknown colour part: {}", s)))
    }
}

// =============================================================================
// PARSED AUCTION ITEM
// =============================================================================

/// A named set effect and its bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEffect {
    pub effect: String,
    pub value: i64,
}

/// A listing with its option array resolved into typed stats.
///
/// Produced by [`crate::parser::parse_auction_item`]. Every stat is optional
/// because an item only carries the options that apply to its kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionItem {
    pub auction_price_per_unit: u64,
    pub date_auction_expire: String,
    pub item_count: u32,
    pub item_display_name: String,
    pub item_name: String,
    pub item_option: Vec<ItemOption>,

    // Armour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defense: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protection: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magic_defense: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magic_protection: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proficiency: Option<i64>,

    // Weapons
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wound_rate_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wound_rate_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,

    // Shared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durability_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durability_max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enchant_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enchant_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enchant_desc_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enchant_desc_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_upgrade_r: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_upgrade_s: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sewing_rank: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sewing_option_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sewing_option_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sewing_option_3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erg_level: Option<i64>,
    pub set_effects: Vec<SetEffect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub piercing_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub piercing_increase: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_exclusive: Option<i64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub colors: BTreeMap<ColorPart, Rgb>,
}

impl AuctionItem {
    /// Colour of a part, if the item has one.
    #[must_use]
    pub fn color(&self, part: ColorPart) -> Option<Rgb> {
        self.colors.get(&part).copied()
    }
}

// =============================================================================
// NPC SHOP & HORN BUGLE (WIRE)
// =============================================================================

/// One item sold by an NPC.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopItem {
    pub item_display_name: String,
    pub item_count: u32,
    pub image_url: String,
    pub item_option: Vec<ItemOption>,
}

/// A tab of an NPC shop.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcShopTab {
    pub tab_name: String,
    pub item: Vec<ShopItem>,
}

/// The full shop listing for one NPC on one server channel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcShop {
    pub shop: Vec<NpcShopTab>,
    pub date_inquire: Option<String>,
    pub date_shop_next_update: Option<String>,
}

/// One world-wide horn bugle message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HornBugleMessage {
    pub character_name: String,
    pub message: String,
    pub date_send: String,
}

/// Horn bugle history envelope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HornBugleHistory {
    pub horn_bugle_world_history: Vec<HornBugleMessage>,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the core.
///
/// Parsing listings never fails; these cover user input (colours, channels,
/// servers, criteria files) and I/O performed by callers on the core's behalf.
#[derive(Debug, Error)]
pub enum MabiError {
    /// A user supplied value could not be interpreted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A colour string is neither `r,g,b`, `R:r G:g B:b` nor `#rrggbb`.
    #[error("Invalid colour: {0}")]
    InvalidColor(String),

    /// The channel does not exist on the server.
    #[error("Invalid channel {channel} for server {server} (valid: 1 ~ {max})")]
    InvalidChannel { server: String, channel: u32, max: u32 },

    /// The server name is not one of the known servers.
    #[error("Unknown server: {0}")]
    UnknownServer(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_part_labels_round_trip() {
        for part in ColorPart::ALL {
            assert_eq!(ColorPart::from_label(part.label()), Some(part));
        }
        assert_eq!(ColorPart::from_label("파트 G"), None);
    }

    #[test]
    fn color_part_from_str_accepts_letter_and_label() {
        assert_eq!("a".parse::<ColorPart>().ok(), Some(ColorPart::A));
        assert_eq!(" F ".parse::<ColorPart>().ok(), Some(ColorPart::F));
        assert_eq!("파트 C".parse::<ColorPart>().ok(), Some(ColorPart::C));
        assert!("Z".parse::<ColorPart>().is_err());
    }

    #[test]
    fn raw_item_tolerates_missing_keys() {
        let json = r#"{"item_name":"롱 소드","item_option":[{"option_type":"공격","option_value":"10"}]}"#;
        let item: RawAuctionItem = serde_json::from_str(json).expect("deserialize");
        assert_eq!(item.item_name, "롱 소드");
        assert_eq!(item.auction_price_per_unit, 0);
        assert_eq!(item.item_option.len(), 1);
        assert_eq!(item.item_option[0].option_sub_type, None);
    }

    #[test]
    fn empty_value2_is_absent() {
        let opt = ItemOption::new("공격", "10").with_value2("");
        assert_eq!(opt.value2(), None);
    }

    #[test]
    fn colors_serialize_with_letter_keys() {
        let mut item = AuctionItem::default();
        item.colors.insert(ColorPart::B, Rgb::new(1, 2, 3));
        let json = serde_json::to_value(&item).expect("serialize");
        assert_eq!(json["colors"]["B"]["g"], 2);
        assert!(json.get("attack_min").is_none());
    }
}
