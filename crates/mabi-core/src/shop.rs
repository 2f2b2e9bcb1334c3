//! # NPC Shops
//!
//! Servers and their channel ranges, the NPCs that sell dyed pockets, and
//! the pocket colour search.
//!
//! Pocket colours come from `아이템 색상` options whose sub type names the
//! part (`파트 A` .. `파트 F`) and whose value is an `"r,g,b"` string.

use crate::color::{ColorTarget, matches_color};
use crate::primitives::{COLOR_OPTION_TYPE, DEFAULT_COLOR_TOLERANCE, POCKET_TAB_NAME};
use crate::types::{ColorPart, MabiError, NpcShop, ShopItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// =============================================================================
// SERVERS
// =============================================================================

/// A game server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Server {
    #[serde(rename = "류트")]
    Lute,
    #[serde(rename = "만돌린")]
    Mandolin,
    #[serde(rename = "하프")]
    Harp,
    #[serde(rename = "울프")]
    Wolf,
}

impl Server {
    /// All servers in menu order.
    pub const ALL: [Self; 4] = [Self::Lute, Self::Mandolin, Self::Harp, Self::Wolf];

    /// The upstream server name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lute => "류트",
            Self::Mandolin => "만돌린",
            Self::Harp => "하프",
            Self::Wolf => "울프",
        }
    }

    /// Highest channel number on the server.
    #[must_use]
    pub const fn max_channel(self) -> u32 {
        match self {
            Self::Lute => 44,
            Self::Harp => 25,
            Self::Mandolin | Self::Wolf => 16,
        }
    }

    /// Resolve an upstream server name.
    pub fn from_name(name: &str) -> Result<Self, MabiError> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| MabiError::UnknownServer(name.to_string()))
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Server {
    type Err = MabiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Check that `channel` exists on `server` (`1..=max_channel`).
pub fn validate_channel(server: Server, channel: u32) -> Result<u32, MabiError> {
    let max = server.max_channel();
    if (1..=max).contains(&channel) {
        Ok(channel)
    } else {
        Err(MabiError::InvalidChannel {
            server: server.name().to_string(),
            channel,
            max,
        })
    }
}

/// NPCs whose shops carry pockets, in menu order.
pub const NPCS: [&str; 21] = [
    "델",
    "델렌",
    "상인 라누",
    "상인 피루",
    "모락",
    "상인 아루",
    "리나",
    "상인 누누",
    "상인 메루",
    "켄",
    "귀넥",
    "얼리",
    "데위",
    "테일로",
    "상인 세누",
    "상인 베루",
    "상인 에루",
    "상인 네루",
    "카디",
    "인장 상인",
    "피오나트",
];

/// Whether `name` is a known pocket NPC.
#[must_use]
pub fn is_known_npc(name: &str) -> bool {
    NPCS.contains(&name.trim())
}

// =============================================================================
// POCKETS
// =============================================================================

/// Items of every pocket tab of a shop, in tab order.
#[must_use]
pub fn pocket_items(shop: &NpcShop) -> Vec<&ShopItem> {
    shop.shop
        .iter()
        .filter(|tab| tab.tab_name == POCKET_TAB_NAME)
        .flat_map(|tab| tab.item.iter())
        .collect()
}

/// The raw `"r,g,b"` colour of one part of a shop item.
#[must_use]
pub fn part_color(item: &ShopItem, part: ColorPart) -> Option<&str> {
    item.item_option
        .iter()
        .find(|o| o.option_type == COLOR_OPTION_TYPE && o.sub_type() == Some(part.label()))
        .map(|o| o.option_value.as_str())
}

/// Per-part colour constraints for a pocket search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PocketColorQuery {
    pub parts: BTreeMap<ColorPart, ColorTarget>,
    pub tolerance: u8,
}

impl Default for PocketColorQuery {
    fn default() -> Self {
        Self {
            parts: BTreeMap::new(),
            tolerance: DEFAULT_COLOR_TOLERANCE,
        }
    }
}

impl PocketColorQuery {
    /// An unconstrained query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain one part.
    #[must_use]
    pub fn with_part(mut self, part: ColorPart, target: impl Into<ColorTarget>) -> Self {
        self.parts.insert(part, target.into());
        self
    }

    /// Set the per-channel tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// True when no part is constrained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.values().all(ColorTarget::is_unset)
    }

    /// Whether every constrained part is present on the item and matches.
    #[must_use]
    pub fn matches(&self, item: &ShopItem) -> bool {
        self.parts
            .iter()
            .filter(|(_, target)| !target.is_unset())
            .all(|(part, target)| {
                part_color(item, *part).is_some_and(|actual| matches_color(target, actual, self.tolerance))
            })
    }

    /// Pocket items of the shop that match the query.
    #[must_use]
    pub fn search<'a>(&self, shop: &'a NpcShop) -> Vec<&'a ShopItem> {
        pocket_items(shop)
            .into_iter()
            .filter(|item| self.matches(item))
            .collect()
    }
}

// =============================================================================
// REFRESH COUNTDOWN
// =============================================================================

/// Time left until the shop's next update. Past or unparseable times give 0.
#[must_use]
pub fn time_until_refresh(next_update: &str, now: DateTime<Utc>) -> Duration {
    DateTime::parse_from_rfc3339(next_update.trim())
        .ok()
        .and_then(|next| (next.with_timezone(&Utc) - now).to_std().ok())
        .map(|left| Duration::from_secs(left.as_secs()))
        .unwrap_or(Duration::ZERO)
}

/// `"{m}분 {ss}초"`, seconds zero-padded.
#[must_use]
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{}분 {:02}초", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemOption, NpcShopTab, Rgb};
    use chrono::TimeZone;

    fn pocket(colors: &[(ColorPart, &str)]) -> ShopItem {
        ShopItem {
            item_display_name: "튼튼한 주머니".to_string(),
            item_count: 1,
            image_url: String::new(),
            item_option: colors
                .iter()
                .map(|(part, value)| ItemOption::new(COLOR_OPTION_TYPE, *value).with_sub_type(part.label()))
                .collect(),
        }
    }

    fn shop() -> NpcShop {
        NpcShop {
            shop: vec![
                NpcShopTab {
                    tab_name: "주머니".to_string(),
                    item: vec![
                        pocket(&[(ColorPart::A, "255,0,0"), (ColorPart::B, "0,0,0")]),
                        pocket(&[(ColorPart::A, "10,10,10")]),
                    ],
                },
                NpcShopTab {
                    tab_name: "잡화".to_string(),
                    item: vec![pocket(&[(ColorPart::A, "255,0,0")])],
                },
            ],
            date_inquire: None,
            date_shop_next_update: None,
        }
    }

    #[test]
    fn server_channels() {
        assert_eq!(Server::from_name("류트").map(Server::max_channel).ok(), Some(44));
        assert_eq!(Server::Harp.max_channel(), 25);
        assert!(Server::from_name("타르라크").is_err());
        assert!(validate_channel(Server::Wolf, 16).is_ok());
        assert!(matches!(
            validate_channel(Server::Wolf, 17),
            Err(MabiError::InvalidChannel { max: 16, .. })
        ));
        assert!(validate_channel(Server::Lute, 0).is_err());
    }

    #[test]
    fn npc_list() {
        assert_eq!(NPCS[0], "델");
        assert!(is_known_npc(" 피오나트 "));
        assert!(!is_known_npc("던컨"));
    }

    #[test]
    fn only_pocket_tabs() {
        let shop = shop();
        assert_eq!(pocket_items(&shop).len(), 2);
    }

    #[test]
    fn empty_query_matches_all_pockets() {
        let shop = shop();
        assert!(PocketColorQuery::new().is_empty());
        assert_eq!(PocketColorQuery::new().search(&shop).len(), 2);
    }

    #[test]
    fn part_must_be_present() {
        let shop = shop();
        let query = PocketColorQuery::new().with_part(ColorPart::B, Rgb::new(0, 0, 0));
        assert_eq!(query.search(&shop).len(), 1);
    }

    #[test]
    fn tolerance_widens() {
        let shop = shop();
        let query = PocketColorQuery::new().with_part(ColorPart::A, Rgb::new(12, 8, 10));
        assert!(query.search(&shop).is_empty());
        assert_eq!(query.with_tolerance(2).search(&shop).len(), 1);
    }

    #[test]
    fn countdown() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().expect("time");
        let left = time_until_refresh("2025-01-01T00:03:07+00:00", now);
        assert_eq!(format_remaining(left), "3분 07초");
        assert_eq!(time_until_refresh("2024-12-31T23:59:00Z", now), Duration::ZERO);
        assert_eq!(time_until_refresh("soon", now), Duration::ZERO);
    }
}
