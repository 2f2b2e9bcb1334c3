//! # Filter Criteria
//!
//! The detail-search form as a sparse record, and its evaluator.
//!
//! Every constraint is optional and independent; an item passes when it
//! satisfies all of the constraints that are set. A constraint on a stat
//! the item does not carry always fails.
//!
//! ## Constraint Shapes
//!
//! - **Range**: `min_*` checks the item's lower stat (`attack_min`,
//!   `durability_min`, ...) and `max_*` its upper stat.
//! - **Equality**: special upgrade levels and remaining exclusive unlocks.
//! - **Substring**: enchants, sewing options and set effects. An empty
//!   criterion string is the same as no criterion.
//! - **Colour**: per part and channel, a list of accepted values, widened
//!   by `color_tolerance`.

use crate::category::Category;
use crate::color::within_tolerance;
use crate::types::{AuctionItem, ColorPart};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// CRITERIA
// =============================================================================

/// Accepted values per channel of one colour part. Empty lists are wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSet {
    pub r: Vec<u8>,
    pub g: Vec<u8>,
    pub b: Vec<u8>,
}

impl ChannelSet {
    /// True when no channel is constrained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.r.is_empty() && self.g.is_empty() && self.b.is_empty()
    }
}

/// Sparse, conjunctive search constraints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    // Weapon ranges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_attack: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attack: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_wound_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wound_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_critical: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_critical: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_balance: Option<f64>,

    // Armour minimums
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_defense: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_protection: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_magic_defense: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_magic_protection: Option<i64>,

    // Shared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_durability: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_durability: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enchant_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enchant_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_erg: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_erg: Option<i64>,
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
    pub set_effect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_exclusive: Option<i64>,

    // Colours
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub colors: BTreeMap<ColorPart, ChannelSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_tolerance: Option<u8>,
}

impl FilterCriteria {
    /// Criteria with no constraint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no constraint is set.
    ///
    /// Empty strings and empty channel sets count as unset; the tolerance
    /// alone constrains nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let tolerance_free = Self {
            color_tolerance: None,
            colors: self
                .colors
                .iter()
                .filter(|(_, set)| !set.is_empty())
                .map(|(part, set)| (*part, set.clone()))
                .collect(),
            enchant_prefix: non_empty(&self.enchant_prefix),
            enchant_suffix: non_empty(&self.enchant_suffix),
            sewing_option_1: non_empty(&self.sewing_option_1),
            sewing_option_2: non_empty(&self.sewing_option_2),
            sewing_option_3: non_empty(&self.sewing_option_3),
            set_effect: non_empty(&self.set_effect),
            ..self.clone()
        };
        tolerance_free == Self::default()
    }

    /// Narrow the criteria to the fields the category's form offers.
    ///
    /// Armour categories search on single-value defence stats and ignore the
    /// weapon ranges; every other category ignores the armour stats.
    #[must_use]
    pub fn for_category(mut self, category: Option<&Category>) -> Self {
        if category.is_some_and(Category::is_armor) {
            self.min_attack = None;
            self.max_attack = None;
            self.min_wound_rate = None;
            self.max_wound_rate = None;
            self.min_critical = None;
            self.max_critical = None;
            self.min_balance = None;
            self.max_balance = None;
        } else {
            self.min_defense = None;
            self.min_protection = None;
            self.min_magic_defense = None;
            self.min_magic_protection = None;
        }
        self
    }

    /// Accept values for one channel of a part.
    #[must_use]
    pub fn with_color_channel(mut self, part: ColorPart, channel: Channel, values: Vec<u8>) -> Self {
        let set = self.colors.entry(part).or_default();
        match channel {
            Channel::R => set.r = values,
            Channel::G => set.g = values,
            Channel::B => set.b = values,
        }
        self
    }
}

/// A colour channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    R,
    G,
    B,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

// =============================================================================
// EVALUATOR
// =============================================================================

fn at_least<T: PartialOrd>(actual: Option<T>, min: Option<T>) -> bool {
    match min {
        None => true,
        Some(min) => actual.is_some_and(|a| a >= min),
    }
}

fn at_most<T: PartialOrd>(actual: Option<T>, max: Option<T>) -> bool {
    match max {
        None => true,
        Some(max) => actual.is_some_and(|a| a <= max),
    }
}

fn equals<T: PartialEq>(actual: Option<T>, expected: Option<T>) -> bool {
    match expected {
        None => true,
        Some(expected) => actual.is_some_and(|a| a == expected),
    }
}

fn contains(actual: Option<&str>, needle: Option<&str>) -> bool {
    match needle.filter(|n| !n.is_empty()) {
        None => true,
        Some(needle) => actual.is_some_and(|a| a.contains(needle)),
    }
}

fn channel_accepts(accepted: &[u8], actual: u8, tolerance: u8) -> bool {
    accepted.is_empty() || accepted.iter().any(|&v| within_tolerance(v, actual, tolerance))
}

fn colors_match(item: &AuctionItem, criteria: &FilterCriteria) -> bool {
    let tolerance = criteria.color_tolerance.unwrap_or(0);
    criteria
        .colors
        .iter()
        .filter(|(_, set)| !set.is_empty())
        .all(|(part, set)| {
            item.color(*part).is_some_and(|rgb| {
                channel_accepts(&set.r, rgb.r, tolerance)
                    && channel_accepts(&set.g, rgb.g, tolerance)
                    && channel_accepts(&set.b, rgb.b, tolerance)
            })
        })
}

/// Whether an item satisfies every constraint that is set.
#[must_use]
pub fn match_filter(item: &AuctionItem, criteria: &FilterCriteria) -> bool {
    let c = criteria;

    at_least(item.attack_min, c.min_attack)
        && at_most(item.attack_max, c.max_attack)
        && at_least(item.wound_rate_min, c.min_wound_rate)
        && at_most(item.wound_rate_max, c.max_wound_rate)
        && at_least(item.critical, c.min_critical)
        && at_most(item.critical, c.max_critical)
        && at_least(item.balance, c.min_balance)
        && at_most(item.balance, c.max_balance)
        && at_least(item.defense, c.min_defense)
        && at_least(item.protection, c.min_protection)
        && at_least(item.magic_defense, c.min_magic_defense)
        && at_least(item.magic_protection, c.min_magic_protection)
        && at_least(item.durability_min, c.min_durability)
        && at_most(item.durability_max, c.max_durability)
        && contains(item.enchant_prefix.as_deref(), c.enchant_prefix.as_deref())
        && contains(item.enchant_suffix.as_deref(), c.enchant_suffix.as_deref())
        && at_least(item.erg_level, c.min_erg)
        && at_most(item.erg_level, c.max_erg)
        && equals(item.special_upgrade_r, c.special_upgrade_r)
        && equals(item.special_upgrade_s, c.special_upgrade_s)
        && at_least(item.sewing_rank, c.sewing_rank)
        && contains(item.sewing_option_1.as_deref(), c.sewing_option_1.as_deref())
        && contains(item.sewing_option_2.as_deref(), c.sewing_option_2.as_deref())
        && contains(item.sewing_option_3.as_deref(), c.sewing_option_3.as_deref())
        && set_effect_matches(item, c.set_effect.as_deref())
        && equals(item.remaining_exclusive, c.remaining_exclusive)
        && colors_match(item, c)
}

fn set_effect_matches(item: &AuctionItem, needle: Option<&str>) -> bool {
    match needle.filter(|n| !n.is_empty()) {
        None => true,
        Some(needle) => item.set_effects.iter().any(|e| e.effect.contains(needle)),
    }
}

/// Keep the items that satisfy the criteria. Empty criteria keep everything.
#[must_use]
pub fn apply_filters(items: Vec<AuctionItem>, criteria: &FilterCriteria) -> Vec<AuctionItem> {
    if criteria.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| match_filter(item, criteria))
        .collect()
}

/// Case-insensitive substring match on the item or display name.
///
/// A blank keyword matches everything.
#[must_use]
pub fn matches_keyword(item: &AuctionItem, keyword: &str) -> bool {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return true;
    }
    item.item_name.to_lowercase().contains(&keyword)
        || item.item_display_name.to_lowercase().contains(&keyword)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Rgb, SetEffect};

    fn sword() -> AuctionItem {
        let mut item = AuctionItem {
            item_name: "롱 소드".to_string(),
            item_display_name: "신속한 Long Sword".to_string(),
            attack_min: Some(12),
            attack_max: Some(30),
            wound_rate_min: Some(35.0),
            wound_rate_max: Some(60.0),
            critical: Some(75.0),
            balance: Some(64.0),
            durability_min: Some(15),
            durability_max: Some(17),
            enchant_prefix: Some("신속한".to_string()),
            erg_level: Some(25),
            special_upgrade_r: Some(6),
            sewing_rank: Some(2),
            sewing_option_1: Some("최대 공격력 15 레벨".to_string()),
            set_effects: vec![SetEffect {
                effect: "크리티컬 대미지 증가".to_string(),
                value: 4,
            }],
            remaining_exclusive: Some(1),
            ..AuctionItem::default()
        };
        item.colors.insert(ColorPart::A, Rgb::new(255, 0, 128));
        item
    }

    #[test]
    fn empty_criteria_match_everything() {
        assert!(FilterCriteria::new().is_empty());
        assert!(match_filter(&AuctionItem::default(), &FilterCriteria::new()));
    }

    #[test]
    fn blank_strings_and_tolerance_are_empty() {
        let criteria = FilterCriteria {
            enchant_prefix: Some(String::new()),
            color_tolerance: Some(10),
            ..FilterCriteria::default()
        }
        .with_color_channel(ColorPart::A, Channel::R, vec![]);
        assert!(criteria.is_empty());
    }

    #[test]
    fn attack_range_uses_min_and_max_fields() {
        let item = sword();
        let ok = FilterCriteria {
            min_attack: Some(12),
            max_attack: Some(30),
            ..FilterCriteria::default()
        };
        assert!(match_filter(&item, &ok));

        let too_high = FilterCriteria {
            max_attack: Some(29),
            ..FilterCriteria::default()
        };
        assert!(!match_filter(&item, &too_high));
    }

    #[test]
    fn missing_stat_fails_constraint() {
        let criteria = FilterCriteria {
            min_defense: Some(1),
            ..FilterCriteria::default()
        };
        assert!(!match_filter(&sword(), &criteria));
    }

    #[test]
    fn percent_ranges() {
        let criteria = FilterCriteria {
            min_critical: Some(70.0),
            max_wound_rate: Some(60.0),
            min_balance: Some(64.5),
            ..FilterCriteria::default()
        };
        assert!(!match_filter(&sword(), &criteria));
        let criteria = FilterCriteria {
            min_balance: Some(64.0),
            ..criteria
        };
        assert!(match_filter(&sword(), &criteria));
    }

    #[test]
    fn equality_fields() {
        let r6 = FilterCriteria {
            special_upgrade_r: Some(6),
            ..FilterCriteria::default()
        };
        let s6 = FilterCriteria {
            special_upgrade_s: Some(6),
            ..FilterCriteria::default()
        };
        assert!(match_filter(&sword(), &r6));
        assert!(!match_filter(&sword(), &s6));
    }

    #[test]
    fn sewing_rank_is_a_minimum() {
        let criteria = FilterCriteria {
            sewing_rank: Some(1),
            ..FilterCriteria::default()
        };
        assert!(match_filter(&sword(), &criteria));
    }

    #[test]
    fn substring_fields() {
        let criteria = FilterCriteria {
            enchant_prefix: Some("신속".to_string()),
            sewing_option_1: Some("공격력".to_string()),
            set_effect: Some("크리티컬".to_string()),
            ..FilterCriteria::default()
        };
        assert!(match_filter(&sword(), &criteria));

        let suffix = FilterCriteria {
            enchant_suffix: Some("자이언트".to_string()),
            ..FilterCriteria::default()
        };
        assert!(!match_filter(&sword(), &suffix));
    }

    #[test]
    fn color_membership_and_tolerance() {
        let exact = FilterCriteria::new().with_color_channel(ColorPart::A, Channel::R, vec![250, 255]);
        assert!(match_filter(&sword(), &exact));

        let near = FilterCriteria::new().with_color_channel(ColorPart::A, Channel::G, vec![3]);
        assert!(!match_filter(&sword(), &near));
        let near = FilterCriteria {
            color_tolerance: Some(3),
            ..near
        };
        assert!(match_filter(&sword(), &near));

        let other_part = FilterCriteria::new().with_color_channel(ColorPart::B, Channel::B, vec![0]);
        assert!(!match_filter(&sword(), &other_part));
    }

    #[test]
    fn for_category_drops_unused_fields() {
        let criteria = FilterCriteria {
            min_attack: Some(10),
            min_defense: Some(5),
            ..FilterCriteria::default()
        };
        let armor = Category::new(21, "천옷");
        let sword_cat = Category::new(3, "검");

        let narrowed = criteria.clone().for_category(Some(&armor));
        assert_eq!(narrowed.min_attack, None);
        assert_eq!(narrowed.min_defense, Some(5));

        let narrowed = criteria.clone().for_category(Some(&sword_cat));
        assert_eq!(narrowed.min_attack, Some(10));
        assert_eq!(narrowed.min_defense, None);

        assert_eq!(criteria.for_category(None).min_defense, None);
    }

    #[test]
    fn apply_filters_keeps_order() {
        let mut weak = sword();
        weak.attack_min = Some(1);
        weak.item_name = "약한".to_string();
        let items = vec![sword(), weak, sword()];
        let criteria = FilterCriteria {
            min_attack: Some(10),
            ..FilterCriteria::default()
        };
        let kept = apply_filters(items, &criteria);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|i| i.item_name == "롱 소드"));
    }

    #[test]
    fn keyword_is_case_insensitive_on_both_names() {
        let item = sword();
        assert!(matches_keyword(&item, "long"));
        assert!(matches_keyword(&item, "롱"));
        assert!(matches_keyword(&item, "  "));
        assert!(!matches_keyword(&item, "도끼"));
    }

    #[test]
    fn criteria_deserialize_sparse_json() {
        let json = r#"{"min_attack":10,"colors":{"A":{"r":[255]}},"color_tolerance":5}"#;
        let criteria: FilterCriteria = serde_json::from_str(json).expect("criteria");
        assert_eq!(criteria.min_attack, Some(10));
        assert_eq!(criteria.colors[&ColorPart::A].r, vec![255]);
        assert!(match_filter(&sword(), &criteria));
    }
}
