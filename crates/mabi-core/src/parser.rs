//! # Item Option Parser
//!
//! Resolves the flat option array of a listing into typed stats.
//!
//! The upstream API describes every stat of an item as an
//! `{option_type, option_sub_type, option_value, option_value2, option_desc}`
//! tuple. [`OptionKind`] is the closed vocabulary of option types the
//! filter understands; anything else is carried along untouched in
//! `item_option` for display but contributes no stat.
//!
//! ## Totality
//!
//! Parsing never fails. A value that is not a number leaves its stat unset,
//! so the item simply fails any filter that constrains that stat.

use crate::types::{AuctionItem, ColorPart, ItemOption, RawAuctionItem, Rgb, SetEffect};

// =============================================================================
// OPTION VOCABULARY
// =============================================================================

/// Option types understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Defense,
    Protection,
    MagicDefense,
    MagicProtection,
    Proficiency,
    Durability,
    Attack,
    WoundRate,
    Critical,
    Balance,
    Enchant,
    ItemProtection,
    SpecialUpgrade,
    SewingRank,
    SewingOption,
    Erg,
    SetEffect,
    RemainingExclusive,
    PiercingLevel,
    ItemColor,
}

impl OptionKind {
    /// Every kind, in the order the upstream tooltip lists them.
    pub const ALL: [Self; 20] = [
        Self::Defense,
        Self::Protection,
        Self::MagicDefense,
        Self::MagicProtection,
        Self::Proficiency,
        Self::Durability,
        Self::Attack,
        Self::WoundRate,
        Self::Critical,
        Self::Balance,
        Self::Enchant,
        Self::ItemProtection,
        Self::SpecialUpgrade,
        Self::SewingRank,
        Self::SewingOption,
        Self::Erg,
        Self::SetEffect,
        Self::RemainingExclusive,
        Self::PiercingLevel,
        Self::ItemColor,
    ];

    /// The upstream `option_type` string.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Defense => "방어력",
            Self::Protection => "보호",
            Self::MagicDefense => "마법 방어력",
            Self::MagicProtection => "마법 보호",
            Self::Proficiency => "숙련",
            Self::Durability => "내구력",
            Self::Attack => "공격",
            Self::WoundRate => "부상률",
            Self::Critical => "크리티컬",
            Self::Balance => "밸런스",
            Self::Enchant => "인챈트",
            Self::ItemProtection => "아이템 보호",
            Self::SpecialUpgrade => "특별 개조",
            Self::SewingRank => "세공 랭크",
            Self::SewingOption => "세공 옵션",
            Self::Erg => "에르그",
            Self::SetEffect => "세트 효과",
            Self::RemainingExclusive => "남은 전용 해제 가능 횟수",
            Self::PiercingLevel => "피어싱 레벨",
            Self::ItemColor => "아이템 색상",
        }
    }

    /// Resolve an upstream `option_type`. Matching is exact.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

// =============================================================================
// VALUE COERCION
// =============================================================================

/// Parse an integer stat, ignoring surrounding whitespace.
fn parse_int(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Parse a percentage such as `"35%"` or `"12.5 %"`.
///
/// Reads the longest numeric prefix after stripping `%`, so trailing noise
/// like `"75% 이상"` still yields 75.
fn parse_percent(value: &str) -> Option<f64> {
    let cleaned = value.replace('%', "");
    let trimmed = cleaned.trim();

    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (idx, ch) in trimmed.char_indices() {
        match ch {
            '+' | '-' if idx == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = idx + ch.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    trimmed[..end].trim_end_matches('.').parse().ok()
}

/// Parse an `"r,g,b"` colour value. Needs at least three components.
fn parse_color_value(value: &str) -> Option<Rgb> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() < 3 {
        return None;
    }
    let r = parts[0].trim().parse().ok()?;
    let g = parts[1].trim().parse().ok()?;
    let b = parts[2].trim().parse().ok()?;
    Some(Rgb::new(r, g, b))
}

// =============================================================================
// PARSER
// =============================================================================

/// Resolve the option array of a listing into typed stats.
///
/// Options are applied in order: a later option of the same kind
/// overwrites an earlier one, except set effects which accumulate.
#[must_use]
pub fn parse_auction_item(raw: RawAuctionItem) -> AuctionItem {
    let mut item = AuctionItem {
        auction_price_per_unit: raw.auction_price_per_unit,
        date_auction_expire: raw.date_auction_expire,
        item_count: raw.item_count,
        item_display_name: raw.item_display_name,
        item_name: raw.item_name,
        ..AuctionItem::default()
    };

    for option in &raw.item_option {
        apply_option(&mut item, option);
    }

    item.item_option = raw.item_option;
    item
}

/// Parse a whole page of listings.
#[must_use]
pub fn parse_auction_items(raw: Vec<RawAuctionItem>) -> Vec<AuctionItem> {
    raw.into_iter().map(parse_auction_item).collect()
}

/// Apply a single option to a parsed item.
pub fn apply_option(item: &mut AuctionItem, option: &ItemOption) {
    let Some(kind) = OptionKind::from_label(&option.option_type) else {
        return;
    };
    let value = option.option_value.as_str();

    match kind {
        OptionKind::Defense => item.defense = parse_int(value),
        OptionKind::Protection => item.protection = parse_int(value),
        OptionKind::MagicDefense => item.magic_defense = parse_int(value),
        OptionKind::MagicProtection => item.magic_protection = parse_int(value),
        OptionKind::Proficiency => item.proficiency = parse_int(value),

        OptionKind::Durability => {
            item.durability_min = parse_int(value);
            item.durability_max = match option.value2() {
                Some(max) => parse_int(max),
                None => item.durability_min,
            };
        }

        OptionKind::Attack => {
            item.attack_min = parse_int(value);
            item.attack_max = match option.value2() {
                Some(max) => parse_int(max),
                None => item.attack_min,
            };
        }

        OptionKind::WoundRate => {
            item.wound_rate_min = parse_percent(value);
            item.wound_rate_max = match option.value2() {
                Some(max) => parse_percent(max),
                None => item.wound_rate_min,
            };
        }

        OptionKind::Critical => item.critical = parse_percent(value),
        OptionKind::Balance => item.balance = parse_percent(value),

        OptionKind::Enchant => match option.sub_type() {
            Some("접두") => {
                item.enchant_prefix = Some(value.to_string());
                if let Some(desc) = option.option_desc.as_deref().filter(|d| !d.is_empty()) {
                    item.enchant_desc_prefix = Some(desc.to_string());
                }
            }
            Some("접미") => {
                item.enchant_suffix = Some(value.to_string());
                if let Some(desc) = option.option_desc.as_deref().filter(|d| !d.is_empty()) {
                    item.enchant_desc_suffix = Some(desc.to_string());
                }
            }
            _ => {}
        },

        // Armour shows "인챈트 실패" protection here; nothing to filter on.
        OptionKind::ItemProtection => {}

        OptionKind::SpecialUpgrade => match option.sub_type() {
            Some("R") => item.special_upgrade_r = parse_int(value),
            Some("S") => item.special_upgrade_s = parse_int(value),
            _ => {}
        },

        OptionKind::SewingRank => item.sewing_rank = parse_int(value),

        OptionKind::SewingOption => match option.sub_type() {
            Some("1") => item.sewing_option_1 = Some(value.to_string()),
            Some("2") => item.sewing_option_2 = Some(value.to_string()),
            Some("3") => item.sewing_option_3 = Some(value.to_string()),
            _ => {}
        },

        OptionKind::Erg => item.erg_level = parse_int(value),

        OptionKind::SetEffect => item.set_effects.push(SetEffect {
            effect: value.to_string(),
            value: option.value2().and_then(parse_int).unwrap_or(0),
        }),

        OptionKind::RemainingExclusive => item.remaining_exclusive = parse_int(value),

        OptionKind::PiercingLevel => {
            item.piercing_level = parse_int(value);
            if let Some(increase) = option.value2() {
                item.piercing_increase = parse_int(&increase.replacen('+', "", 1));
            }
        }

        OptionKind::ItemColor => {
            let part = option.sub_type().and_then(ColorPart::from_label);
            if let (Some(part), Some(rgb)) = (part, parse_color_value(value)) {
                item.colors.insert(part, rgb);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with(options: Vec<ItemOption>) -> RawAuctionItem {
        RawAuctionItem {
            auction_price_per_unit: 1_500_000,
            item_name: "롱 소드".to_string(),
            item_display_name: "신속한 롱 소드".to_string(),
            item_count: 1,
            item_option: options,
            ..RawAuctionItem::default()
        }
    }

    #[test]
    fn every_kind_label_resolves() {
        for kind in OptionKind::ALL {
            assert_eq!(OptionKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(OptionKind::from_label("데미지"), None);
    }

    #[test]
    fn attack_range_and_single_value() {
        let item = parse_auction_item(raw_with(vec![
            ItemOption::new("공격", "12").with_value2("30"),
        ]));
        assert_eq!(item.attack_min, Some(12));
        assert_eq!(item.attack_max, Some(30));

        let item = parse_auction_item(raw_with(vec![ItemOption::new("공격", "12")]));
        assert_eq!(item.attack_max, Some(12));
    }

    #[test]
    fn durability_defaults_max_to_min() {
        let item = parse_auction_item(raw_with(vec![
            ItemOption::new("내구력", "15").with_value2(""),
        ]));
        assert_eq!(item.durability_min, Some(15));
        assert_eq!(item.durability_max, Some(15));
    }

    #[test]
    fn percentages_are_stripped() {
        let item = parse_auction_item(raw_with(vec![
            ItemOption::new("부상률", "35%").with_value2("60%"),
            ItemOption::new("크리티컬", "75%"),
            ItemOption::new("밸런스", "64 %"),
        ]));
        assert_eq!(item.wound_rate_min, Some(35.0));
        assert_eq!(item.wound_rate_max, Some(60.0));
        assert_eq!(item.critical, Some(75.0));
        assert_eq!(item.balance, Some(64.0));
    }

    #[test]
    fn percent_prefix_parse() {
        assert_eq!(parse_percent("12.5%"), Some(12.5));
        assert_eq!(parse_percent("75% 이상"), Some(75.0));
        assert_eq!(parse_percent("%"), None);
        assert_eq!(parse_percent("abc"), None);
    }

    #[test]
    fn enchant_prefix_and_suffix_with_desc() {
        let item = parse_auction_item(raw_with(vec![
            ItemOption::new("인챈트", "신속한")
                .with_sub_type("접두")
                .with_desc("밸런스 3 증가"),
            ItemOption::new("인챈트", "자이언트").with_sub_type("접미"),
            ItemOption::new("인챈트", "무시됨").with_sub_type("기타"),
        ]));
        assert_eq!(item.enchant_prefix.as_deref(), Some("신속한"));
        assert_eq!(item.enchant_desc_prefix.as_deref(), Some("밸런스 3 증가"));
        assert_eq!(item.enchant_suffix.as_deref(), Some("자이언트"));
        assert_eq!(item.enchant_desc_suffix, None);
    }

    #[test]
    fn special_upgrade_by_sub_type() {
        let item = parse_auction_item(raw_with(vec![
            ItemOption::new("특별 개조", "7").with_sub_type("S"),
        ]));
        assert_eq!(item.special_upgrade_s, Some(7));
        assert_eq!(item.special_upgrade_r, None);
    }

    #[test]
    fn sewing_rank_and_options() {
        let item = parse_auction_item(raw_with(vec![
            ItemOption::new("세공 랭크", "2"),
            ItemOption::new("세공 옵션", "최대 공격력 15 레벨").with_sub_type("1"),
            ItemOption::new("세공 옵션", "밸런스 10 레벨").with_sub_type("3"),
        ]));
        assert_eq!(item.sewing_rank, Some(2));
        assert_eq!(item.sewing_option_1.as_deref(), Some("최대 공격력 15 레벨"));
        assert_eq!(item.sewing_option_2, None);
        assert_eq!(item.sewing_option_3.as_deref(), Some("밸런스 10 레벨"));
    }

    #[test]
    fn set_effects_accumulate() {
        let item = parse_auction_item(raw_with(vec![
            ItemOption::new("세트 효과", "크리티컬 대미지 증가").with_value2("4"),
            ItemOption::new("세트 효과", "스매시 대미지 증가"),
        ]));
        assert_eq!(item.set_effects.len(), 2);
        assert_eq!(item.set_effects[0].value, 4);
        assert_eq!(item.set_effects[1].value, 0);
    }

    #[test]
    fn piercing_strips_plus() {
        let item = parse_auction_item(raw_with(vec![
            ItemOption::new("피어싱 레벨", "4").with_value2("+3"),
        ]));
        assert_eq!(item.piercing_level, Some(4));
        assert_eq!(item.piercing_increase, Some(3));
    }

    #[test]
    fn colors_by_part() {
        let item = parse_auction_item(raw_with(vec![
            ItemOption::new("아이템 색상", "255, 0, 128").with_sub_type("파트 A"),
            ItemOption::new("아이템 색상", "1,2").with_sub_type("파트 B"),
            ItemOption::new("아이템 색상", "1,2,3"),
            ItemOption::new("아이템 색상", "9,9,9").with_sub_type("파트 F"),
        ]));
        assert_eq!(item.color(ColorPart::A), Some(Rgb::new(255, 0, 128)));
        assert_eq!(item.color(ColorPart::B), None);
        assert_eq!(item.color(ColorPart::F), Some(Rgb::new(9, 9, 9)));
        assert_eq!(item.colors.len(), 2);
    }

    #[test]
    fn unparseable_numbers_leave_stat_unset() {
        let item = parse_auction_item(raw_with(vec![
            ItemOption::new("방어력", "많음"),
            ItemOption::new("에르그", ""),
        ]));
        assert_eq!(item.defense, None);
        assert_eq!(item.erg_level, None);
    }

    #[test]
    fn unknown_options_are_kept_for_display() {
        let item = parse_auction_item(raw_with(vec![
            ItemOption::new("데미지", "10"),
            ItemOption::new("아이템 보호", "인챈트 실패 시"),
        ]));
        assert_eq!(item.item_option.len(), 2);
        assert_eq!(item.attack_min, None);
        assert!(item.set_effects.is_empty());
    }

    #[test]
    fn later_option_overwrites_earlier() {
        let item = parse_auction_item(raw_with(vec![
            ItemOption::new("에르그", "20"),
            ItemOption::new("에르그", "50").with_value2("50"),
        ]));
        assert_eq!(item.erg_level, Some(50));
    }

    #[test]
    fn listing_fields_are_carried_over() {
        let item = parse_auction_item(raw_with(vec![]));
        assert_eq!(item.auction_price_per_unit, 1_500_000);
        assert_eq!(item.item_display_name, "신속한 롱 소드");
        assert!(item.set_effects.is_empty());
    }
}
