//! # Option Display
//!
//! Turns an item's raw option list into the lines shown in the detail pane:
//! ordering, value formatting, highlight class and colour swatch.

use crate::types::{ItemOption, Rgb};
use serde::{Deserialize, Serialize};

/// Highlight class of an option line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    /// 세공 options (green).
    Sewing,
    /// 에르그 options (blue).
    Erg,
    Plain,
}

/// One rendered option line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionLine {
    /// `option_type`, followed by ` (sub_type)` when present.
    pub label: String,
    pub value: String,
    pub highlight: Highlight,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swatch: Option<Rgb>,
}

fn priority(option: &ItemOption) -> u8 {
    if option.option_type.contains("세공") {
        1
    } else if option.option_type.contains("에르그") {
        2
    } else {
        u8::MAX
    }
}

/// 세공 options first, then 에르그, then everything else.
///
/// The order within each class is preserved.
#[must_use]
pub fn reorder_options(options: &[ItemOption]) -> Vec<&ItemOption> {
    let mut ordered: Vec<&ItemOption> = options.iter().collect();
    ordered.sort_by_key(|o| priority(o));
    ordered
}

/// Human-readable value of an option.
///
/// The description wins when present. Otherwise `value2` is appended with a
/// joiner that depends on the option type.
#[must_use]
pub fn format_option_value(option: &ItemOption) -> String {
    if let Some(desc) = option.option_desc.as_deref().filter(|d| !d.is_empty()) {
        return desc.to_string();
    }

    let value = option.option_value.as_str();
    let Some(value2) = option.value2() else {
        return value.to_string();
    };

    let kind = option.option_type.as_str();
    let joiner = if ["에르그", "내구력", "일반 개조"].iter().any(|k| kind.contains(k)) {
        " / "
    } else if ["세트 효과", "피어싱 레벨"].iter().any(|k| kind.contains(k)) {
        " "
    } else {
        " ~ "
    };
    format!("{value}{joiner}{value2}")
}

/// Highlight class for an option type.
#[must_use]
pub fn option_highlight(option_type: &str) -> Highlight {
    if option_type.contains("세공") {
        Highlight::Sewing
    } else if option_type.contains("에르그") {
        Highlight::Erg
    } else {
        Highlight::Plain
    }
}

/// Render every option of an item in display order.
#[must_use]
pub fn render_options(options: &[ItemOption]) -> Vec<OptionLine> {
    reorder_options(options)
        .into_iter()
        .map(|option| {
            let value = format_option_value(option);
            let label = match option.sub_type() {
                Some(sub) => format!("{} ({sub})", option.option_type),
                None => option.option_type.clone(),
            };
            OptionLine {
                label,
                swatch: Rgb::parse_display(&value),
                highlight: option_highlight(&option.option_type),
                value,
            }
        })
        .collect()
}
