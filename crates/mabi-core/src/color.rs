//! # Colour Matching
//!
//! RGB parsing in the three notations seen across the game data and the
//! search forms, plus the per-channel tolerance matcher used by pocket
//! searches and colour filters.
//!
//! A match is per channel: `|target - actual| <= tolerance` must hold for
//! every channel the caller constrains. Unconstrained channels are
//! wildcards.

use crate::types::{MabiError, Rgb};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// PARSING & FORMATTING
// =============================================================================

impl Rgb {
    /// Parse `"r,g,b"`. Extra components after the third are ignored.
    pub fn parse_csv(value: &str) -> Result<Self, MabiError> {
        let mut parts = value.split(',');
        let mut channel = || -> Result<u8, MabiError> {
            parts
                .next()
                .and_then(|p| p.trim().parse().ok())
                .ok_or_else(|| MabiError::InvalidColor(value.to_string()))
        };
        let r = channel()?;
        let g = channel()?;
        let b = channel()?;
        Ok(Self::new(r, g, b))
    }

    /// Parse `"R:r G:g B:b"` (case-insensitive, spacing free).
    pub fn parse_labeled(value: &str) -> Result<Self, MabiError> {
        let invalid = || MabiError::InvalidColor(value.to_string());
        let upper = value.to_ascii_uppercase();
        let mut channels = [0u8; 3];

        let mut rest = upper.as_str();
        for (slot, label) in channels.iter_mut().zip(['R', 'G', 'B']) {
            let start = rest.find(label).ok_or_else(invalid)?;
            let after = rest[start + 1..].trim_start();
            let after = after.strip_prefix(':').ok_or_else(invalid)?.trim_start();
            let digits_end = after
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after.len());
            *slot = after[..digits_end].parse().map_err(|_| invalid())?;
            rest = &after[digits_end..];
        }

        Ok(Self::new(channels[0], channels[1], channels[2]))
    }

    /// Parse a display value in either the labelled or the CSV notation.
    ///
    /// Used to decide whether an option value should be rendered with a
    /// colour swatch.
    pub fn parse_display(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.to_ascii_uppercase().starts_with('R') {
            return Self::parse_labeled(trimmed).ok();
        }
        let parts: Vec<&str> = trimmed.split(',').collect();
        if parts.len() != 3 {
            return None;
        }
        Self::parse_csv(trimmed).ok()
    }

    /// Parse `"#rrggbb"` (the `#` is optional, case-insensitive).
    pub fn from_hex(value: &str) -> Result<Self, MabiError> {
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(MabiError::InvalidColor(value.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| MabiError::InvalidColor(value.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Format as lowercase `"#rrggbb"`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Format as the upstream `"r,g,b"` notation.
    #[must_use]
    pub fn to_csv(self) -> String {
        format!("{},{},{}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = MabiError;

    /// Accepts `#rrggbb`, `r,g,b` or `R:r G:g B:b`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with('#') {
            Self::from_hex(trimmed)
        } else if trimmed.contains(',') {
            Self::parse_csv(trimmed)
        } else if trimmed.to_ascii_uppercase().starts_with('R') {
            Self::parse_labeled(trimmed)
        } else {
            Self::from_hex(trimmed)
        }
    }
}

// =============================================================================
// TARGET & MATCHER
// =============================================================================

/// A colour to search for. Unset channels match anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorTarget {
    pub r: Option<u8>,
    pub g: Option<u8>,
    pub b: Option<u8>,
}

impl ColorTarget {
    /// Target with every channel set.
    #[must_use]
    pub const fn exact(rgb: Rgb) -> Self {
        Self {
            r: Some(rgb.r),
            g: Some(rgb.g),
            b: Some(rgb.b),
        }
    }

    /// True when no channel is constrained.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.r.is_none() && self.g.is_none() && self.b.is_none()
    }

    /// Whether `actual` lies within `tolerance` on every set channel.
    #[must_use]
    pub fn matches_rgb(&self, actual: Rgb, tolerance: u8) -> bool {
        [self.r, self.g, self.b]
            .into_iter()
            .zip(actual.channels())
            .all(|(target, value)| target.is_none_or(|t| within_tolerance(t, value, tolerance)))
    }
}

impl From<Rgb> for ColorTarget {
    fn from(rgb: Rgb) -> Self {
        Self::exact(rgb)
    }
}

/// `|a - b| <= tolerance`.
#[must_use]
pub const fn within_tolerance(a: u8, b: u8, tolerance: u8) -> bool {
    a.abs_diff(b) <= tolerance
}

/// Match a target against an upstream `"r,g,b"` value.
///
/// An empty value, or one with a missing or non-integer channel, never
/// matches. Channel values are read as integers so `"300"` is accepted and
/// simply lies far outside any tolerance.
#[must_use]
pub fn matches_color(target: &ColorTarget, actual: &str, tolerance: u8) -> bool {
    if actual.trim().is_empty() {
        return false;
    }

    let mut values = actual.split(',').map(|v| v.trim().parse::<i64>().ok());
    let (Some(Some(r)), Some(Some(g)), Some(Some(b))) = (values.next(), values.next(), values.next())
    else {
        return false;
    };

    [target.r, target.g, target.b]
        .into_iter()
        .zip([r, g, b])
        .all(|(t, value)| t.is_none_or(|t| i64::from(t).abs_diff(value) <= u64::from(tolerance)))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_parse() {
        assert_eq!(Rgb::parse_csv("10, 20,30").ok(), Some(Rgb::new(10, 20, 30)));
        assert!(Rgb::parse_csv("10,20").is_err());
        assert!(Rgb::parse_csv("10,20,256").is_err());
    }

    #[test]
    fn labeled_parse() {
        assert_eq!(
            Rgb::parse_labeled("R:255 G:0 B:17").ok(),
            Some(Rgb::new(255, 0, 17))
        );
        assert_eq!(
            Rgb::parse_labeled("r : 1  g: 2 b :3").ok(),
            Some(Rgb::new(1, 2, 3))
        );
        assert!(Rgb::parse_labeled("R:1 G:2").is_err());
    }

    #[test]
    fn display_parse_requires_exact_shape() {
        assert_eq!(Rgb::parse_display("1,2,3"), Some(Rgb::new(1, 2, 3)));
        assert_eq!(Rgb::parse_display("R:1 G:2 B:3"), Some(Rgb::new(1, 2, 3)));
        assert_eq!(Rgb::parse_display("1,2,3,4"), None);
        assert_eq!(Rgb::parse_display("최대 공격력 15"), None);
    }

    #[test]
    fn hex_round_trip() {
        let rgb = Rgb::from_hex("#FF8000").expect("hex");
        assert_eq!(rgb, Rgb::new(255, 128, 0));
        assert_eq!(rgb.to_hex(), "#ff8000");
        assert_eq!(Rgb::from_hex("00ff00").ok(), Some(Rgb::new(0, 255, 0)));
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
    }

    #[test]
    fn from_str_dispatches_on_notation() {
        assert_eq!("#010203".parse::<Rgb>().ok(), Some(Rgb::new(1, 2, 3)));
        assert_eq!("1,2,3".parse::<Rgb>().ok(), Some(Rgb::new(1, 2, 3)));
        assert_eq!("R:1 G:2 B:3".parse::<Rgb>().ok(), Some(Rgb::new(1, 2, 3)));
    }

    #[test]
    fn matches_within_tolerance() {
        let target = ColorTarget::exact(Rgb::new(100, 100, 100));
        assert!(matches_color(&target, "105,95,100", 5));
        assert!(!matches_color(&target, "106,100,100", 5));
        assert!(matches_color(&target, "100,100,100", 0));
    }

    #[test]
    fn unset_channels_are_wildcards() {
        let target = ColorTarget {
            r: Some(0),
            g: None,
            b: None,
        };
        assert!(matches_color(&target, "0,255,255", 0));
        assert!(matches_color(&ColorTarget::default(), "1,2,3", 0));
    }

    #[test]
    fn bad_actual_never_matches() {
        let any = ColorTarget::default();
        assert!(!matches_color(&any, "", 255));
        assert!(!matches_color(&any, "1,2", 255));
        assert!(!matches_color(&any, "1,x,3", 255));
    }

    #[test]
    fn matches_rgb_agrees_with_string_form() {
        let target = ColorTarget::exact(Rgb::new(10, 20, 30));
        let actual = Rgb::new(12, 18, 30);
        assert_eq!(
            target.matches_rgb(actual, 2),
            matches_color(&target, &actual.to_csv(), 2)
        );
    }
}
