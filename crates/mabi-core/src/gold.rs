//! # Gold Formatting
//!
//! Compact Korean rendering of gold amounts using the 억 (10^8), 만 (10^4)
//! and 천 (10^3) units. Only the two most significant units are shown and
//! lower digits are truncated, never rounded.

const EOK: u64 = 100_000_000;
const MAN: u64 = 10_000;
const CHEON: u64 = 1_000;

/// Format a gold amount.
///
/// | value          | output     |
/// |----------------|------------|
/// | 150_000_000    | `1억 5000만` |
/// | 100_005_000    | `1억`       |
/// | 12_345         | `1만 2천`    |
/// | 10_500         | `1만`       |
/// | 5_999          | `5천`       |
/// | 999            | `999`      |
#[must_use]
pub fn gold_format(value: u64) -> String {
    if value >= EOK {
        let eok = value / EOK;
        let man = (value % EOK) / MAN;
        if man > 0 {
            format!("{eok}억 {man}만")
        } else {
            format!("{eok}억")
        }
    } else if value >= MAN {
        let man = value / MAN;
        let cheon = (value % MAN) / CHEON;
        if cheon > 0 {
            format!("{man}만 {cheon}천")
        } else {
            format!("{man}만")
        }
    } else if value >= CHEON {
        format!("{}천", value / CHEON)
    } else {
        value.to_string()
    }
}

/// Format with `,` thousands separators, e.g. `1,234,567`.
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eok_with_and_without_man() {
        assert_eq!(gold_format(100_000_000), "1억");
        assert_eq!(gold_format(150_000_000), "1억 5000만");
        assert_eq!(gold_format(100_009_999), "1억");
        assert_eq!(gold_format(1_234_567_890), "12억 3456만");
    }

    #[test]
    fn man_with_and_without_cheon() {
        assert_eq!(gold_format(10_000), "1만");
        assert_eq!(gold_format(10_999), "1만");
        assert_eq!(gold_format(12_345), "1만 2천");
        assert_eq!(gold_format(99_999_999), "9999만 9천");
    }

    #[test]
    fn cheon_and_below() {
        assert_eq!(gold_format(1_000), "1천");
        assert_eq!(gold_format(9_999), "9천");
        assert_eq!(gold_format(999), "999");
        assert_eq!(gold_format(0), "0");
    }

    #[test]
    fn grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
