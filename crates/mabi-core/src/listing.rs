//! # Listing
//!
//! Price sorting, fixed-size pages and the grouped page-button window.
//!
//! Pages are 1-based. Out-of-range requests are clamped rather than
//! rejected, so a caller always gets a renderable page.

use crate::primitives::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::types::AuctionItem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// SORTING
// =============================================================================

/// Price ordering of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// The opposite order, as toggled by the sort button.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = crate::MabiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(crate::MabiError::InvalidInput(format!(
                "unknown sort order '{other}'"
            ))),
        }
    }
}

/// Stable sort by unit price. Equal prices keep their upstream order.
pub fn sort_by_price(items: &mut [AuctionItem], order: SortOrder) {
    match order {
        SortOrder::Asc => items.sort_by_key(|i| i.auction_price_per_unit),
        SortOrder::Desc => items.sort_by(|a, b| b.auction_price_per_unit.cmp(&a.auction_price_per_unit)),
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Number of pages needed for `total_items`. Zero items need zero pages.
#[must_use]
pub const fn page_count(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Cut page `page` out of `items`.
///
/// `page_size` is clamped to `1..=MAX_PAGE_SIZE` (0 means the default) and
/// `page` to `1..=total_pages`. An empty listing yields page 1 of 0.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page_size = match page_size {
        0 => DEFAULT_PAGE_SIZE,
        n => n.min(MAX_PAGE_SIZE),
    };
    let total_items = items.len();
    let total_pages = page_count(total_items, page_size);
    let page = page.clamp(1, total_pages.max(1));

    let start = (page - 1) * page_size;
    let items = items.into_iter().skip(start).take(page_size).collect();

    Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    }
}

// =============================================================================
// PAGE WINDOW
// =============================================================================

/// The run of page buttons around the current page.
///
/// Buttons are shown in fixed groups: with a group of 8, pages 1-8 form the
/// first group, 9-16 the second, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
    /// Target of the "previous group" button, if shown.
    pub prev_group: Option<usize>,
    /// Target of the "next group" button, if shown.
    pub next_group: Option<usize>,
}

impl PageWindow {
    /// Window for `current` of `total_pages` with `group_size` buttons.
    ///
    /// Returns `None` when there are no pages.
    #[must_use]
    pub fn new(current: usize, total_pages: usize, group_size: usize) -> Option<Self> {
        if total_pages == 0 {
            return None;
        }
        let group = group_size.max(1);
        let current = current.clamp(1, total_pages);
        let start = (current - 1) / group * group + 1;
        let end = (start + group - 1).min(total_pages);

        Some(Self {
            start,
            end,
            prev_group: (start > 1).then(|| start - 1),
            next_group: (end < total_pages).then(|| end + 1),
        })
    }

    /// Page numbers in the window.
    pub fn pages(&self) -> impl Iterator<Item = usize> {
        self.start..=self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{COMPACT_PAGE_GROUP_SIZE, PAGE_GROUP_SIZE};

    fn priced(prices: &[u64]) -> Vec<AuctionItem> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| AuctionItem {
                item_name: format!("item-{i}"),
                auction_price_per_unit: p,
                ..AuctionItem::default()
            })
            .collect()
    }

    #[test]
    fn sort_is_stable_both_ways() {
        let mut items = priced(&[300, 100, 300, 200]);
        sort_by_price(&mut items, SortOrder::Asc);
        let names: Vec<_> = items.iter().map(|i| i.item_name.as_str()).collect();
        assert_eq!(names, ["item-1", "item-3", "item-0", "item-2"]);

        let mut items = priced(&[300, 100, 300, 200]);
        sort_by_price(&mut items, SortOrder::Desc);
        let names: Vec<_> = items.iter().map(|i| i.item_name.as_str()).collect();
        assert_eq!(names, ["item-0", "item-2", "item-3", "item-1"]);
    }

    #[test]
    fn sort_order_parses_and_toggles() {
        assert_eq!("DESC".parse::<SortOrder>().ok(), Some(SortOrder::Desc));
        assert!("cheap".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
    }

    #[test]
    fn paginate_default_size() {
        let page = paginate((1..=20).collect::<Vec<_>>(), 3, 0);
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items, vec![15, 16, 17, 18, 19, 20]);
    }

    #[test]
    fn paginate_clamps_page() {
        let page = paginate((1..=10).collect::<Vec<_>>(), 99, 4);
        assert_eq!(page.page, 3);
        assert_eq!(page.items, vec![9, 10]);

        let empty = paginate(Vec::<u8>::new(), 5, 7);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.items.is_empty());
    }

    #[test]
    fn paginate_clamps_size() {
        let page = paginate((0..1000).collect::<Vec<_>>(), 1, 5000);
        assert_eq!(page.page_size, MAX_PAGE_SIZE);
        assert_eq!(page.items.len(), MAX_PAGE_SIZE);
    }

    #[test]
    fn window_groups() {
        let w = PageWindow::new(1, 20, PAGE_GROUP_SIZE).expect("window");
        assert_eq!((w.start, w.end), (1, 8));
        assert_eq!(w.prev_group, None);
        assert_eq!(w.next_group, Some(9));

        let w = PageWindow::new(12, 20, PAGE_GROUP_SIZE).expect("window");
        assert_eq!((w.start, w.end), (9, 16));
        assert_eq!(w.prev_group, Some(8));

        let w = PageWindow::new(20, 20, PAGE_GROUP_SIZE).expect("window");
        assert_eq!((w.start, w.end), (17, 20));
        assert_eq!(w.next_group, None);
    }

    #[test]
    fn compact_window() {
        let w = PageWindow::new(7, 10, COMPACT_PAGE_GROUP_SIZE).expect("window");
        assert_eq!(w.pages().collect::<Vec<_>>(), vec![7, 8, 9, 10]);
        assert!(PageWindow::new(1, 0, 8).is_none());
    }
}
