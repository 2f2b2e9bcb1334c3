//! # Auction Categories
//!
//! The category tree browsed in the side panel. Leaves carry the label sent
//! upstream as `auction_item_category`; groups only organise leaves.
//!
//! The built-in tree can be replaced from configuration, so lookups work on
//! any `&[CategoryNode]` rather than on the default alone.

use serde::{Deserialize, Serialize};

/// A selectable auction category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub code: u32,
    pub label: String,
}

impl Category {
    /// Create a new category.
    #[must_use]
    pub fn new(code: u32, label: impl Into<String>) -> Self {
        Self {
            code,
            label: label.into(),
        }
    }

    /// Whether the category lists armour (single-value defence filters).
    #[must_use]
    pub fn is_armor(&self) -> bool {
        is_armor_category(&self.label)
    }
}

/// A node of the category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryNode {
    Leaf(Category),
    Group {
        group: String,
        subcategories: Vec<CategoryNode>,
    },
}

impl CategoryNode {
    fn leaf(code: u32, label: &str) -> Self {
        Self::Leaf(Category::new(code, label))
    }

    fn group(name: &str, subcategories: Vec<Self>) -> Self {
        Self::Group {
            group: name.to_string(),
            subcategories,
        }
    }
}

/// Categories that list armour.
pub const ARMOR_CATEGORIES: [&str; 12] = [
    "천옷",
    "경갑옷",
    "중갑옷",
    "모자/가발",
    "방패",
    "신발",
    "장갑",
    "날개",
    "꼬리",
    "로브",
    "액세서리",
    "얼굴 장식",
];

/// Whether a category label is an armour category.
#[must_use]
pub fn is_armor_category(label: &str) -> bool {
    ARMOR_CATEGORIES.contains(&label)
}

/// The built-in category tree.
#[must_use]
pub fn default_categories() -> Vec<CategoryNode> {
    use CategoryNode as N;

    vec![
        N::group(
            "근거리 장비",
            vec![
                N::leaf(1, "한손 장비"),
                N::leaf(2, "양손 장비"),
                N::leaf(3, "검"),
                N::leaf(4, "도끼"),
                N::leaf(5, "둔기"),
                N::leaf(6, "랜스"),
                N::leaf(7, "핸들"),
                N::leaf(8, "너클"),
                N::leaf(9, "체인 블레이드"),
            ],
        ),
        N::group(
            "원거리 장비",
            vec![
                N::leaf(10, "활"),
                N::leaf(11, "석궁"),
                N::leaf(12, "듀얼건"),
                N::leaf(13, "수리검"),
                N::leaf(14, "아틀라틀"),
                N::leaf(15, "원거리 소모품"),
            ],
        ),
        N::group(
            "마법 장비",
            vec![
                N::leaf(16, "실린더"),
                N::leaf(17, "스태프"),
                N::leaf(18, "원드"),
                N::leaf(19, "마도서"),
                N::leaf(20, "오브"),
            ],
        ),
        N::group(
            "갑옷 장비",
            vec![
                N::leaf(21, "천옷"),
                N::leaf(22, "경갑옷"),
                N::leaf(23, "중갑옷"),
                N::leaf(24, "로브"),
            ],
        ),
        N::group(
            "방어 장비",
            vec![
                N::leaf(25, "모자/가발"),
                N::leaf(26, "장갑"),
                N::leaf(27, "신발"),
                N::leaf(28, "방패"),
            ],
        ),
        N::group(
            "액세서리",
            vec![
                N::leaf(29, "액세서리"),
                N::leaf(30, "얼굴 장식"),
                N::leaf(31, "날개"),
                N::leaf(32, "꼬리"),
            ],
        ),
        N::group(
            "인챈트 용품",
            vec![N::leaf(33, "인챈트 스크롤"), N::leaf(34, "마법가루")],
        ),
        N::leaf(35, "주머니"),
        N::leaf(36, "기타"),
    ]
}

/// All leaves in depth-first order.
#[must_use]
pub fn leaves(nodes: &[CategoryNode]) -> Vec<&Category> {
    let mut out = Vec::new();
    collect_leaves(nodes, &mut out);
    out
}

fn collect_leaves<'a>(nodes: &'a [CategoryNode], out: &mut Vec<&'a Category>) {
    for node in nodes {
        match node {
            CategoryNode::Leaf(category) => out.push(category),
            CategoryNode::Group { subcategories, .. } => collect_leaves(subcategories, out),
        }
    }
}

/// Find a leaf by code.
#[must_use]
pub fn find_by_code(nodes: &[CategoryNode], code: u32) -> Option<&Category> {
    leaves(nodes).into_iter().find(|c| c.code == code)
}

/// Find a leaf by its exact label.
#[must_use]
pub fn find_by_label<'a>(nodes: &'a [CategoryNode], label: &str) -> Option<&'a Category> {
    let label = label.trim();
    leaves(nodes).into_iter().find(|c| c.label == label)
}
