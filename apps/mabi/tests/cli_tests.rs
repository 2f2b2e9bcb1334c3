//! Tests for the offline CLI helpers and argument parsing.

#![allow(clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use mabi::cli::{
    Cli, Commands, FilterArgs, build_criteria, cmd_filter, cmd_gold, load_listing,
    parse_part_spec,
};
use mabi::config::Config;
use mabi_core::{ColorPart, SortOrder};
use serde_json::json;
use std::io::Write;

fn write_json(value: &serde_json::Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(value.to_string().as_bytes()).unwrap();
    file
}

fn listing() -> serde_json::Value {
    json!([
        {
            "auction_price_per_unit": 100,
            "item_name": "롱 소드",
            "item_display_name": "롱 소드",
            "item_count": 1,
            "item_option": [{ "option_type": "공격", "option_value": "10", "option_value2": "20" }]
        },
        {
            "auction_price_per_unit": 50,
            "item_name": "롱 소드",
            "item_display_name": "롱 소드",
            "item_count": 1,
            "item_option": [{ "option_type": "공격", "option_value": "15", "option_value2": "25" }]
        }
    ])
}

// =============================================================================
// ARGUMENT PARSING
// =============================================================================

#[test]
fn test_search_flags_parse() {
    let cli = Cli::try_parse_from([
        "mabi", "--json-mode", "search", "-k", "롱 소드", "--min-erg", "25", "--sort", "desc",
    ])
    .unwrap();
    assert!(cli.json_mode);

    match cli.command {
        Some(Commands::Search {
            keyword, filters, ..
        }) => {
            assert_eq!(keyword.as_deref(), Some("롱 소드"));
            assert_eq!(filters.min_erg, Some(25));
            assert_eq!(filters.sort, SortOrder::Desc);
            assert_eq!(filters.page, 1);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_bad_sort_rejected() {
    assert!(Cli::try_parse_from(["mabi", "search", "--sort", "cheap"]).is_err());
}

#[test]
fn test_pocket_parts_repeat() {
    let cli = Cli::try_parse_from([
        "mabi", "pocket", "--npc", "델", "--server", "류트", "--part", "A=#ff0000", "--part",
        "b=1,2,3",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Pocket { parts, channel, .. }) => {
            assert_eq!(parts.len(), 2);
            assert_eq!(channel, 1);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

// =============================================================================
// HELPERS
// =============================================================================

#[test]
fn test_part_spec_notations() {
    let (part, target) = parse_part_spec("A=#ff0000").unwrap();
    assert_eq!(part, ColorPart::A);
    assert_eq!((target.r, target.g, target.b), (Some(255), Some(0), Some(0)));

    let (part, target) = parse_part_spec("파트 C=R:1 G:2 B:3").unwrap();
    assert_eq!(part, ColorPart::C);
    assert_eq!(target.b, Some(3));

    assert!(parse_part_spec("A").is_err());
    assert!(parse_part_spec("G=#000000").is_err());
    assert!(parse_part_spec("A=red").is_err());
}

#[test]
fn test_listing_accepts_array_and_page() {
    let array = write_json(&listing());
    assert_eq!(load_listing(array.path()).unwrap().len(), 2);

    let page = write_json(&json!({ "auction_item": listing(), "next_cursor": null }));
    assert_eq!(load_listing(page.path()).unwrap().len(), 2);

    let broken = write_json(&json!({ "auction_item": 3 }));
    assert!(load_listing(broken.path()).is_err());
}

#[test]
fn test_flags_override_criteria_file() {
    let file = write_json(&json!({ "min_attack": 5, "max_attack": 40 }));
    let args = FilterArgs {
        criteria_file: Some(file.path().to_path_buf()),
        min_attack: Some(12),
        prefix: Some("신속한".to_string()),
        ..FilterArgs::default()
    };

    let criteria = build_criteria(&args).unwrap();
    assert_eq!(criteria.min_attack, Some(12));
    assert_eq!(criteria.max_attack, Some(40));
    assert_eq!(criteria.enchant_prefix.as_deref(), Some("신속한"));
}

#[test]
fn test_offline_filter_runs() {
    let file = write_json(&listing());
    let args = FilterArgs {
        min_attack: Some(12),
        page: 1,
        ..FilterArgs::default()
    };
    assert!(cmd_filter(&Config::default(), true, file.path(), Some("검"), &args).is_ok());
    assert!(cmd_filter(&Config::default(), true, file.path(), Some("우주선"), &args).is_err());
}

#[test]
fn test_gold_command() {
    assert!(cmd_gold(false, 150_000_000).is_ok());
}
