//! # CLI Command Implementations

use super::FilterArgs;
use crate::api;
use crate::config::Config;
use crate::service::{PocketRequest, SearchRequest, SearchResponse, SearchService, ServiceError};
use mabi_core::category::{find_by_label, leaves};
use mabi_core::color::ColorTarget;
use mabi_core::primitives::DEFAULT_KEYWORD;
use mabi_core::{
    AuctionItem, AuctionPage, CategoryNode, ColorPart, FilterCriteria, MabiError, RawAuctionItem,
    Rgb, apply_filters, gold_format, paginate, parse_auction_items, render_options, sort_by_price,
};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE INPUT
// =============================================================================

/// Maximum size of listing and criteria files (20 MB).
const MAX_INPUT_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// Canonicalize an input path and check it is a regular file within the
/// size limit.
fn validate_input_file(path: &Path) -> Result<PathBuf, MabiError> {
    let canonical = path.canonicalize().map_err(|e| {
        MabiError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(MabiError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    let metadata = std::fs::metadata(&canonical)
        .map_err(|e| MabiError::IoError(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > MAX_INPUT_FILE_SIZE {
        return Err(MabiError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_INPUT_FILE_SIZE
        )));
    }

    Ok(canonical)
}

fn read_input_file(path: &Path) -> Result<String, MabiError> {
    let canonical = validate_input_file(path)?;
    std::fs::read_to_string(&canonical)
        .map_err(|e| MabiError::IoError(format!("Failed to read '{}': {}", path.display(), e)))
}

/// Load upstream listings from either a page object or a bare array.
pub fn load_listing(path: &Path) -> Result<Vec<RawAuctionItem>, MabiError> {
    let content = read_input_file(path)?;
    let invalid = |e: serde_json::Error| {
        MabiError::SerializationError(format!("Invalid listing JSON: {}", e))
    };

    if content.trim_start().starts_with('{') {
        let page: AuctionPage = serde_json::from_str(&content).map_err(invalid)?;
        return Ok(page.auction_item);
    }
    serde_json::from_str(&content).map_err(invalid)
}

/// Build criteria from an optional JSON file overlaid with flag values.
pub fn build_criteria(args: &FilterArgs) -> Result<FilterCriteria, MabiError> {
    let mut criteria = match &args.criteria_file {
        Some(path) => serde_json::from_str(&read_input_file(path)?)
            .map_err(|e| MabiError::SerializationError(format!("Invalid criteria JSON: {}", e)))?,
        None => FilterCriteria::default(),
    };

    criteria.min_attack = args.min_attack.or(criteria.min_attack);
    criteria.max_attack = args.max_attack.or(criteria.max_attack);
    criteria.min_defense = args.min_defense.or(criteria.min_defense);
    criteria.min_erg = args.min_erg.or(criteria.min_erg);
    criteria.sewing_rank = args.sewing_rank.or(criteria.sewing_rank);
    if args.prefix.is_some() {
        criteria.enchant_prefix.clone_from(&args.prefix);
    }
    if args.suffix.is_some() {
        criteria.enchant_suffix.clone_from(&args.suffix);
    }
    Ok(criteria)
}

/// Parse `A=#ff0000`, `b=10,20,30` or `C=R:1 G:2 B:3`.
pub fn parse_part_spec(spec: &str) -> Result<(ColorPart, ColorTarget), MabiError> {
    let (part, color) = spec
        .split_once('=')
        .ok_or_else(|| MabiError::InvalidInput(format!("Expected PART=COLOR, got '{}'", spec)))?;
    let part: ColorPart = part.parse()?;
    let rgb: Rgb = color.parse()?;
    Ok((part, ColorTarget::exact(rgb)))
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_json<T: Serialize>(value: &T) -> Result<(), MabiError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| MabiError::SerializationError(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

fn print_item(index: usize, item: &AuctionItem) {
    println!(
        "{:>3}. {:<30} {:>14}  x{}",
        index,
        item.item_display_name,
        gold_format(item.auction_price_per_unit),
        item.item_count
    );
    if let Some(expire) = format_expiry(&item.date_auction_expire) {
        println!("       만료: {}", expire);
    }
    for line in render_options(&item.item_option) {
        match line.swatch {
            Some(rgb) => println!("       {}: {} {}", line.label, line.value, rgb.to_hex()),
            None => println!("       {}: {}", line.label, line.value),
        }
    }
}

/// Upstream expiry timestamp in local time, minute precision.
fn format_expiry(value: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
}

fn print_nodes(nodes: &[CategoryNode], depth: usize) {
    for node in nodes {
        match node {
            CategoryNode::Leaf(category) => {
                println!("{}{} ({})", "  ".repeat(depth), category.label, category.code);
            }
            CategoryNode::Group {
                group,
                subcategories,
            } => {
                println!("{}{}", "  ".repeat(depth), group);
                print_nodes(subcategories, depth + 1);
            }
        }
    }
}

fn print_results(response: &SearchResponse) {
    if let Some(message) = &response.message {
        println!("{}", message);
        return;
    }

    let offset = (response.page - 1) * response.page_size;
    for (i, item) in response.items.iter().enumerate() {
        print_item(offset + i + 1, item);
    }
    println!();
    println!(
        "Page {}/{} ({} items, sorted {})",
        response.page, response.total_pages, response.total_items, response.sort
    );
    if let Some(window) = response.window {
        let pages: Vec<String> = window
            .pages()
            .map(|p| if p == response.page { format!("[{p}]") } else { p.to_string() })
            .collect();
        let prev = if window.prev_group.is_some() { "< " } else { "" };
        let next = if window.next_group.is_some() { " >" } else { "" };
        println!("{}{}{}", prev, pages.join(" "), next);
    }
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: &Config, host: &str, port: u16) -> Result<(), ServiceError> {
    let service = SearchService::from_config(config)?;

    println!("mabi server starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", host);
    println!("  Port:       {}", port);
    println!("  Upstream:   {}", config.upstream.base_url);
    println!("  Categories: {}", service.category_count());
    println!();
    println!("Endpoints:");
    println!("  POST /auction/search  - Search with filters");
    println!("  GET  /auction/keyword - Keyword listing");
    println!("  GET  /auction/list    - Category listing");
    println!("  POST /npcshop/pocket  - Pocket colour search");
    println!("  GET  /horn-bugle      - Horn bugle history");
    println!("  GET  /categories      - Category tree");
    println!("  GET  /health          - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, service).await
}

// =============================================================================
// SEARCH COMMANDS
// =============================================================================

/// Search the auction house.
///
/// With neither keyword nor category, the default keyword is searched.
pub async fn cmd_search(
    config: &Config,
    json_mode: bool,
    keyword: Option<String>,
    category: Option<String>,
    filters: &FilterArgs,
) -> Result<(), ServiceError> {
    let service = SearchService::from_config(config)?;
    let keyword = match (&keyword, &category) {
        (None, None) => Some(DEFAULT_KEYWORD.to_string()),
        _ => keyword,
    };

    let request = SearchRequest {
        keyword,
        category,
        criteria: build_criteria(filters)?,
        sort: filters.sort,
        page: filters.page,
        page_size: filters.page_size,
        cursor: None,
        compact: false,
    };
    let response = service.search(request).await?;

    if json_mode {
        print_json(&response)?;
    } else {
        print_results(&response);
    }
    Ok(())
}

/// Filter a saved listing file without contacting the upstream.
pub fn cmd_filter(
    config: &Config,
    json_mode: bool,
    input: &Path,
    category: Option<&str>,
    filters: &FilterArgs,
) -> Result<(), ServiceError> {
    let tree = config.category_tree();
    let category = match category {
        Some(label) => Some(
            find_by_label(&tree, label)
                .cloned()
                .ok_or_else(|| MabiError::InvalidInput(format!("Unknown category: {}", label)))?,
        ),
        None => None,
    };

    let items = parse_auction_items(load_listing(input)?);
    let fetched = items.len();
    let criteria = build_criteria(filters)?.for_category(category.as_ref());
    let mut items = apply_filters(items, &criteria);
    sort_by_price(&mut items, filters.sort);

    let page = paginate(
        items,
        filters.page,
        filters.page_size.unwrap_or(config.listing.page_size),
    );
    let response = SearchResponse {
        window: mabi_core::PageWindow::new(page.page, page.total_pages, config.listing.page_group_size),
        message: page
            .items
            .is_empty()
            .then(|| crate::service::NO_MATCHES.to_string()),
        items: page.items,
        page: page.page,
        page_size: page.page_size,
        total_items: page.total_items,
        total_pages: page.total_pages,
        sort: filters.sort,
        next_cursor: None,
    };

    tracing::debug!(fetched, kept = response.total_items, "Offline filter completed");

    if json_mode {
        print_json(&response)?;
    } else {
        print_results(&response);
    }
    Ok(())
}

// =============================================================================
// POCKET & HORN COMMANDS
// =============================================================================

/// Search NPC pockets by colour.
pub async fn cmd_pocket(
    config: &Config,
    json_mode: bool,
    npc: String,
    server: String,
    channel: u32,
    parts: &[String],
    tolerance: Option<u8>,
) -> Result<(), ServiceError> {
    let parts: BTreeMap<ColorPart, ColorTarget> = parts
        .iter()
        .map(|spec| parse_part_spec(spec))
        .collect::<Result<_, _>>()?;

    let service = SearchService::from_config(config)?;
    let response = service
        .pocket(PocketRequest {
            npc,
            server,
            channel,
            parts,
            tolerance,
        })
        .await?;

    if json_mode {
        print_json(&response)?;
        return Ok(());
    }

    if let Some(left) = &response.refresh_in {
        println!("다음 상점 갱신까지 {}", left);
    }
    println!("{} / {} pockets match", response.items.len(), response.total_pockets);
    for item in &response.items {
        println!("- {} x{}", item.item_display_name, item.item_count);
        for part in ColorPart::ALL {
            if let Some(value) = mabi_core::shop::part_color(item, part) {
                let hex = Rgb::parse_csv(value).map(Rgb::to_hex).unwrap_or_default();
                println!("    {}: {} {}", part, value, hex);
            }
        }
    }
    Ok(())
}

/// Show horn bugle history.
pub async fn cmd_horn(config: &Config, json_mode: bool, server: &str) -> Result<(), ServiceError> {
    let service = SearchService::from_config(config)?;
    let messages = service.horn_bugle(server).await?;

    if json_mode {
        print_json(&messages)?;
        return Ok(());
    }

    if messages.is_empty() {
        println!("데이터가 없습니다.");
    }
    for message in &messages {
        println!("[{}] {}: {}", message.date_send, message.character_name, message.message);
    }
    Ok(())
}

// =============================================================================
// OFFLINE COMMANDS
// =============================================================================

/// Print the category tree.
pub fn cmd_categories(config: &Config, json_mode: bool) -> Result<(), ServiceError> {
    let tree = config.category_tree();

    if json_mode {
        print_json(&tree)?;
        return Ok(());
    }

    print_nodes(&tree, 0);
    println!();
    println!("{} categories", leaves(&tree).len());
    Ok(())
}

/// Print a gold amount in compact form.
pub fn cmd_gold(json_mode: bool, value: u64) -> Result<(), ServiceError> {
    let formatted = gold_format(value);
    if json_mode {
        print_json(&serde_json::json!({ "value": value, "formatted": formatted }))?;
    } else {
        println!("{}", formatted);
    }
    Ok(())
}
