//! # mabi CLI Module
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `search` - Search the auction house
//! - `filter` - Filter a saved listing offline
//! - `pocket` - Search NPC pockets by colour
//! - `horn` - Show horn bugle history
//! - `categories` - Show the category tree
//! - `gold` - Format a gold amount

mod commands;

use crate::config::Config;
use crate::service::ServiceError;
use clap::{Args, Parser, Subcommand};
use mabi_core::SortOrder;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// mabi - Mabinogi auction house and pocket colour search
#[derive(Parser, Debug)]
#[command(name = "mabi")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Detail filter flags shared by `search` and `filter`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// JSON file with full filter criteria
    #[arg(short = 'f', long = "criteria")]
    pub criteria_file: Option<PathBuf>,

    /// Minimum attack
    #[arg(long)]
    pub min_attack: Option<i64>,

    /// Maximum attack
    #[arg(long)]
    pub max_attack: Option<i64>,

    /// Minimum defense
    #[arg(long)]
    pub min_defense: Option<i64>,

    /// Minimum erg level
    #[arg(long)]
    pub min_erg: Option<i64>,

    /// Minimum sewing rank
    #[arg(long)]
    pub sewing_rank: Option<i64>,

    /// Enchant prefix substring
    #[arg(long)]
    pub prefix: Option<String>,

    /// Enchant suffix substring
    #[arg(long)]
    pub suffix: Option<String>,

    /// Sort by price (asc, desc)
    #[arg(short, long, default_value = "asc")]
    pub sort: SortOrder,

    /// Page to show
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Listings per page (default from config)
    #[arg(long)]
    pub page_size: Option<usize>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Search the auction house
    Search {
        /// Keyword (matched locally when a category is given)
        #[arg(short, long)]
        keyword: Option<String>,

        /// Category label, e.g. "검"
        #[arg(short, long)]
        category: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Filter a saved listing file offline
    Filter {
        /// Upstream listing JSON (page object or item array)
        #[arg(short, long)]
        input: PathBuf,

        /// Category label used to narrow the criteria
        #[arg(short, long)]
        category: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Search NPC pockets by colour
    Pocket {
        /// NPC name
        #[arg(short, long)]
        npc: String,

        /// Server name (류트, 만돌린, 하프, 울프)
        #[arg(short, long)]
        server: String,

        /// Channel number
        #[arg(short, long, default_value = "1")]
        channel: u32,

        /// Part colour, e.g. A=#ff0000 or B=10,20,30 (repeatable)
        #[arg(long = "part")]
        parts: Vec<String>,

        /// Per-channel tolerance (default from config)
        #[arg(short, long)]
        tolerance: Option<u8>,
    },

    /// Show horn bugle history
    Horn {
        /// Server name
        #[arg(short, long)]
        server: String,
    },

    /// Show the category tree
    Categories,

    /// Format a gold amount
    Gold {
        /// Amount in gold
        value: u64,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), ServiceError> {
    let config = Config::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(&config, &host, port).await,
        Some(Commands::Search {
            keyword,
            category,
            filters,
        }) => cmd_search(&config, json_mode, keyword, category, &filters).await,
        Some(Commands::Filter {
            input,
            category,
            filters,
        }) => cmd_filter(&config, json_mode, &input, category.as_deref(), &filters),
        Some(Commands::Pocket {
            npc,
            server,
            channel,
            parts,
            tolerance,
        }) => cmd_pocket(&config, json_mode, npc, server, channel, &parts, tolerance).await,
        Some(Commands::Horn { server }) => cmd_horn(&config, json_mode, &server).await,
        Some(Commands::Categories) => cmd_categories(&config, json_mode),
        Some(Commands::Gold { value }) => cmd_gold(json_mode, value),
        None => cmd_categories(&config, json_mode),
    }
}
