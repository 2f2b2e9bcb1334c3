//! # mabi - Mabinogi Market Tools
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   apps/mabi (THE BINARY)                 │
//! │                                                          │
//! │   ┌─────────────┐    ┌─────────────┐                     │
//! │   │    CLI      │    │  HTTP API   │                     │
//! │   │   (clap)    │    │   (axum)    │                     │
//! │   └──────┬──────┘    └──────┬──────┘                     │
//! │          └────────┬─────────┘                            │
//! │                   ▼                                      │
//! │           ┌───────────────┐      ┌──────────────────┐    │
//! │           │ SearchService │─────▶│   NexonClient    │    │
//! │           └───────┬───────┘      │    (reqwest)     │    │
//! │                   ▼              └──────────────────┘    │
//! │           ┌───────────────┐                              │
//! │           │   mabi-core   │                              │
//! │           │  (THE LOGIC)  │                              │
//! │           └───────────────┘                              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! NEXON_API_KEY=... mabi server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! mabi search -k "롱 소드" --min-erg 25 --sort desc
//! mabi pocket --npc 델 --server 류트 --channel 3 --part A=#ff0000 -t 5
//! mabi filter -i listing.json -c 검 --max-attack 30
//! ```

use clap::Parser;
use mabi::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // MABI_LOG_FORMAT=json enables machine-parseable output. Logs go to stderr
    // so --json-mode output stays clean.
    let log_format = std::env::var("MABI_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if cli.verbose {
        "mabi=debug,tower_http=debug"
    } else {
        "mabi=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  ███╗   ███╗ █████╗ ██████╗ ██╗
  ████╗ ████║██╔══██╗██╔══██╗██║
  ██╔████╔██║███████║██████╔╝██║
  ██║╚██╔╝██║██╔══██║██╔══██╗██║
  ██║ ╚═╝ ██║██║  ██║██████╔╝██║
  ╚═╝     ╚═╝╚═╝  ╚═╝╚═════╝ ╚═╝

  Mabinogi Market Tools v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
