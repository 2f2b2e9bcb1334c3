//! # Configuration
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. A TOML file: `--config <path>`, else `$MABI_CONFIG`, else `./mabi.toml`
//!    when present
//! 3. Environment: `NEXON_API_KEY`, `MABI_API_BASE_URL`
//!
//! Server hardening (`MABI_API_KEY`, `MABI_RATE_LIMIT`,
//! `MABI_CORS_ORIGINS`) is read by the API module at router build time.
//!
//! ```toml
//! [upstream]
//! base_url = "https://open.api.nexon.com/mabinogi/v1"
//! api_key = "live_..."
//! timeout_secs = 10
//!
//! [listing]
//! page_size = 7
//!
//! [pocket]
//! tolerance = 5
//! ```

use mabi_core::CategoryNode;
use mabi_core::MabiError;
use mabi_core::primitives::{
    COMPACT_PAGE_GROUP_SIZE, DEFAULT_COLOR_TOLERANCE, DEFAULT_PAGE_SIZE, PAGE_GROUP_SIZE,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default upstream base URL.
pub const DEFAULT_BASE_URL: &str = "https://open.api.nexon.com/mabinogi/v1";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "mabi.toml";

/// Default upstream request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// SETTINGS
// =============================================================================

/// Upstream API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Listing presentation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub page_size: usize,
    pub page_group_size: usize,
    pub compact_page_group_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_group_size: PAGE_GROUP_SIZE,
            compact_page_group_size: COMPACT_PAGE_GROUP_SIZE,
        }
    }
}

/// Pocket search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PocketConfig {
    pub tolerance: u8,
}

impl Default for PocketConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_COLOR_TOLERANCE,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub upstream: UpstreamConfig,
    pub listing: ListingConfig,
    pub pocket: PocketConfig,
    /// Replaces the built-in category tree when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryNode>>,
}

// =============================================================================
// LOADING
// =============================================================================

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, MabiError> {
        toml::from_str(source)
            .map_err(|e| MabiError::SerializationError(format!("Invalid config: {}", e)))
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, MabiError> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            MabiError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&source)
    }

    /// Overlay environment values looked up through `lookup`.
    ///
    /// Empty values are ignored.
    #[must_use]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("NEXON_API_KEY") {
            self.upstream.api_key = Some(key);
        }
        if let Some(url) = get("MABI_API_BASE_URL") {
            self.upstream.base_url = url;
        }
        self
    }

    /// Load the layered configuration.
    ///
    /// An explicit path (argument or `MABI_CONFIG`) must exist; the default
    /// `mabi.toml` is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, MabiError> {
        let env_path = std::env::var("MABI_CONFIG")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let base = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    tracing::debug!("Loading config from {}", DEFAULT_CONFIG_FILE);
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };

        Ok(base.with_env(|name| std::env::var(name).ok()))
    }

    /// The category tree in effect.
    #[must_use]
    pub fn category_tree(&self) -> Vec<CategoryNode> {
        self.categories
            .clone()
            .unwrap_or_else(mabi_core::default_categories)
    }

    /// Upstream timeout as a duration.
    #[must_use]
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.upstream.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = Config::from_toml_str("").expect("config");
        assert_eq!(config, Config::default());
        assert_eq!(config.upstream.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.listing.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn env_overrides_file() {
        let config = Config::from_toml_str("[upstream]\napi_key = \"file-key\"\n")
            .expect("config")
            .with_env(|name| match name {
                "NEXON_API_KEY" => Some("env-key".to_string()),
                "MABI_API_BASE_URL" => Some("  ".to_string()),
                _ => None,
            });
        assert_eq!(config.upstream.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.upstream.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn invalid_toml_is_reported() {
        assert!(matches!(
            Config::from_toml_str("[listing]\npage_size = \"seven\""),
            Err(MabiError::SerializationError(_))
        ));
    }
}
