//! Configuration loading for huginnd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag, must exist)
//! 2. `~/.huginn/config.toml` (user)
//! 3. `/etc/huginn/config.toml` (system)
//!
//! With no file in either standard location the built-in defaults are used.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::source::{DEFAULT_API_BASE_URL, DEFAULT_ITEM_PAGE_PREFIX, HackerNewsConfig, RetryConfig};
use crate::{Huginn, HuginnBuilder, HuginnError, Result};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub retry: RetrySection,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8080).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8080".to_string()
}

/// What to fetch and how often.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    /// Stories to materialise (default: 30).
    #[serde(default = "default_wanted")]
    pub wanted: usize,
    /// Freshness window in seconds; 0 disables the periodic refresh (default: 900).
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// API root (default: the public Firebase API).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Link prefix for stories without an external url.
    #[serde(default = "default_item_page_prefix")]
    pub item_page_prefix: String,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            wanted: default_wanted(),
            refresh_interval_secs: default_refresh_interval(),
            base_url: default_base_url(),
            item_page_prefix: default_item_page_prefix(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_wanted() -> usize {
    30
}

fn default_refresh_interval() -> u64 {
    15 * 60
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_item_page_prefix() -> String {
    DEFAULT_ITEM_PAGE_PREFIX.to_string()
}

fn default_request_timeout() -> u64 {
    10
}

/// Retry policy for API requests and failed reloads.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySection {
    /// Attempts per request, including the first (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry in milliseconds (default: 500).
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    /// Upper bound on any single delay in seconds (default: 30).
    #[serde(default = "default_max_delay")]
    pub max_delay_secs: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay(),
            max_delay_secs: default_max_delay(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> u64 {
    500
}

fn default_max_delay() -> u64 {
    30
}

impl From<&RetrySection> for RetryConfig {
    fn from(section: &RetrySection) -> Self {
        RetryConfig::new()
            .max_attempts(section.max_attempts)
            .initial_delay(Duration::from_millis(section.initial_delay_ms))
            .max_delay(Duration::from_secs(section.max_delay_secs))
    }
}

impl Config {
    /// Load configuration from the standard locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit_path)? else {
            info!("no config file found, using defaults");
            return Ok(Self::default());
        };
        info!(path = %path.display(), "loading config");
        let content = fs::read_to_string(&path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            HuginnError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path; `None` when no standard file exists.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(HuginnError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".huginn").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/huginn/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// A cache builder carrying every setting from this config.
    pub fn cache_builder(&self) -> HuginnBuilder {
        let news = &self.news;
        let retry = RetryConfig::from(&self.retry);
        let hacker_news = HackerNewsConfig::with_base_url(&news.base_url)
            .item_page_prefix(&news.item_page_prefix)
            .timeout(Duration::from_secs(news.request_timeout_secs));

        let builder = Huginn::builder()
            .hacker_news(hacker_news)
            .wanted(news.wanted)
            .request_retry(retry.clone())
            .reload_retry(retry);

        match news.refresh_interval_secs {
            0 => builder.no_refresh(),
            secs => builder.refresh_interval(Duration::from_secs(secs)),
        }
    }
}
