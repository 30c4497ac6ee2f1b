//! Hacker News Firebase API client.
//!
//! See: <https://github.com/HackerNews/API>
//!
//! Two endpoints are used:
//! - `GET {base}/topstories.json` → JSON array of item ids, ranked
//! - `GET {base}/item/{id}.json` → JSON object for one item (or `null`)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::trace;

use super::traits::NewsSource;
use crate::types::{RankedIds, Story, StoryId};
use crate::{HuginnError, Result};

/// Default base URL for the Hacker News API.
pub const DEFAULT_API_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

/// Item page on the Hacker News site; the decimal id is appended.
pub const DEFAULT_ITEM_PAGE_PREFIX: &str = "https://news.ycombinator.com/item?id=";

const USER_AGENT: &str = concat!("huginn/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`HackerNewsClient`].
///
/// ```rust
/// # use huginn::HackerNewsConfig;
/// let config = HackerNewsConfig::default();
/// assert!(config.base_url.contains("firebaseio.com"));
/// ```
#[derive(Debug, Clone)]
pub struct HackerNewsConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Prefix used to build a link for stories without an external url.
    pub item_page_prefix: String,
    /// Per-request timeout. Default: 10s.
    pub timeout: Duration,
}

impl Default for HackerNewsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            item_page_prefix: DEFAULT_ITEM_PAGE_PREFIX.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl HackerNewsConfig {
    /// Create a config with a custom API root (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the item page prefix.
    pub fn item_page_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.item_page_prefix = prefix.into();
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the Hacker News API.
#[derive(Clone)]
pub struct HackerNewsClient {
    http: Client,
    base_url: String,
    item_page_prefix: String,
}

impl HackerNewsClient {
    /// Create a client for the public API with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(HackerNewsConfig::default())
    }

    /// Create a client from explicit settings.
    pub fn with_config(config: HackerNewsConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| HuginnError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            item_page_prefix: config.item_page_prefix,
        })
    }

    /// URL of the ranked top-stories list.
    pub fn top_stories_url(&self) -> String {
        format!("{}/topstories.json", self.base_url)
    }

    /// URL of a single item record.
    pub fn item_url(&self, id: StoryId) -> String {
        format!("{}/item/{id}.json", self.base_url)
    }

    /// GET `url` and decode the JSON body into `T`.
    ///
    /// Connection failures map to [`HuginnError::Transport`], non-2xx
    /// statuses to [`HuginnError::Api`] (or `RateLimited` for 429), and
    /// undecodable bodies to [`HuginnError::Decode`].
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| HuginnError::Transport(format!("GET {url}: {e}")))?;

        Self::handle_response_errors(&response, url)?;

        let body = response
            .bytes()
            .await
            .map_err(|e| HuginnError::Transport(format!("reading body of {url}: {e}")))?;

        serde_json::from_slice(&body).map_err(|e| HuginnError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn handle_response_errors(response: &reqwest::Response, url: &str) -> Result<()> {
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(HuginnError::RateLimited { retry_after })
            }
            code => Err(HuginnError::Api {
                status: code,
                url: url.to_string(),
            }),
        }
    }
}

#[async_trait]
impl NewsSource for HackerNewsClient {
    fn name(&self) -> &str {
        "hacker-news"
    }

    async fn top_story_ids(&self) -> Result<RankedIds> {
        self.get_json(&self.top_stories_url()).await
    }

    async fn story(&self, id: StoryId) -> Result<Story> {
        let url = self.item_url(id);
        trace!(%id, "fetching story");

        // The API answers `null` for ids it has never issued.
        let story: Option<Story> = self.get_json(&url).await?;
        let mut story = story.ok_or_else(|| HuginnError::Decode {
            url: url.clone(),
            message: format!("item {id} does not exist"),
        })?;

        // A missing `id` decodes as 0 and takes the requested one.
        if story.id == StoryId::default() {
            story.id = id;
        } else if story.id != id {
            return Err(HuginnError::DataIntegrity(format!(
                "{url} returned item {} instead of {id}",
                story.id
            )));
        }

        Ok(story.with_fallback_url(&self.item_page_prefix))
    }
}
