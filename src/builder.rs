//! Builder for configuring cache instances

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheConfig, NewsCache};
use crate::source::{HackerNewsClient, HackerNewsConfig, NewsSource, RetryConfig, RetryingSource};
use crate::Result;

/// Main entry point for creating cache instances.
pub struct Huginn;

impl Huginn {
    /// Create a new builder for configuring the cache.
    pub fn builder() -> HuginnBuilder {
        HuginnBuilder::new()
    }
}

/// Builder for configuring cache instances.
///
/// ```rust,no_run
/// # use huginn::Huginn;
/// # use std::time::Duration;
/// # async fn run() -> huginn::Result<()> {
/// let cache = Huginn::builder()
///     .wanted(30)
///     .refresh_interval(Duration::from_secs(15 * 60))
///     .build()?;
///
/// cache.fetch().await?;
/// for story in cache.project().await? {
///     println!("{} ({})", story.title, story.display_url);
/// }
/// # Ok(())
/// # }
/// ```
pub struct HuginnBuilder {
    source: Option<Arc<dyn NewsSource>>,
    hacker_news: HackerNewsConfig,
    request_retry: RetryConfig,
    cache: CacheConfig,
}

impl HuginnBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            hacker_news: HackerNewsConfig::default(),
            request_retry: RetryConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    /// Use a custom source instead of the Hacker News API.
    ///
    /// The source is used as given; request retry is not applied.
    pub fn source(mut self, source: Arc<dyn NewsSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Configure the Hacker News client (base URL, item page prefix, timeout).
    pub fn hacker_news(mut self, config: HackerNewsConfig) -> Self {
        self.hacker_news = config;
        self
    }

    /// Number of top stories to materialise (default: 30).
    pub fn wanted(mut self, n: usize) -> Self {
        self.cache.wanted = n;
        self
    }

    /// Freshness window before the cache reloads itself (default: 15 minutes).
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.cache.refresh_interval = Some(interval);
        self
    }

    /// Load once and keep serving until explicitly invalidated.
    pub fn no_refresh(mut self) -> Self {
        self.cache.refresh_interval = None;
        self
    }

    /// Retry policy for individual API requests.
    ///
    /// Use [`RetryConfig::disabled()`] to fail on the first error.
    pub fn request_retry(mut self, config: RetryConfig) -> Self {
        self.request_retry = config;
        self
    }

    /// Backoff between failed scheduled reloads.
    pub fn reload_retry(mut self, config: RetryConfig) -> Self {
        self.cache.retry = config;
        self
    }

    /// Build the cache.
    pub fn build(self) -> Result<Arc<NewsCache>> {
        let source: Arc<dyn NewsSource> = match self.source {
            Some(source) => source,
            None => {
                let client: Arc<dyn NewsSource> =
                    Arc::new(HackerNewsClient::with_config(self.hacker_news)?);
                if self.request_retry.max_attempts > 1 {
                    Arc::new(RetryingSource::new(client, self.request_retry))
                } else {
                    client
                }
            }
        };

        NewsCache::new(source, self.cache)
    }
}

impl Default for HuginnBuilder {
    fn default() -> Self {
        Self::new()
    }
}
