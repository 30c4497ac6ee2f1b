//! Retry configuration, delay calculation, and the retrying source decorator.
//!
//! Provides [`RetryConfig`] for controlling retry behaviour and
//! [`RetryingSource`], which wraps a [`NewsSource`] with automatic retry on
//! transient errors. The same config drives the cache's backoff between
//! failed reloads.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::traits::NewsSource;
use crate::telemetry;
use crate::types::{RankedIds, Story, StoryId};
use crate::{HuginnError, Result};

/// Configuration for retry behaviour on transient errors.
///
/// Uses exponential backoff:
///
/// ```rust
/// # use huginn::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(200));
/// assert_eq!(config.delay_for_attempt(2), Duration::from_millis(800));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Base delay before the first retry. Default: 500ms.
    pub initial_delay: Duration,
    /// Maximum delay between retries (caps exponential growth). Default: 30s.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial request).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the base delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Calculate the delay for a given attempt number (0-indexed).
    ///
    /// Uses exponential backoff: `initial_delay * 2^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_delay)
    }

    /// Calculate the effective delay, respecting server `retry_after` hints.
    pub fn effective_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| self.delay_for_attempt(attempt))
    }
}

/// Execute an async operation with retry logic.
///
/// Retries on transient errors (as classified by [`HuginnError::is_transient()`])
/// up to `config.max_attempts`, using exponential backoff and respecting
/// `retry_after` hints from `RateLimited` errors.
///
/// Permanent errors are returned immediately without retry.
pub(crate) async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    source_name: &str,
    operation: &str,
    f: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..config.max_attempts.max(1) {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() => {
                if attempt + 1 < config.max_attempts {
                    metrics::counter!(telemetry::RETRIES_TOTAL,
                        "source" => source_name.to_owned(),
                        "operation" => operation.to_owned(),
                    )
                    .increment(1);
                    let delay = config.effective_delay(attempt, e.retry_after());
                    warn!(
                        source = source_name,
                        operation,
                        attempt = attempt + 1,
                        max_attempts = config.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
            Err(e) => return Err(e), // permanent error, no retry
        }
    }
    Err(last_err.unwrap_or_else(|| HuginnError::Transport("no attempts made".to_string())))
}

/// Decorator that wraps a [`NewsSource`] with retry logic.
///
/// On transient errors retries with exponential backoff up to
/// `config.max_attempts`. Permanent errors are returned immediately.
pub struct RetryingSource {
    inner: Arc<dyn NewsSource>,
    config: RetryConfig,
}

impl RetryingSource {
    /// Wrap a source with retry logic.
    pub fn new(inner: Arc<dyn NewsSource>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl NewsSource for RetryingSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn top_story_ids(&self) -> Result<RankedIds> {
        with_retry(&self.config, self.inner.name(), "top_story_ids", || {
            self.inner.top_story_ids()
        })
        .await
    }

    async fn story(&self, id: StoryId) -> Result<Story> {
        with_retry(&self.config, self.inner.name(), "story", || {
            self.inner.story(id)
        })
        .await
    }
}
