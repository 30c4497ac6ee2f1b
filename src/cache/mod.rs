//! Top-story cache.
//!
//! [`NewsCache`] holds the most recently loaded ranked id list and the
//! story table built from it. Both live behind a single async mutex:
//!
//! - [`NewsCache::fetch()`] holds the lock for the whole reload, so callers
//!   arriving mid-reload queue up and then find the cache fresh. One reload
//!   per freshness window, however many callers.
//! - [`NewsCache::project()`] takes the same lock and never sees a
//!   half-built table.
//!
//! # Refresh
//!
//! After a successful load a one-shot task is scheduled for
//! `refresh_interval` later. When it fires it marks the cache stale and
//! calls `fetch()` like any other caller. Scheduling a new refresh aborts
//! the previous one, so at most one timer is pending.
//!
//! # Failure
//!
//! A failed reload returns its error to the caller that triggered it and
//! leaves the previous ids and table in place, still readable through
//! `project()`. The cache stays stale and enters a backoff window
//! (exponential, from `CacheConfig::retry`): until it ends, `fetch()` hands
//! back the same error without touching the network, so callers queued
//! behind a failed reload return at once. When periodic refresh is on, a
//! retry is scheduled for the end of the window.

pub mod loader;
pub mod ordering;

pub use loader::load_stories;
pub use ordering::order_stories;

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::time::{Duration, SystemTime};

use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::source::{NewsSource, RetryConfig};
use crate::telemetry;
use crate::types::{CacheStatus, RankedIds, Story, StoryTable};
use crate::{HuginnError, Result};

/// Default number of stories materialised per load.
pub const DEFAULT_WANTED: usize = 30;

/// Default freshness window.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Configuration for a [`NewsCache`].
///
/// ```rust
/// # use huginn::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .wanted(10)
///     .refresh_interval(Duration::from_secs(300));
/// assert_eq!(config.wanted, 10);
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Stories taken from the front of the ranked list. Default: 30.
    pub wanted: usize,
    /// Freshness window; `None` disables the scheduled refresh and the
    /// cache stays fresh until [`NewsCache::invalidate()`]. Default: 15 minutes.
    pub refresh_interval: Option<Duration>,
    /// Backoff between failed scheduled reloads.
    pub retry: RetryConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            wanted: DEFAULT_WANTED,
            refresh_interval: Some(DEFAULT_REFRESH_INTERVAL),
            retry: RetryConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of wanted stories.
    pub fn wanted(mut self, n: usize) -> Self {
        self.wanted = n;
        self
    }

    /// Set the freshness window.
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(interval);
        self
    }

    /// Never refresh on a timer.
    pub fn no_refresh(mut self) -> Self {
        self.refresh_interval = None;
        self
    }

    /// Set the backoff used after failed reloads.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Reject values the cache cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.wanted == 0 {
            return Err(HuginnError::Configuration(
                "wanted story count must be at least 1".to_string(),
            ));
        }
        if self.refresh_interval.is_some_and(|d| d.is_zero()) {
            return Err(HuginnError::Configuration(
                "refresh interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Last failed reload and the end of its backoff window.
struct ReloadFailure {
    error: HuginnError,
    retry_at: Instant,
}

#[derive(Default)]
struct CacheState {
    ranked: RankedIds,
    stories: StoryTable,
    fresh: bool,
    loaded_at: Option<SystemTime>,
    consecutive_failures: u32,
    failure: Option<ReloadFailure>,
    refresh: Option<AbortHandle>,
}

/// Shared top-story cache. Construct once and hand out clones of the `Arc`.
pub struct NewsCache {
    source: Arc<dyn NewsSource>,
    config: CacheConfig,
    state: Mutex<CacheState>,
    this: Weak<NewsCache>,
}

impl NewsCache {
    /// Create an empty, stale cache over `source`.
    pub fn new(source: Arc<dyn NewsSource>, config: CacheConfig) -> Result<Arc<Self>> {
        config.validate()?;
        Ok(Arc::new_cyclic(|this| Self {
            source,
            config,
            state: Mutex::new(CacheState::default()),
            this: this.clone(),
        }))
    }

    /// Number of stories [`project()`](Self::project) returns.
    pub fn wanted(&self) -> usize {
        self.config.wanted
    }

    /// Make sure the cache holds a fresh snapshot, loading one if needed.
    ///
    /// Within the freshness window this performs no I/O. Otherwise the
    /// ranked ids are fetched, the first `wanted` stories are fetched
    /// concurrently, and both are swapped in together. On error the
    /// previous snapshot is kept, and until the backoff window ends the
    /// same error is returned without reloading.
    pub async fn fetch(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.fresh {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
            debug!("top stories are fresh");
            return Ok(());
        }
        if let Some(failure) = state.failure.as_ref().filter(|f| Instant::now() < f.retry_at) {
            debug!(error = %failure.error, "reload backing off, returning last error");
            return Err(failure.error.clone());
        }

        metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
        info!(source = self.source.name(), wanted = self.config.wanted, "loading top stories");
        let started = Instant::now();

        match self.reload().await {
            Ok((ranked, stories)) => {
                let elapsed = started.elapsed();
                metrics::histogram!(telemetry::RELOAD_DURATION_SECONDS).record(elapsed.as_secs_f64());
                metrics::counter!(telemetry::RELOADS_TOTAL, "status" => "ok").increment(1);
                info!(
                    ranked = ranked.len(),
                    stories = stories.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "top stories loaded"
                );

                state.ranked = ranked;
                state.stories = stories;
                state.fresh = true;
                state.loaded_at = Some(SystemTime::now());
                state.consecutive_failures = 0;
                state.failure = None;

                if let Some(interval) = self.config.refresh_interval {
                    self.schedule_refresh(&mut state, interval);
                }
                Ok(())
            }
            Err(e) => {
                metrics::counter!(telemetry::RELOADS_TOTAL, "status" => "error").increment(1);
                error!(error = %e, kept = state.stories.len(), "loading top stories failed");

                let attempt = state.consecutive_failures;
                state.consecutive_failures = attempt.saturating_add(1);

                let mut delay = self.config.retry.delay_for_attempt(attempt);
                if let Some(interval) = self.config.refresh_interval {
                    delay = delay.min(interval);
                    warn!(delay_ms = delay.as_millis() as u64, "scheduling reload retry");
                    self.schedule_refresh(&mut state, delay);
                }
                state.failure = Some(ReloadFailure {
                    error: e.clone(),
                    retry_at: Instant::now() + delay,
                });
                Err(e)
            }
        }
    }

    /// The first `wanted` stories in ranked order.
    ///
    /// Performs no I/O and waits for an in-flight reload to finish. After a
    /// failed reload this returns the previous snapshot.
    pub async fn project(&self) -> Result<Vec<Story>> {
        let state = self.state.lock().await;
        if state.loaded_at.is_none() {
            return Err(HuginnError::NotLoaded);
        }
        order_stories(&state.ranked, &state.stories, self.config.wanted)
    }

    /// Mark the cache stale; the next [`fetch()`](Self::fetch) reloads,
    /// even inside a backoff window.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.fresh = false;
        state.failure = None;
    }

    /// Whether the cache is inside its freshness window.
    pub async fn is_fresh(&self) -> bool {
        self.state.lock().await.fresh
    }

    /// When the current snapshot was loaded; `None` before the first load.
    pub async fn loaded_at(&self) -> Option<SystemTime> {
        self.state.lock().await.loaded_at
    }

    /// Snapshot of the cache state for health reporting.
    pub async fn status(&self) -> CacheStatus {
        let state = self.state.lock().await;
        CacheStatus {
            fresh: state.fresh,
            loaded_at: state.loaded_at,
            ranked: state.ranked.len(),
            stories: state.stories.len(),
        }
    }

    async fn reload(&self) -> Result<(RankedIds, StoryTable)> {
        let ranked = self.source.top_story_ids().await?;
        if ranked.len() < self.config.wanted {
            return Err(HuginnError::DataIntegrity(format!(
                "remote returned {} top stories but {} are wanted",
                ranked.len(),
                self.config.wanted
            )));
        }

        let stories = load_stories(Arc::clone(&self.source), &ranked[..self.config.wanted]).await?;
        Ok((ranked, stories))
    }

    /// Called by the refresh task: forget our own handle, go stale, reload.
    async fn refresh(&self) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            let current = tokio::task::id();
            if state.refresh.as_ref().is_some_and(|h| h.id() == current) {
                state.refresh = None;
            }
            state.fresh = false;
            state.failure = None;
        }
        self.fetch().await
    }

    fn schedule_refresh(&self, state: &mut CacheState, delay: Duration) {
        let handle = tokio::spawn(refresh_after(self.this.clone(), delay));
        if let Some(previous) = state.refresh.replace(handle.abort_handle()) {
            previous.abort();
        }
    }
}

impl Drop for NewsCache {
    fn drop(&mut self) {
        if let Some(handle) = self.state.get_mut().refresh.take() {
            handle.abort();
        }
    }
}

// Boxed so the task type does not depend on `fetch()`'s own future type.
fn refresh_after(cache: Weak<NewsCache>, delay: Duration) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(async move {
        tokio::time::sleep(delay).await;
        let Some(cache) = cache.upgrade() else {
            return;
        };
        debug!("refresh timer fired");
        if let Err(e) = cache.refresh().await {
            warn!(error = %e, "scheduled refresh failed");
        }
    })
}
