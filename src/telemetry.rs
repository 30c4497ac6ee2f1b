//! Telemetry metric name constants.
//!
//! Centralised metric names for huginn operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `huginn_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `source` — news source name (e.g. "hacker-news")
//! - `operation` — source call (e.g. "top_story_ids", "story")
//! - `status` — outcome: "ok" or "error"

/// `fetch()` calls answered from a fresh cache.
pub const CACHE_HITS_TOTAL: &str = "huginn_cache_hits_total";

/// `fetch()` calls that started a reload.
pub const CACHE_MISSES_TOTAL: &str = "huginn_cache_misses_total";

/// Completed reloads.
///
/// Labels: `status` ("ok" | "error").
pub const RELOADS_TOTAL: &str = "huginn_reloads_total";

/// Reload duration in seconds, from top-id request to table swap.
pub const RELOAD_DURATION_SECONDS: &str = "huginn_reload_duration_seconds";

/// Individual story fetches issued by the loader.
///
/// Labels: `status` ("ok" | "error").
pub const STORY_FETCHES_TOTAL: &str = "huginn_story_fetches_total";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `source`, `operation`.
pub const RETRIES_TOTAL: &str = "huginn_retries_total";
