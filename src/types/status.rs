//! Cache state snapshot for health reporting.

use std::time::SystemTime;

use serde::Serialize;

/// Point-in-time view of a [`NewsCache`](crate::NewsCache).
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    /// Whether the cache is inside its freshness window.
    pub fresh: bool,
    /// Wall-clock time of the last successful load.
    pub loaded_at: Option<SystemTime>,
    /// Length of the last loaded ranked id list.
    pub ranked: usize,
    /// Number of stories held in the table.
    pub stories: usize,
}

impl CacheStatus {
    /// Whether any load has ever succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }
}
