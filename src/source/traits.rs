//! Source trait for top-story data.
//!
//! Implementations fetch from the network (or, in tests, from memory).
//! Decorators such as [`RetryingSource`](super::RetryingSource) wrap an
//! `Arc<dyn NewsSource>` and delegate.

use async_trait::async_trait;

use crate::Result;
use crate::types::{RankedIds, Story, StoryId};

/// Provider of the ranked top-story list and individual story records.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Source name for logging/debugging.
    fn name(&self) -> &str;

    /// Fetch the full ranked list of current top-story ids.
    ///
    /// Either the whole list decodes or the call fails; no partial lists.
    async fn top_story_ids(&self) -> Result<RankedIds>;

    /// Fetch one story record.
    ///
    /// The returned story always has a non-empty `display_url`.
    async fn story(&self, id: StoryId) -> Result<Story>;
}
