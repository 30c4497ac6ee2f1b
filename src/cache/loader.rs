//! Concurrent fan-out/fan-in over a prefix of the ranked ids.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::debug;

use crate::source::NewsSource;
use crate::telemetry;
use crate::types::{StoryId, StoryTable};
use crate::{HuginnError, Result};

/// Fetch every story in `ids` concurrently and collect them by id.
///
/// One tokio task is spawned per id, so fetches block on the network
/// independently of each other. Returns once all of them have reported.
/// The first failure aborts the remaining fetches and is returned as is;
/// a panicking fetch surfaces as [`HuginnError::Task`].
///
/// Every key is an element of `ids` and matches its story's `id`; a story
/// answering for a different id is a [`HuginnError::DataIntegrity`] error.
pub async fn load_stories(source: Arc<dyn NewsSource>, ids: &[StoryId]) -> Result<StoryTable> {
    let mut tasks = JoinSet::new();
    for &id in ids {
        let source = Arc::clone(&source);
        tasks.spawn(async move { (id, source.story(id).await) });
    }

    let mut table = StoryTable::with_capacity(ids.len());
    while let Some(joined) = tasks.join_next().await {
        // Returning early drops `tasks`, which aborts the fetches still running.
        let (id, result) = joined?;
        match result {
            Ok(story) if story.id != id => {
                metrics::counter!(telemetry::STORY_FETCHES_TOTAL, "status" => "error").increment(1);
                return Err(HuginnError::DataIntegrity(format!(
                    "requested story {id} but the source returned {}",
                    story.id
                )));
            }
            Ok(story) => {
                metrics::counter!(telemetry::STORY_FETCHES_TOTAL, "status" => "ok").increment(1);
                table.insert(id, story);
            }
            Err(e) => {
                metrics::counter!(telemetry::STORY_FETCHES_TOTAL, "status" => "error").increment(1);
                debug!(%id, error = %e, "story fetch failed, aborting load");
                return Err(e);
            }
        }
    }

    Ok(table)
}
