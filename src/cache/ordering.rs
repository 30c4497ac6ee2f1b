//! Projection of the story table into ranked order.

use crate::types::{Story, StoryId, StoryTable};
use crate::{HuginnError, Result};

/// Return the first `wanted` stories in the order given by `ids`.
///
/// Fails with [`HuginnError::DataIntegrity`] when `ids` holds fewer than
/// `wanted` entries or a ranked id has no story in `table`; a gap is never
/// papered over with an empty record.
pub fn order_stories(ids: &[StoryId], table: &StoryTable, wanted: usize) -> Result<Vec<Story>> {
    let Some(prefix) = ids.get(..wanted) else {
        return Err(HuginnError::DataIntegrity(format!(
            "ranked list has {} ids but {wanted} stories are wanted",
            ids.len()
        )));
    };

    prefix
        .iter()
        .map(|id| {
            table.get(id).cloned().ok_or_else(|| {
                HuginnError::DataIntegrity(format!("story {id} is ranked but was not loaded"))
            })
        })
        .collect()
}
