//! Public types for the Huginn API.

mod status;
mod story;

pub use status::CacheStatus;
pub use story::{RankedIds, Story, StoryId, StoryTable};
