//! Huginn - cached Hacker News top stories
//!
//! This crate keeps one shared, self-refreshing snapshot of the current
//! top stories: the ranked id list plus the story records for its first
//! `wanted` entries, fetched concurrently. Callers ask the cache to be
//! fresh, then read the stories in rank order.
//!
//! # Example
//!
//! ```rust,no_run
//! use huginn::Huginn;
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     let cache = Huginn::builder().wanted(10).build()?;
//!
//!     cache.fetch().await?;
//!     for (rank, story) in cache.project().await?.iter().enumerate() {
//!         println!("{:>2}. {} by {}", rank + 1, story.title, story.author);
//!     }
//!     Ok(())
//! }
//! ```

mod builder;
pub mod cache;
pub mod error;
#[cfg(feature = "server")]
pub mod server;
pub mod source;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use builder::{Huginn, HuginnBuilder};
pub use cache::{CacheConfig, NewsCache};
pub use error::{HuginnError, Result};
pub use source::{
    HackerNewsClient, HackerNewsConfig, NewsSource, RetryConfig, RetryingSource,
};
pub use types::{CacheStatus, RankedIds, Story, StoryId, StoryTable};
pub use version::{BuildInfo, GIT_BRANCH, GIT_SHA, PKG_VERSION, build_info, git_dirty, version_string};
