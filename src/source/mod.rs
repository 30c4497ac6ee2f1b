//! Where stories come from.
//!
//! [`NewsSource`] is the seam between the cache and the network.
//! [`HackerNewsClient`] talks to the public Firebase API;
//! [`RetryingSource`] wraps any source with backoff on transient errors.

pub mod hacker_news;
pub mod retry;
pub mod traits;

pub use hacker_news::{
    DEFAULT_API_BASE_URL, DEFAULT_ITEM_PAGE_PREFIX, HackerNewsClient, HackerNewsConfig,
};
pub use retry::{RetryConfig, RetryingSource};
pub use traits::NewsSource;
