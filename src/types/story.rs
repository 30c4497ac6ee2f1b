//! Story records and identifiers.
//!
//! [`Story`] mirrors the item payload served by the Hacker News API. Wire
//! field names (`by`, `type`, `url`, `time`) are mapped onto descriptive
//! Rust names; every field is optional on the wire and defaults to
//! empty/zero.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier assigned to an item by the remote system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(pub u64);

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StoryId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Top-story identifiers in remote ranking order.
pub type RankedIds = Vec<StoryId>;

/// Stories keyed by identifier. Order is reconstructed from [`RankedIds`].
pub type StoryTable = HashMap<StoryId, Story>;

/// A single story (or job, poll, ...) record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Story {
    #[serde(default)]
    pub id: StoryId,
    /// Username of the submitter. Empty for deleted items.
    #[serde(rename = "by", default)]
    pub author: String,
    #[serde(default)]
    pub title: String,
    /// Item type tag: "story", "job", "poll", ...
    #[serde(rename = "type", default)]
    pub kind: String,
    /// External link, or the item page on the remote site when the story
    /// has none. See [`Story::with_fallback_url`].
    #[serde(rename = "url", default)]
    pub display_url: String,
    #[serde(default)]
    pub score: i64,
    /// Submission time in unix seconds.
    #[serde(rename = "time", default)]
    pub submitted_at: i64,
}

impl Story {
    /// Create a story with an id and title; remaining fields are empty.
    pub fn new(id: impl Into<StoryId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: "story".to_string(),
            ..Default::default()
        }
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the external link.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.display_url = url.into();
        self
    }

    /// Set the score.
    pub fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }

    /// Fill in `display_url` from the item page prefix when the record has
    /// no external link.
    ///
    /// ```rust
    /// # use huginn::Story;
    /// let ask = Story::new(42, "Ask HN: anything").with_fallback_url("https://news.ycombinator.com/item?id=");
    /// assert_eq!(ask.display_url, "https://news.ycombinator.com/item?id=42");
    /// ```
    pub fn with_fallback_url(mut self, item_page_prefix: &str) -> Self {
        if self.display_url.is_empty() {
            self.display_url = format!("{item_page_prefix}{}", self.id);
        }
        self
    }
}
