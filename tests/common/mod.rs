//! In-memory news source shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use huginn::{HuginnError, NewsSource, RankedIds, Result, Story, StoryId};

pub const ITEM_PAGE: &str = "https://news.ycombinator.com/item?id=";

/// Story fixture with an external link derived from the id.
pub fn story(id: u64) -> Story {
    Story::new(id, format!("story {id}"))
        .with_author(format!("user{id}"))
        .with_url(format!("https://example.com/{id}"))
        .with_score(id as i64)
}

/// Ids of projected stories, for compact assertions.
pub fn ids(stories: &[Story]) -> Vec<u64> {
    stories.iter().map(|s| s.id.0).collect()
}

/// Source backed by maps, with call counters and fault injection.
pub struct MockSource {
    ranked: Mutex<RankedIds>,
    stories: Mutex<HashMap<StoryId, Story>>,
    delays: Mutex<HashMap<StoryId, Duration>>,
    failing: Mutex<HashSet<StoryId>>,
    panicking: Mutex<HashSet<StoryId>>,
    fail_top: AtomicBool,
    top_calls: AtomicUsize,
    story_calls: AtomicUsize,
    completed: AtomicUsize,
}

impl MockSource {
    /// Ranked list `ids`, with a story record for each.
    pub fn new(ids: &[u64]) -> Self {
        Self {
            ranked: Mutex::new(ids.iter().copied().map(StoryId).collect()),
            stories: Mutex::new(ids.iter().map(|&id| (StoryId(id), story(id))).collect()),
            delays: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            panicking: Mutex::new(HashSet::new()),
            fail_top: AtomicBool::new(false),
            top_calls: AtomicUsize::new(0),
            story_calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    /// Replace the ranking, adding records for any new ids.
    pub fn set_ranked(&self, ids: &[u64]) {
        let mut stories = self.stories.lock().unwrap();
        for &id in ids {
            stories.entry(StoryId(id)).or_insert_with(|| story(id));
        }
        *self.ranked.lock().unwrap() = ids.iter().copied().map(StoryId).collect();
    }

    pub fn insert_story(&self, story: Story) {
        self.stories.lock().unwrap().insert(story.id, story);
    }

    /// Serve `story` when `id` is requested, whatever its own id says.
    pub fn insert_story_as(&self, id: u64, story: Story) {
        self.stories.lock().unwrap().insert(StoryId(id), story);
    }

    pub fn delay(self, id: u64, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(StoryId(id), delay);
        self
    }

    pub fn delay_all(self, delay: Duration) -> Self {
        {
            let ranked = self.ranked.lock().unwrap();
            let mut delays = self.delays.lock().unwrap();
            for &id in ranked.iter() {
                delays.insert(id, delay);
            }
        }
        self
    }

    pub fn fail_story(&self, id: u64, fail: bool) {
        let mut failing = self.failing.lock().unwrap();
        if fail {
            failing.insert(StoryId(id));
        } else {
            failing.remove(&StoryId(id));
        }
    }

    pub fn panic_on(self, id: u64) -> Self {
        self.panicking.lock().unwrap().insert(StoryId(id));
        self
    }

    pub fn fail_top(&self, fail: bool) {
        self.fail_top.store(fail, Ordering::SeqCst);
    }

    pub fn top_calls(&self) -> usize {
        self.top_calls.load(Ordering::SeqCst)
    }

    pub fn story_calls(&self) -> usize {
        self.story_calls.load(Ordering::SeqCst)
    }

    /// Story fetches that ran to completion (success or failure).
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn top_story_ids(&self) -> Result<RankedIds> {
        self.top_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_top.load(Ordering::SeqCst) {
            return Err(HuginnError::Transport("connection refused".into()));
        }
        Ok(self.ranked.lock().unwrap().clone())
    }

    async fn story(&self, id: StoryId) -> Result<Story> {
        self.story_calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.delays.lock().unwrap().get(&id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.panicking.lock().unwrap().contains(&id) {
            panic!("story {id} exploded");
        }

        self.completed.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(&id) {
            return Err(HuginnError::Api {
                status: 500,
                url: format!("mock://item/{id}"),
            });
        }
        let story = self.stories.lock().unwrap().get(&id).cloned();
        story
            .map(|s| s.with_fallback_url(ITEM_PAGE))
            .ok_or_else(|| HuginnError::Decode {
                url: format!("mock://item/{id}"),
                message: format!("item {id} does not exist"),
            })
    }
}
