//! HTTP front end for the top-story cache.
//!
//! This module provides:
//! - Configuration loading (`config`)
//! - HTML rendering of the story list (`render`)
//! - The axum router and handlers (`routes`)
//!
//! Every request calls [`NewsCache::fetch()`](crate::NewsCache::fetch)
//! then [`NewsCache::project()`](crate::NewsCache::project). When a reload
//! fails but an earlier snapshot exists, that snapshot is served stale.

pub mod config;
pub mod render;
pub mod routes;

pub use routes::{ServerError, router};
