//! Port for the tagged read-model cache.
//!
//! Cached values are JSON so the port stays object safe. Every entry is
//! registered under one or more [`CacheTag`]s; invalidating a tag drops every
//! entry registered under it before the call returns.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{CacheKey, CacheTag, TagSnapshot};

/// Tag-invalidated cache for read models.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentCache: Send + Sync {
    /// Read a cached value.
    async fn get(&self, key: &CacheKey) -> Option<Value>;

    /// Capture the current generation of each tag before loading a value.
    fn snapshot(&self, tags: &[CacheTag]) -> TagSnapshot;

    /// Store a value loaded under `snapshot`.
    ///
    /// The value is discarded when any tag was invalidated after the snapshot
    /// was taken, so a slow read can never resurrect pre-write data.
    async fn put(&self, key: CacheKey, value: Value, snapshot: TagSnapshot);

    /// Drop every entry registered under any of `tags`.
    async fn invalidate(&self, tags: &[CacheTag]);
}

/// Cache that never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpContentCache;

#[async_trait]
impl ContentCache for NoOpContentCache {
    async fn get(&self, _key: &CacheKey) -> Option<Value> {
        None
    }

    fn snapshot(&self, tags: &[CacheTag]) -> TagSnapshot {
        TagSnapshot::new(tags.iter().cloned().map(|tag| (tag, 0)).collect())
    }

    async fn put(&self, _key: CacheKey, _value: Value, _snapshot: TagSnapshot) {}

    async fn invalidate(&self, _tags: &[CacheTag]) {}
}
