//! In-process read-model cache with tag-based invalidation.
//!
//! Entries live in a bounded `moka` cache with a time-to-live. Invalidating a
//! tag stamps it with the next value of a cache-wide epoch and evicts every
//! entry indexed under it. Entries remember the stamps they were loaded under,
//! so an entry stored by a read that raced a write is rejected on the next
//! lookup even if it slipped past the eviction.
//!
//! Both side tables stay bounded. The key index is trimmed by the eviction
//! listener whenever `moka` drops an entry. Stamps of tags with no live
//! entries are pruned once the table outgrows its capacity; a pruned tag
//! reads as the `floor`, which is raised to at least every pruned stamp so a
//! snapshot taken before the prune still fails the comparison.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use moka::future::Cache;
use moka::notification::RemovalCause;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::ContentCache;
use crate::domain::{CacheKey, CacheTag, TagSnapshot};

/// Lower bound on tracked tag stamps before pruning starts.
const MIN_TRACKED_TAGS: usize = 256;

/// Sizing of the read-model cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub max_entries: u64,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(300),
        }
    }
}

impl CacheConfig {
    fn tracked_tag_capacity(self) -> usize {
        usize::try_from(self.max_entries.saturating_mul(4))
            .unwrap_or(usize::MAX)
            .max(MIN_TRACKED_TAGS)
    }
}

#[derive(Debug)]
struct CachedEntry {
    value: Value,
    snapshot: TagSnapshot,
}

type KeyIndex = DashMap<CacheTag, HashSet<CacheKey>>;

#[derive(Debug, Default)]
struct TagStamps {
    stamps: DashMap<CacheTag, u64>,
    epoch: AtomicU64,
    floor: AtomicU64,
}

impl TagStamps {
    fn current(&self, tag: &CacheTag) -> u64 {
        match self.stamps.get(tag) {
            Some(stamp) => *stamp,
            None => self.floor.load(Ordering::Acquire),
        }
    }

    fn bump(&self, tag: &CacheTag) {
        let stamp = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        self.stamps.insert(tag.clone(), stamp);
    }

    /// Start tracking `tag` so its stamp survives pruning while entries use it.
    fn track(&self, tag: &CacheTag) {
        self.stamps
            .entry(tag.clone())
            .or_insert_with(|| self.floor.load(Ordering::Acquire));
    }

    /// Drop stamps of tags that index no live entry.
    fn prune(&self, index: &KeyIndex) {
        let idle: Vec<(CacheTag, u64)> = self
            .stamps
            .iter()
            .filter(|stamp| !index.contains_key(stamp.key()))
            .map(|stamp| (stamp.key().clone(), *stamp.value()))
            .collect();
        let Some(highest) = idle.iter().map(|(_, stamp)| *stamp).max() else {
            return;
        };
        // Raise the floor before removing, so a reader never sees a pruned tag
        // at a value below its last stamp.
        self.floor.fetch_max(highest, Ordering::AcqRel);
        let floor = self.floor.load(Ordering::Acquire);
        for (tag, _) in &idle {
            self.stamps.remove_if(tag, |_, stamp| *stamp <= floor);
        }
        debug!(pruned = idle.len(), floor, "pruned idle cache tag stamps");
    }
}

fn forget_evicted(index: &KeyIndex, key: &CacheKey, entry: &CachedEntry) {
    for (tag, _) in entry.snapshot.iter() {
        let now_empty = match index.get_mut(tag) {
            Some(mut keys) => {
                keys.remove(key);
                keys.is_empty()
            }
            None => false,
        };
        if now_empty {
            index.remove_if(tag, |_, keys| keys.is_empty());
        }
    }
}

/// [`ContentCache`] backed by `moka`.
#[derive(Clone)]
pub struct TaggedContentCache {
    entries: Cache<CacheKey, Arc<CachedEntry>>,
    stamps: Arc<TagStamps>,
    index: Arc<KeyIndex>,
    tag_capacity: usize,
}

impl TaggedContentCache {
    pub fn new(config: CacheConfig) -> Self {
        let index: Arc<KeyIndex> = Arc::new(DashMap::new());
        let listener_index = Arc::clone(&index);
        let entries = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .eviction_listener(
                move |key: Arc<CacheKey>, entry: Arc<CachedEntry>, cause: RemovalCause| {
                    if cause != RemovalCause::Replaced {
                        forget_evicted(&listener_index, &key, &entry);
                    }
                },
            )
            .build();
        Self {
            entries,
            stamps: Arc::new(TagStamps::default()),
            index,
            tag_capacity: config.tracked_tag_capacity(),
        }
    }

    fn is_current(&self, snapshot: &TagSnapshot) -> bool {
        snapshot
            .iter()
            .all(|(tag, stamp)| self.stamps.current(tag) == *stamp)
    }

    #[cfg(test)]
    fn tracked_tags(&self) -> usize {
        self.stamps.stamps.len()
    }

    #[cfg(test)]
    fn indexed_tags(&self) -> usize {
        self.index.len()
    }
}

impl Default for TaggedContentCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[async_trait]
impl ContentCache for TaggedContentCache {
    async fn get(&self, key: &CacheKey) -> Option<Value> {
        let entry = self.entries.get(key).await?;
        if self.is_current(&entry.snapshot) {
            return Some(entry.value.clone());
        }
        self.entries.invalidate(key).await;
        debug!(key = %key, "evicted stale cache entry");
        None
    }

    fn snapshot(&self, tags: &[CacheTag]) -> TagSnapshot {
        TagSnapshot::new(
            tags.iter()
                .map(|tag| (tag.clone(), self.stamps.current(tag)))
                .collect(),
        )
    }

    async fn put(&self, key: CacheKey, value: Value, snapshot: TagSnapshot) {
        for (tag, _) in snapshot.iter() {
            self.stamps.track(tag);
        }
        if !self.is_current(&snapshot) {
            debug!(key = %key, "discarding value loaded before an invalidation");
            return;
        }
        for (tag, _) in snapshot.iter() {
            self.index
                .entry(tag.clone())
                .or_default()
                .insert(key.clone());
        }
        self.entries
            .insert(key, Arc::new(CachedEntry { value, snapshot }))
            .await;
    }

    async fn invalidate(&self, tags: &[CacheTag]) {
        for tag in tags {
            self.stamps.bump(tag);
            let keys = self
                .index
                .remove(tag)
                .map(|(_, keys)| keys)
                .unwrap_or_default();
            for key in keys {
                self.entries.invalidate(&key).await;
            }
            debug!(tag = %tag, "cache tag invalidated");
        }
        if self.stamps.stamps.len() > self.tag_capacity {
            self.stamps.prune(&self.index);
        }
    }
}
