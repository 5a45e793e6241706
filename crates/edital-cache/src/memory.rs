//! In-memory cache tier backed by `DashMap`.
//!
//! This is the fast path: process-local, microsecond latency, O(1)
//! get/insert/remove. Entries carry an absolute expiry instant and are
//! checked lazily on every read, so correctness never depends on the
//! periodic sweep having run — the sweep only bounds memory growth.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;

use crate::entry::Dependency;

/// A value stored in the memory tier.
///
/// The value is wrapped in `Arc` so cache hits hand out a cheap clone rather
/// than copying a potentially large aggregate.
#[derive(Clone, Debug)]
pub struct MemoryEntry {
    /// The cached JSON value.
    pub value: Arc<Value>,
    /// Absolute expiry; the entry is logically dead once this passes.
    pub expires_at: Instant,
    /// Dependency tags this entry was written with.
    pub dependencies: Vec<Dependency>,
}

impl MemoryEntry {
    /// Creates an entry expiring `ttl` from now.
    ///
    /// A TTL too large to represent as an `Instant` offset is clamped to a
    /// far-future deadline instead of overflowing.
    #[must_use]
    pub fn new(value: Value, ttl: Duration, dependencies: Vec<Dependency>) -> Self {
        Self {
            value: Arc::new(value),
            expires_at: deadline(ttl),
            dependencies,
        }
    }

    /// Returns `true` if this entry's TTL has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Instant::now()
    }
}

/// Clamp for TTLs beyond what `Instant` arithmetic can represent.
const FAR_FUTURE_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

fn deadline(ttl: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(ttl).unwrap_or_else(|| now + FAR_FUTURE_TTL)
}

/// Process-local cache tier.
///
/// Thread-safe; shared across request handlers via `Arc`.
#[derive(Debug, Default)]
pub struct MemoryTier {
    entries: DashMap<String, MemoryEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl MemoryTier {
    /// Creates an empty memory tier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a live entry, removing it if it has expired.
    pub fn get(&self, key: &str) -> Option<Arc<Value>> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(Arc::clone(&entry.value));
            }
            // Expired: drop the guard before removing to avoid deadlock.
            drop(entry);
            self.entries.remove(key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Inserts or replaces an entry. Last write wins.
    pub fn insert(&self, key: impl Into<String>, entry: MemoryEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Removes an entry. Idempotent.
    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Removes every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    pub fn remove_by_prefix(&self, prefix: &str) -> usize {
        self.remove_where(|key, _| key.starts_with(prefix))
    }

    /// Removes every entry whose key contains `fragment`.
    ///
    /// Returns the number of entries removed.
    pub fn remove_by_pattern(&self, fragment: &str) -> usize {
        self.remove_where(|key, _| key.contains(fragment))
    }

    /// Removes every entry tagged with the given dependency.
    ///
    /// Returns the number of entries removed.
    pub fn remove_by_dependency(&self, dependency: &Dependency) -> usize {
        self.remove_where(|_, entry| entry.dependencies.contains(dependency))
    }

    /// Physically removes expired entries (the periodic sweep).
    ///
    /// Returns the number of entries removed.
    pub fn remove_expired(&self) -> usize {
        let now = Instant::now();
        let removed = self.remove_where(|_, entry| entry.expires_at <= now);
        if removed > 0 {
            self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
        }
        removed
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of physically present entries, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries are physically present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of physically present entries whose TTL has already passed.
    #[must_use]
    pub fn expired_count(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|entry| entry.expires_at <= now)
            .count()
    }

    /// Hit counter since creation.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Miss counter since creation.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Eviction counter (expired entries physically removed).
    #[must_use]
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    fn remove_where(&self, predicate: impl Fn(&str, &MemoryEntry) -> bool) -> usize {
        let mut removed = 0;
        self.entries.retain(|key, entry| {
            if predicate(key, entry) {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }
}
