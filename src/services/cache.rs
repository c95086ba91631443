use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::types::CacheStats;

/// A thread-safe cache with TTL support and hit/miss accounting.
///
/// Entries are only evicted lazily, when a lookup finds them expired.
pub struct Cache<V> {
    data: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V: Clone> Cache<V> {
    /// Create a new cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            sets: AtomicU64::new(0),
        }
    }

    /// Get a value if present and fresh. An expired entry is removed.
    pub fn get(&self, key: &str) -> Option<V> {
        let value = match self.data.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(entry) => {
                drop(entry);
                self.evict_if_expired(key);
                None
            }
            None => None,
        };

        match value {
            Some(_) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit: {}", key);
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Cache miss: {}", key);
            }
        }
        value
    }

    /// Remove `key` only if its entry is still expired.
    ///
    /// A concurrent `set` may have refreshed the key since it was read.
    fn evict_if_expired(&self, key: &str) {
        let now = Instant::now();
        if self.data.remove_if(key, |_, entry| entry.expires_at <= now).is_some() {
            debug!("Cache entry expired: {}", key);
        }
    }

    /// Store a value, replacing any previous entry for `key`.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        debug!("Cache set: {}", key);
        self.data.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    /// Clear all entries. Counters are kept.
    pub fn clear(&self) {
        self.data.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            hits,
            misses,
            sets: self.sets.load(Ordering::Relaxed),
            size: self.data.len(),
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
        }
    }

    /// Get the number of entries in the cache (including expired).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
