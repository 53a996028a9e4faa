//! Short-TTL response cache
//!
//! Entries are checked for freshness on read; an expired entry is removed and
//! reported as a miss. There is no size bound: key cardinality is the set of
//! symbols (and chart windows) a session touches.

use chrono::Duration;
use dashmap::DashMap;
use papertrade_core::Timestamp;
use papertrade_ports::Clock;
use std::hash::Hash;
use std::sync::Arc;

/// Default freshness window for cached market data
pub const DEFAULT_TTL_SECS: i64 = 300;

/// Longest configurable freshness window (one day)
pub const MAX_TTL_SECS: i64 = 86_400;

/// A cached payload and the time it was stored
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub payload: T,
    pub stored_at: Timestamp,
}

impl<T> CacheEntry<T> {
    pub fn new(payload: T, stored_at: Timestamp) -> Self {
        Self { payload, stored_at }
    }

    /// Valid while `now - stored_at < ttl`
    pub fn is_valid(&self, now: Timestamp, ttl: Duration) -> bool {
        now - self.stored_at < ttl
    }
}

/// Keyed cache whose entries expire `ttl` after insertion
pub struct TtlCache<K, V> {
    entries: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Fresh payload for `key`, if any
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let hit = self
            .entries
            .get(key)
            .and_then(|entry| entry.is_valid(now, self.ttl).then(|| entry.payload.clone()));

        if hit.is_none() {
            self.entries
                .remove_if(key, |_, entry| !entry.is_valid(now, self.ttl));
        }
        hit
    }

    /// Store `value`, replacing any previous entry
    pub fn insert(&self, key: K, value: V) {
        let entry = CacheEntry::new(value, self.clock.now());
        self.entries.insert(key, entry);
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_valid(now, self.ttl));
        before - self.entries.len()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
