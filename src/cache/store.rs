//! TTL Cache Module
//!
//! Keyed store combining HashMap storage with FIFO insertion tracking and
//! lazy TTL expiration. All operations are synchronous and total.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tracing::debug;

use crate::cache::lock::mutex_lock;
use crate::cache::{CacheEntry, CacheStats, InsertionOrder};

// == Inner State ==
#[derive(Debug)]
struct Inner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    order: InsertionOrder,
    stats: CacheStats,
}

impl<V> Inner<V> {
    fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            true
        } else {
            false
        }
    }

    fn expire(&mut self, key: &str) {
        self.remove(key);
        self.stats.record_expirations(1);
    }
}

// == TTL Cache ==
/// Capacity-bounded cache with per-entry TTL and FIFO eviction.
///
/// The map and its insertion order live behind one mutex, so every operation
/// observes `len() <= capacity`. The lock is never held across an await.
#[derive(Debug)]
pub struct TtlCache<V> {
    name: String,
    capacity: usize,
    inner: Mutex<Inner<V>>,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache named `name` holding at most `capacity` entries.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity: capacity.max(1),
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: InsertionOrder::new(),
                stats: CacheStats::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`.
    ///
    /// A cache at capacity first evicts the earliest-inserted entry,
    /// regardless of how recently that entry was read, and also when `key`
    /// is already present. An existing key is then overwritten and becomes
    /// the newest insertion.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let mut inner = mutex_lock(&self.inner, &self.name, "set");

        while inner.entries.len() >= self.capacity {
            let Some(oldest) = inner.order.pop_oldest() else {
                break;
            };
            inner.entries.remove(&oldest);
            inner.stats.record_eviction();
            debug!(cache = %self.name, key = %oldest, "evicted oldest entry");
        }

        inner.entries.insert(key.clone(), CacheEntry::new(value, ttl));
        inner.order.record(&key);
    }

    // == Get ==
    /// Returns a clone of the fresh value under `key`.
    ///
    /// An expired entry is removed on the spot and reported as absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = mutex_lock(&self.inner, &self.name, "get");

        let fresh = match inner.entries.get(key) {
            None => None,
            Some(entry) if entry.is_expired() => {
                inner.expire(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
        };

        match fresh {
            Some(value) => {
                inner.stats.record_hit();
                Some(value)
            }
            None => {
                inner.stats.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Reports whether a fresh entry exists, applying the same expiry as `get`.
    pub fn has(&self, key: &str) -> bool {
        let mut inner = mutex_lock(&self.inner, &self.name, "has");

        match inner.entries.get(key) {
            None => false,
            Some(entry) if entry.is_expired() => {
                inner.expire(key);
                false
            }
            Some(_) => true,
        }
    }

    // == Delete ==
    /// Removes `key`. Returns whether an entry was present.
    pub fn delete(&self, key: &str) -> bool {
        mutex_lock(&self.inner, &self.name, "delete").remove(key)
    }

    // == Clear ==
    pub fn clear(&self) {
        let mut inner = mutex_lock(&self.inner, &self.name, "clear");
        inner.entries.clear();
        inner.order.clear();
    }

    // == Length ==
    /// Number of entries physically held, including expired ones not yet
    /// read or swept.
    pub fn len(&self) -> usize {
        mutex_lock(&self.inner, &self.name, "len").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the keys currently held, oldest insertion first.
    pub fn keys(&self) -> Vec<String> {
        mutex_lock(&self.inner, &self.name, "keys")
            .order
            .iter()
            .cloned()
            .collect()
    }

    // == Remove Where ==
    /// Deletes every key matching `predicate` in one pass under the lock.
    ///
    /// Returns the number of entries removed.
    pub fn remove_where<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let mut inner = mutex_lock(&self.inner, &self.name, "remove_where");
        let before = inner.entries.len();

        inner.entries.retain(|key, _| !predicate(key.as_str()));
        let Inner { entries, order, .. } = &mut *inner;
        order.retain(|key| entries.contains_key(key));

        before - inner.entries.len()
    }

    // == Sweep Expired ==
    /// Removes every expired entry.
    ///
    /// Works from a snapshot of the keys and takes the lock once per key, so
    /// concurrent callers wait at most for a single entry check. Evictions
    /// racing the sweep cannot make it skip a key; entries inserted after the
    /// snapshot are left for the next sweep.
    pub fn sweep_expired(&self) -> usize {
        let mut removed = 0;

        for key in self.keys() {
            let mut inner = mutex_lock(&self.inner, &self.name, "sweep");
            let expired = inner
                .entries
                .get(&key)
                .is_some_and(|entry| entry.is_expired());

            if expired {
                inner.expire(&key);
                removed += 1;
            }
        }

        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = mutex_lock(&self.inner, &self.name, "stats");
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats
    }
}

// == Cache Handle ==
/// Value-type-erased view of a [`TtlCache`], for work that spans every cache
/// in the registry: invalidation, sweeping, and reporting.
pub trait CacheHandle: Send + Sync {
    fn name(&self) -> &str;

    /// Deletes every key for which `predicate` returns true.
    fn remove_where(&self, predicate: &mut dyn FnMut(&str) -> bool) -> usize;

    fn sweep_expired(&self) -> usize;

    fn stats(&self) -> CacheStats;
}

impl<V: Clone + Send> CacheHandle for TtlCache<V> {
    fn name(&self) -> &str {
        TtlCache::name(self)
    }

    fn remove_where(&self, predicate: &mut dyn FnMut(&str) -> bool) -> usize {
        TtlCache::remove_where(self, predicate)
    }

    fn sweep_expired(&self) -> usize {
        TtlCache::sweep_expired(self)
    }

    fn stats(&self) -> CacheStats {
        TtlCache::stats(self)
    }
}
