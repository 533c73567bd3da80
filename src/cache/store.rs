//! Cache Store Module
//!
//! Main cache engine: a key index over a recency list, with capacity-driven
//! LRU eviction and lazy TTL expiration.
//!
//! The store is not synchronized and never reads the clock itself. Every
//! operation takes the current instant as `now`; [`crate::cache::Cache`]
//! supplies it under its lock.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats, NodeId, RecencyList};
use crate::error::{CacheError, Result};

/// Upper bound on slots reserved up front; larger caches grow on demand.
const PREALLOCATE_LIMIT: usize = 1024;

// == LRU Store ==
/// Key index plus recency list, kept in lockstep.
///
/// A key is in `index` if and only if exactly one node of `order` carries an
/// entry with that key. Every mutation goes through [`LruStore::unlink`] or
/// the insertion path of [`LruStore::set`], which update both sides together.
#[derive(Debug)]
pub struct LruStore {
    /// Key -> handle of the node holding that key's entry
    index: HashMap<String, NodeId>,
    /// Entries ordered most to least recently used
    order: RecencyList<CacheEntry>,
    /// Maximum number of resident entries
    capacity: NonZeroUsize,
    /// Performance statistics
    stats: CacheStats,
}

impl LruStore {
    // == Constructor ==
    /// Creates an empty store holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        let reserve = capacity.get().min(PREALLOCATE_LIMIT);
        Self {
            index: HashMap::with_capacity(reserve),
            order: RecencyList::with_capacity(reserve),
            capacity,
            stats: CacheStats::new(),
        }
    }

    // == Get ==
    /// Looks up a live entry and marks it most recently used.
    ///
    /// An entry found expired is removed and reported as
    /// [`CacheError::Expired`]; later lookups report [`CacheError::NotFound`].
    pub fn get(&mut self, key: &str, now: DateTime<Utc>) -> Result<CacheEntry> {
        let id = match self.index.get(key) {
            Some(&id) => id,
            None => {
                self.stats.record_miss();
                trace!(key, "cache miss");
                return Err(CacheError::NotFound(key.to_string()));
            }
        };

        if self.is_expired(id, now) {
            self.expire(id);
            self.stats.record_miss();
            return Err(CacheError::Expired(key.to_string()));
        }

        self.order.move_to_front(id);
        self.stats.record_hit();
        trace!(key, "cache hit");
        self.order
            .get(id)
            .cloned()
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    // == Set ==
    /// Inserts or updates an entry and marks it most recently used.
    ///
    /// Updating an existing key rewrites both its value and its expiry.
    /// Inserting a new key into a full store first evicts the least recently
    /// used entry, whether or not that entry has expired.
    pub fn set(&mut self, key: String, value: String, ttl: Duration, now: DateTime<Utc>) {
        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.order.get_mut(id) {
                entry.refresh(value, ttl, now);
            }
            self.order.move_to_front(id);
            return;
        }

        if self.index.len() >= self.capacity.get() {
            self.evict_lru();
        }

        let id = self
            .order
            .push_front(CacheEntry::new(key.clone(), value, ttl, now));
        self.index.insert(key, id);
        self.stats.set_total_entries(self.index.len());
    }

    // == Delete ==
    /// Removes an entry.
    ///
    /// Returns `Ok(())` when a live entry was deleted. An expired entry is
    /// still removed, but reported as [`CacheError::Expired`].
    pub fn delete(&mut self, key: &str, now: DateTime<Utc>) -> Result<()> {
        let id = match self.index.get(key) {
            Some(&id) => id,
            None => return Err(CacheError::NotFound(key.to_string())),
        };

        if self.is_expired(id, now) {
            self.expire(id);
            return Err(CacheError::Expired(key.to_string()));
        }

        self.unlink(id);
        debug!(key, "deleted entry");
        Ok(())
    }

    // == Entries ==
    /// Returns copies of all live entries, most recently used first.
    ///
    /// Expired entries met along the way are removed. Recency is not
    /// refreshed for the entries returned.
    pub fn entries(&mut self, now: DateTime<Utc>) -> Vec<CacheEntry> {
        let mut live = Vec::with_capacity(self.order.len());
        let mut cursor = self.order.front_id();

        while let Some(id) = cursor {
            cursor = self.order.next_id(id);
            if self.is_expired(id, now) {
                self.expire(id);
            } else if let Some(entry) = self.order.get(id) {
                live.push(entry.clone());
            }
        }

        live
    }

    // == Accessors ==
    /// Number of resident entries, including expired ones not yet touched.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Checks index membership without any expiry check or recency update.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Resident keys, most recently used first, without touching recency.
    pub fn keys(&self) -> Vec<String> {
        self.order.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    // == Internals ==
    fn is_expired(&self, id: NodeId, now: DateTime<Utc>) -> bool {
        self.order
            .get(id)
            .map_or(false, |entry| entry.is_expired_at(now))
    }

    /// Removes a node from the list and its key from the index together.
    fn unlink(&mut self, id: NodeId) -> Option<CacheEntry> {
        let entry = self.order.remove(id)?;
        self.index.remove(&entry.key);
        self.stats.set_total_entries(self.index.len());
        Some(entry)
    }

    fn expire(&mut self, id: NodeId) {
        if let Some(entry) = self.unlink(id) {
            self.stats.record_expiration();
            debug!(key = %entry.key, "removed expired entry");
        }
    }

    fn evict_lru(&mut self) -> Option<CacheEntry> {
        let id = self.order.back_id()?;
        let entry = self.unlink(id)?;
        self.stats.record_eviction();
        debug!(key = %entry.key, "evicted least recently used entry");
        Some(entry)
    }

    /// Panics unless the index and the list describe the same key set.
    #[cfg(test)]
    pub(crate) fn validate_invariants(&self) {
        self.order.validate_links();
        assert_eq!(self.index.len(), self.order.len(), "index/list size mismatch");
        assert!(self.index.len() <= self.capacity.get(), "capacity exceeded");
        for (key, &id) in &self.index {
            let entry = self.order.get(id).expect("index points at a detached node");
            assert_eq!(&entry.key, key, "index points at the wrong node");
        }
    }
}
