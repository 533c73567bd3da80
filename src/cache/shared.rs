//! Shared Cache Module
//!
//! Thread-safe façade over [`LruStore`].

use std::num::NonZeroUsize;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;

use crate::cache::{CacheEntry, CacheStats, LruStore};
use crate::error::{CacheError, Result};

// == Cache ==
/// Bounded LRU cache with per-entry TTL, safe to share across threads.
///
/// One mutex guards the key index and the recency list as a single unit,
/// so every operation is serialized and no caller ever observes the two out
/// of step. The lock is never held across an `.await`; share the cache as
/// `Arc<Cache>`.
#[derive(Debug)]
pub struct Cache {
    inner: Mutex<LruStore>,
}

impl Cache {
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is rejected.
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            CacheError::InvalidConfig("cache capacity must be at least 1".to_string())
        })?;
        Ok(Self {
            inner: Mutex::new(LruStore::new(capacity)),
        })
    }

    /// Returns a copy of the live entry for `key` and marks it most recently
    /// used.
    ///
    /// Reports [`CacheError::NotFound`] for unknown keys and
    /// [`CacheError::Expired`] (removing the entry) for elapsed ones.
    pub fn get(&self, key: &str) -> Result<CacheEntry> {
        let mut store = self.inner.lock();
        store.get(key, Utc::now())
    }

    /// Inserts or updates `key`, expiring `ttl` from now.
    ///
    /// Zero or absent TTLs are the caller's concern; a zero TTL yields an
    /// entry that expires on the next tick of the clock.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>, ttl: Duration) {
        let (key, value) = (key.into(), value.into());
        let mut store = self.inner.lock();
        store.set(key, value, ttl, Utc::now());
    }

    /// Deletes `key`.
    ///
    /// `Ok(())` means a live entry was deleted. Expired entries are removed
    /// too but reported as [`CacheError::Expired`].
    pub fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.inner.lock();
        store.delete(key, Utc::now())
    }

    /// Returns copies of all live entries, most recently used first, removing
    /// any expired entries encountered.
    pub fn get_all(&self) -> Vec<CacheEntry> {
        let mut store = self.inner.lock();
        store.entries(Utc::now())
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    /// Number of resident entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Checks whether `key` is resident, without expiry check or recency
    /// update.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.lock().contains_key(key)
    }

    #[cfg(test)]
    pub(crate) fn validate_invariants(&self) {
        self.inner.lock().validate_invariants();
    }
}
