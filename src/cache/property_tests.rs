//! Property-Based Tests for Cache Module
//!
//! Drives the store with random operation sequences on a simulated clock and
//! checks it against a plain `Vec`-backed reference model.

use std::num::NonZeroUsize;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use proptest::prelude::*;

use crate::cache::{CacheEntry, LruStore};
use crate::error::CacheError;

// == Strategies ==
/// Keys drawn from a small pool so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,16}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String, ttl_ms: u64 },
    Get { key: String },
    Delete { key: String },
    GetAll,
    Advance { ms: i64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), value_strategy(), 1u64..20)
            .prop_map(|(key, value, ttl_ms)| CacheOp::Set { key, value, ttl_ms }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => Just(CacheOp::GetAll),
        2 => (0i64..10).prop_map(|ms| CacheOp::Advance { ms }),
    ]
}

// == Reference Model ==
/// Entries kept most recently used first; every operation is a linear scan.
struct Model {
    capacity: usize,
    entries: Vec<CacheEntry>,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    fn get(&mut self, key: &str, now: DateTime<Utc>) -> Result<String, CacheError> {
        let pos = self
            .position(key)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        let entry = self.entries.remove(pos);
        if entry.expires_at < now {
            return Err(CacheError::Expired(key.to_string()));
        }
        let value = entry.value.clone();
        self.entries.insert(0, entry);
        Ok(value)
    }

    fn set(&mut self, key: String, value: String, ttl: Duration, now: DateTime<Utc>) {
        if let Some(pos) = self.position(&key) {
            self.entries.remove(pos);
        } else if self.entries.len() >= self.capacity {
            self.entries.pop();
        }
        self.entries.insert(0, CacheEntry::new(key, value, ttl, now));
    }

    fn delete(&mut self, key: &str, now: DateTime<Utc>) -> Result<(), CacheError> {
        let pos = self
            .position(key)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        let entry = self.entries.remove(pos);
        if entry.expires_at < now {
            return Err(CacheError::Expired(key.to_string()));
        }
        Ok(())
    }

    fn get_all(&mut self, now: DateTime<Utc>) -> Vec<CacheEntry> {
        self.entries.retain(|entry| entry.expires_at >= now);
        self.entries.clone()
    }

    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key.clone()).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // For any operation sequence, every outcome and the full recency order
    // match the reference model, and index and list stay in bijection.
    #[test]
    fn prop_matches_reference_model(
        capacity in 1usize..5,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let mut now = Utc::now();
        let mut store = LruStore::new(NonZeroUsize::new(capacity).unwrap());
        let mut model = Model::new(capacity);

        for op in ops {
            match op {
                CacheOp::Set { key, value, ttl_ms } => {
                    let ttl = Duration::from_millis(ttl_ms);
                    store.set(key.clone(), value.clone(), ttl, now);
                    model.set(key, value, ttl, now);
                }
                CacheOp::Get { key } => {
                    let actual = store.get(&key, now).map(|entry| entry.value);
                    prop_assert_eq!(actual, model.get(&key, now));
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(store.delete(&key, now), model.delete(&key, now));
                }
                CacheOp::GetAll => {
                    prop_assert_eq!(store.entries(now), model.get_all(now));
                }
                CacheOp::Advance { ms } => {
                    now += TimeDelta::milliseconds(ms);
                }
            }

            store.validate_invariants();
            prop_assert_eq!(store.keys(), model.keys());
        }
    }

    // For any sequence of inserts the resident count never exceeds capacity.
    #[test]
    fn prop_capacity_enforcement(
        keys in prop::collection::vec("[a-zA-Z0-9_]{1,8}", 1..200)
    ) {
        let capacity = 16;
        let now = Utc::now();
        let mut store = LruStore::new(NonZeroUsize::new(capacity).unwrap());

        for key in keys {
            store.set(key, "value".to_string(), Duration::from_secs(60), now);
            prop_assert!(store.len() <= capacity);
        }
        store.validate_invariants();
    }

    // A stored value reads back unchanged before it expires.
    #[test]
    fn prop_roundtrip_storage(key in "[a-zA-Z0-9_]{1,64}", value in value_strategy()) {
        let now = Utc::now();
        let mut store = LruStore::new(NonZeroUsize::new(8).unwrap());

        store.set(key.clone(), value.clone(), Duration::from_secs(60), now);
        let entry = store.get(&key, now).unwrap();
        prop_assert_eq!(entry.value, value);
    }
}
