//! Cache Module
//!
//! Provides a bounded in-memory cache with LRU eviction and lazy TTL
//! expiration.

mod entry;
mod list;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use list::{NodeId, RecencyList};
pub use shared::Cache;
pub use stats::CacheStats;
pub use store::LruStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
