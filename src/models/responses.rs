//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies and WebSocket
//! snapshot frames.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{CacheEntry, CacheStats};

/// A single cache entry as seen by clients.
///
/// Returned by GET /cache/:key, listed by GET /cache and carried in
/// WebSocket snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub value: String,
    /// Expiry instant in RFC 3339
    pub expires_at: DateTime<Utc>,
    /// Milliseconds left before expiry at the time of the response
    pub ttl_remaining_ms: u64,
}

impl EntryResponse {
    pub fn from_entry(entry: CacheEntry, now: DateTime<Utc>) -> Self {
        let ttl_remaining_ms =
            u64::try_from(entry.ttl_remaining_at(now).as_millis()).unwrap_or(u64::MAX);
        Self {
            key: entry.key,
            value: entry.value,
            expires_at: entry.expires_at,
            ttl_remaining_ms,
        }
    }

    /// Converts a batch of entries against a single reading of the clock.
    pub fn from_entries(entries: Vec<CacheEntry>) -> Vec<Self> {
        let now = Utc::now();
        entries
            .into_iter()
            .map(|entry| Self::from_entry(entry, now))
            .collect()
    }
}

/// Response body for the SET operation (POST /cache)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
    /// TTL applied, in seconds
    pub ttl: u64,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, ttl: u64) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
            ttl,
        }
    }
}

/// Response body for the DELETE operation (DELETE /cache/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Resident entries, including expired ones not yet reclaimed
    pub total_entries: usize,
    /// Configured maximum number of entries
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, capacity: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            capacity,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Periodic cache snapshot pushed to WebSocket clients.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotMessage {
    /// When the snapshot was taken
    pub generated_at: DateTime<Utc>,
    /// Live entries, most recently used first
    pub entries: Vec<EntryResponse>,
}

impl SnapshotMessage {
    pub fn new(entries: Vec<CacheEntry>) -> Self {
        let generated_at = Utc::now();
        Self {
            generated_at,
            entries: entries
                .into_iter()
                .map(|entry| EntryResponse::from_entry(entry, generated_at))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use std::time::Duration;

    fn entry(key: &str, value: &str, ttl: Duration, now: DateTime<Utc>) -> CacheEntry {
        CacheEntry::new(key.to_string(), value.to_string(), ttl, now)
    }

    #[test]
    fn test_entry_response_from_entry() {
        let now = Utc::now();
        let resp =
            EntryResponse::from_entry(entry("k", "v", Duration::from_secs(10), now), now);

        assert_eq!(resp.key, "k");
        assert_eq!(resp.value, "v");
        assert_eq!(resp.ttl_remaining_ms, 10_000);
        assert_eq!(resp.expires_at, now + TimeDelta::seconds(10));
    }

    #[test]
    fn test_entry_response_serialize() {
        let now = Utc::now();
        let resp =
            EntryResponse::from_entry(entry("k", "v", Duration::from_secs(1), now), now);
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["key"], "k");
        assert_eq!(json["value"], "v");
        assert!(json["expires_at"].is_string());
        assert_eq!(json["ttl_remaining_ms"], 1000);
    }

    #[test]
    fn test_set_response_serialize() {
        let resp = SetResponse::new("my_key", 30);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("my_key"));
        assert!(json.contains("successfully"));
        assert!(json.contains("\"ttl\":30"));
    }

    #[test]
    fn test_delete_response_serialize() {
        let resp = DeleteResponse::new("deleted_key");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("deleted_key"));
        assert!(json.contains("deleted"));
    }

    #[test]
    fn test_stats_response_from_stats() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            evictions: 5,
            expirations: 3,
            total_entries: 10,
        };
        let resp = StatsResponse::new(&stats, 40);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.expirations, 3);
        assert_eq!(resp.capacity, 40);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_snapshot_message_keeps_order() {
        let now = Utc::now();
        let snapshot = SnapshotMessage::new(vec![
            entry("newer", "2", Duration::from_secs(60), now),
            entry("older", "1", Duration::from_secs(60), now),
        ]);

        let keys: Vec<&str> = snapshot.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["newer", "older"]);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["generated_at"].is_string());
        assert_eq!(json["entries"].as_array().unwrap().len(), 2);
    }
}
