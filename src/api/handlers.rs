//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use tokio::sync::Semaphore;

use crate::api::events::SnapshotBus;
use crate::cache::Cache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, EntryResponse, HealthResponse, SetRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The cache synchronizes itself, so handlers share it through a plain `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache
    pub cache: Arc<Cache>,
    /// Snapshot fan-out to WebSocket clients
    pub snapshots: SnapshotBus,
    /// TTL applied when a SET request carries none
    pub default_ttl: Duration,
    /// One permit per allowed concurrent WebSocket connection
    pub ws_slots: Arc<Semaphore>,
}

impl AppState {
    /// Default cap on concurrent WebSocket connections.
    pub const MAX_WS_CONNECTIONS: usize = 64;

    /// Creates a new AppState around the given cache.
    pub fn new(cache: Cache, default_ttl: Duration) -> Self {
        Self {
            cache: Arc::new(cache),
            snapshots: SnapshotBus::default(),
            default_ttl,
            ws_slots: Arc::new(Semaphore::new(Self::MAX_WS_CONNECTIONS)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let cache = Cache::new(config.max_entries)?;
        Ok(Self::new(cache, config.default_ttl()).with_ws_limit(config.max_ws_clients))
    }

    /// Replaces the WebSocket connection cap.
    pub fn with_ws_limit(mut self, max_connections: usize) -> Self {
        self.ws_slots = Arc::new(Semaphore::new(max_connections));
        self
    }
}

/// Handler for POST /cache
///
/// Stores a key-value pair with the requested TTL, or the default one.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.map(Duration::from_secs).unwrap_or(state.default_ttl);
    state.cache.set(req.key.clone(), req.value, ttl);

    Ok(Json(SetResponse::new(req.key, ttl.as_secs())))
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryResponse>> {
    let entry = state.cache.get(&key)?;
    Ok(Json(EntryResponse::from_entry(entry, Utc::now())))
}

/// Handler for GET /cache
///
/// Lists live entries, most recently used first. Expired entries found on
/// the way are reclaimed.
pub async fn list_handler(State(state): State<AppState>) -> Json<Vec<EntryResponse>> {
    Json(EntryResponse::from_entries(state.cache.get_all()))
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.cache.delete(&key)?;
    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();
    Json(StatsResponse::new(&stats, state.cache.capacity()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn test_state() -> AppState {
        AppState::new(Cache::new(100).unwrap(), Duration::from_secs(300))
    }

    fn set_request(key: &str, value: &str, ttl: Option<u64>) -> Json<SetRequest> {
        Json(SetRequest {
            key: key.to_string(),
            value: value.to_string(),
            ttl,
        })
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let result =
            set_handler(State(state.clone()), set_request("test_key", "test_value", None)).await;
        let response = assert_ok!(result);
        assert_eq!(response.ttl, 300);

        let response = get_handler(State(state), Path("test_key".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, "test_value");
        assert!(response.ttl_remaining_ms <= 300_000);
    }

    #[tokio::test]
    async fn test_set_uses_requested_ttl() {
        let state = test_state();

        let response = set_handler(State(state.clone()), set_request("k", "v", Some(7)))
            .await
            .unwrap();
        assert_eq!(response.ttl, 7);

        let entry = get_handler(State(state), Path("k".to_string())).await.unwrap();
        assert!(entry.ttl_remaining_ms <= 7_000);
        assert!(entry.ttl_remaining_ms > 6_000);
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state();

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_handler_mru_first() {
        let state = test_state();
        state.cache.set("first", "1", Duration::from_secs(60));
        state.cache.set("second", "2", Duration::from_secs(60));

        let Json(entries) = list_handler(State(state)).await;
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();
        set_handler(State(state.clone()), set_request("to_delete", "value", None))
            .await
            .unwrap();

        let result = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert_ok!(result);

        let result = get_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert_err!(result);

        let result = delete_handler(State(state), Path("to_delete".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.capacity, 100);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let state = test_state();

        let result = set_handler(State(state.clone()), set_request("", "value", None)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));

        let result = set_handler(State(state), set_request("key", "value", Some(0))).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = Config {
            max_entries: 0,
            ..Config::default()
        };
        assert!(AppState::from_config(&config).is_err());

        let state = AppState::from_config(&Config::default()).unwrap();
        assert_eq!(state.cache.capacity(), 40);
        assert_eq!(state.ws_slots.available_permits(), 64);
    }
}
