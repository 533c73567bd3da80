//! LRU Cache Server - An in-memory cache server
//!
//! Bounded LRU cache with per-entry TTL, served over HTTP, with periodic
//! snapshots pushed to WebSocket clients.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::Cache;
pub use config::Config;
pub use error::CacheError;
pub use tasks::spawn_broadcast_task;
