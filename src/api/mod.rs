//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `POST /cache` - Store a key-value pair
//! - `GET /cache` - List live entries, most recently used first
//! - `GET /cache/:key` - Retrieve an entry by key
//! - `DELETE /cache/:key` - Delete a key
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint
//! - `GET /ws` - WebSocket stream of cache snapshots

pub mod events;
pub mod handlers;
pub mod routes;
pub mod ws;

pub use events::SnapshotBus;
pub use handlers::*;
pub use routes::create_router;
pub use ws::ws_handler;
