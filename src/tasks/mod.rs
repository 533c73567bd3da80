//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Snapshot broadcast: pushes the live cache contents to WebSocket clients

mod broadcast;

pub use broadcast::{broadcast_once, spawn_broadcast_task};
