//! Snapshot event bus that fans cache snapshots out to WebSocket clients.
//!
//! Each connected client holds one receiver; dropping it on disconnect is
//! all the deregistration there is.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::models::SnapshotMessage;

/// Buffered snapshots per subscriber before the slowest one starts lagging.
pub const SNAPSHOT_BUFFER: usize = 16;

/// Broadcast-based bus for cache snapshots.
#[derive(Clone)]
pub struct SnapshotBus {
    tx: broadcast::Sender<Arc<SnapshotMessage>>,
}

impl SnapshotBus {
    /// Create a new bus buffering up to `capacity` snapshots per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Send a snapshot to all subscribers, returning how many received it.
    /// Silently drops if no subscribers.
    pub fn publish(&self, snapshot: SnapshotMessage) -> usize {
        self.tx.send(Arc::new(snapshot)).unwrap_or(0)
    }

    /// Subscribe to the snapshot stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<SnapshotMessage>> {
        self.tx.subscribe()
    }

    /// Get the current number of connected subscribers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SnapshotBus {
    fn default() -> Self {
        Self::new(SNAPSHOT_BUFFER)
    }
}
