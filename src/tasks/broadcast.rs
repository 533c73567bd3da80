//! Snapshot Broadcast Task
//!
//! Background task that periodically publishes the live cache contents to
//! every connected WebSocket client.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::api::SnapshotBus;
use crate::cache::Cache;
use crate::models::SnapshotMessage;

/// Spawns a background task that broadcasts a cache snapshot every `period`.
///
/// Ticks with no subscribers are skipped entirely, so an idle server never
/// walks the cache. When a snapshot is taken, expired entries met during the
/// walk are reclaimed as a side effect.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(Cache::new(40)?);
/// let handle = spawn_broadcast_task(cache.clone(), SnapshotBus::default(), Duration::from_secs(1));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_broadcast_task(cache: Arc<Cache>, bus: SnapshotBus, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting snapshot broadcast task with interval of {} ms",
            period.as_millis()
        );

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            broadcast_once(&cache, &bus);
        }
    })
}

/// Publishes one snapshot if anyone is listening.
///
/// Returns the number of subscribers reached.
pub fn broadcast_once(cache: &Cache, bus: &SnapshotBus) -> usize {
    if bus.receiver_count() == 0 {
        return 0;
    }

    let snapshot = SnapshotMessage::new(cache.get_all());
    let entries = snapshot.entries.len();
    let reached = bus.publish(snapshot);
    debug!(
        "Snapshot broadcast: {} entries to {} clients",
        entries, reached
    );
    reached
}
