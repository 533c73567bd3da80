//! WebSocket snapshot streaming.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::OwnedSemaphorePermit;
use tracing::{debug, info, warn};

use crate::api::handlers::AppState;
use crate::error::{CacheError, Result};
use crate::models::SnapshotMessage;

/// GET /ws: upgrades to WebSocket and streams cache snapshots as JSON.
///
/// Connections are capped by the semaphore in [`AppState`]; past the cap the
/// handler answers 503 before upgrading.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Result<Response> {
    let permit = state
        .ws_slots
        .clone()
        .try_acquire_owned()
        .map_err(|_| CacheError::Unavailable("Too many WebSocket connections".to_string()))?;

    let snapshots = state.snapshots.subscribe();
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, snapshots, permit)))
}

async fn handle_socket(
    mut socket: WebSocket,
    state: AppState,
    mut snapshots: broadcast::Receiver<Arc<SnapshotMessage>>,
    // Released when the connection ends
    _permit: OwnedSemaphorePermit,
) {
    info!("WebSocket client connected");

    // Send the current state right away instead of waiting for the next tick
    let initial = SnapshotMessage::new(state.cache.get_all());
    if send_snapshot(&mut socket, &initial).await {
        loop {
            tokio::select! {
                snapshot = snapshots.recv() => match snapshot {
                    Ok(snapshot) => {
                        if !send_snapshot(&mut socket, &snapshot).await {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("WebSocket client lagging, skipped {} snapshots", skipped);
                    }
                    Err(RecvError::Closed) => break,
                },
                incoming = socket.recv() => match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {} // Clients have nothing to say
                },
            }
        }
    }

    info!("WebSocket client disconnected");
}

/// Returns `false` once the client can no longer be written to.
async fn send_snapshot(socket: &mut WebSocket, snapshot: &SnapshotMessage) -> bool {
    let json = match serde_json::to_string(snapshot) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize snapshot: {}", e);
            return true;
        }
    };

    match socket.send(Message::Text(json)).await {
        Ok(()) => true,
        Err(e) => {
            debug!("WebSocket send failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    // Upgrades need a real connection; tests/websocket_tests.rs covers them.
    use super::*;
    use tokio::sync::Semaphore;

    #[test]
    fn test_ws_handler_signature() {
        let _: fn(WebSocketUpgrade, State<AppState>) -> _ = |ws, state| ws_handler(ws, state);
    }

    #[test]
    fn test_ws_slots_exhaustion() {
        let slots = Arc::new(Semaphore::new(2));
        let first = slots.clone().try_acquire_owned().unwrap();
        let _second = slots.clone().try_acquire_owned().unwrap();
        assert!(slots.clone().try_acquire_owned().is_err());

        drop(first);
        assert!(slots.clone().try_acquire_owned().is_ok());
    }
}
