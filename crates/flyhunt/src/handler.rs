//! Per-connection handler: decode frames, run them through the lobby,
//! deliver the resulting instructions.
//!
//! One task per connection. Events from a single client are processed
//! in arrival order because this loop is the only reader of its
//! socket; cross-client ordering is whatever the lobby's status gates
//! make of it.

use std::sync::Arc;

use flyhunt_protocol::{ClientEvent, Codec};
use flyhunt_room::Outbound;
use flyhunt_transport::Connection;

use crate::server::ServerState;

/// Drives a single connection from accept to close.
///
/// Intentionally infallible: every failure path ends the loop, and the
/// tail of the function runs the disconnect through the lobby exactly
/// like an explicit leave-room.
pub(crate) async fn handle_connection(
    conn: flyhunt_transport::WebSocketConnection,
    state: Arc<ServerState>,
) {
    let id = conn.id();
    tracing::info!(%id, "client connected");

    let conn = Arc::new(conn);
    state.peers.lock().await.insert(id, Arc::clone(&conn));

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%id, "client disconnected");
                break;
            }
            Err(e) => {
                tracing::debug!(%id, error = %e, "recv failed, dropping client");
                break;
            }
        };

        // Malformed frames are dropped, never answered: the protocol
        // has no bad-request signal.
        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%id, error = %e, "ignoring malformed frame");
                continue;
            }
        };

        // The lock scope is one event, start to finish. Instructions
        // are delivered after release; sends are queued writes anyway.
        let instructions = state.lobby.lock().await.handle(id, event);
        dispatch(&state, instructions).await;
    }

    // Connection loss takes the same lifecycle path as leave-room.
    let instructions = state.lobby.lock().await.disconnect(id);
    dispatch(&state, instructions).await;
    state.peers.lock().await.remove(&id);
}

/// Delivers outbound instructions to their audiences. Fire-and-forget:
/// a recipient that vanished mid-flight is logged and skipped.
async fn dispatch(state: &ServerState, instructions: Vec<Outbound>) {
    if instructions.is_empty() {
        return;
    }

    let peers = state.peers.lock().await;
    for Outbound { to, event } in instructions {
        let bytes = match state.codec.encode(&event) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode outbound event");
                continue;
            }
        };

        for client in to.as_slice() {
            match peers.get(client) {
                Some(conn) => {
                    if conn.send(&bytes).is_err() {
                        tracing::debug!(%client, "dropped send to closed connection");
                    }
                }
                None => {
                    tracing::debug!(%client, "no live connection for recipient");
                }
            }
        }
    }
}
