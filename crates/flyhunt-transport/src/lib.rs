//! Transport abstraction layer for Flyhunt.
//!
//! The core is written against the [`Transport`] and [`Connection`]
//! traits, not against any concrete network stack. Connection loss is
//! itself an event ([`Connection::recv`] returning `Ok(None)`), which
//! the server feeds through the same path as an explicit leave.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use flyhunt_protocol::ClientId;

/// Accepts new incoming connections.
pub trait Transport: Send + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;
}

/// A single bidirectional event channel to one client.
///
/// Sends are fire-and-forget: [`send`](Self::send) queues the frame and
/// returns immediately, so relaying to a peer that is itself blocked
/// waiting for input can never stall the caller. No acknowledgement is
/// awaited anywhere.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Queues data for delivery to the remote peer.
    fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Receives the next message from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Asks the peer to close. Best-effort; queued like any send.
    fn close(&self);

    /// The unique identifier for this connection.
    fn id(&self) -> ClientId;
}
