//! # Flyhunt
//!
//! Authoritative match relay for a two-player hidden-object browser
//! game: ephemeral code-joined rooms, a ready handshake, gameplay
//! event relay between the two clients, derived results, and TTL-based
//! cleanup of abandoned rooms.
//!
//! The room state machine lives in [`flyhunt_room`]; this crate wires
//! it to the WebSocket transport and runs it:
//!
//! ```text
//! client frame → Codec::decode → Lobby::handle → (Audience, event)*
//!                                                      ↓
//!                              per-connection writer queues ← encode
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use flyhunt::ServerBuilder;
//!
//! # async fn run() -> Result<(), flyhunt::ServerError> {
//! let server = ServerBuilder::new()
//!     .bind("0.0.0.0:3001")
//!     .health_bind("0.0.0.0:3002")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod health;
mod server;

pub use error::ServerError;
pub use server::{Server, ServerBuilder};
