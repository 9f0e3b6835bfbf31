//! Room lifecycle management for the Flyhunt match relay.
//!
//! This is the authoritative core: everything with an invariant lives
//! here, and none of it touches a socket.
//!
//! # Key types
//!
//! - [`Lobby`] — the event state machine; one call per client event,
//!   returning the outbound instructions to deliver
//! - [`RoomStore`] — live rooms keyed by code, plus the
//!   connection-to-room registry
//! - [`Room`] / [`Player`] — the entity model
//! - [`JoinError`] — the only client-visible error taxonomy
//! - [`reaper`] — TTL-based background collection of stale rooms
//!
//! All mutation runs on one logical thread: the server wraps the lobby
//! in a single mutex shared with the reaper, events run to completion,
//! and no further locking exists anywhere in this crate.

pub mod code;
mod error;
mod lobby;
mod player;
pub mod reaper;
mod room;
mod store;

pub use error::JoinError;
pub use lobby::{CAMPAIGN_LEVELS, Lobby, Outbound};
pub use player::Player;
pub use reaper::ReaperConfig;
pub use room::{ROOM_CAPACITY, Room, RoomStatus};
pub use store::RoomStore;
