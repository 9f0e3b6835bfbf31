//! Wire protocol for the Flyhunt match relay.
//!
//! This crate defines the language clients and server speak:
//!
//! - [`ClientEvent`] — everything a client can send
//! - [`ServerEvent`] — everything the server emits
//! - [`PlayerEntry`] / [`ResultEntry`] — the player list rows carried
//!   by lobby and results events
//! - [`Audience`] — who an outbound event is addressed to
//! - [`Codec`] / [`JsonCodec`] — byte-level encoding
//!
//! It knows nothing about connections or rooms — only shapes on the
//! wire and how to serialize them.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Audience, ClientEvent, ClientId, PlayerEntry, ResultEntry, RoomCode,
    ServerEvent,
};
