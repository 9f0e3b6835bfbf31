//! Wire types for the Flyhunt match relay.
//!
//! Everything a client and the server exchange is defined here: the
//! inbound [`ClientEvent`]s, the outbound [`ServerEvent`]s, and the
//! player list entries both sides render. Events serialize as
//! `{"event": "<kebab-case name>", "data": <payload>}` with camelCase
//! payload fields, which is the vocabulary the browser client speaks.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A connected client, identified by its live connection.
///
/// The transport assigns one per accepted connection; the same value
/// doubles as the player's identity for as long as they sit in a room.
/// There is no account or session behind it — when the connection dies,
/// the identity dies with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

/// A human-shareable room code: 4 characters, stored uppercase.
///
/// Codes are compared case-insensitively by normalizing on the way in,
/// so `ab3x` typed on a phone finds the room advertised as `AB3X`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Builds a code from raw user input: trims and uppercases.
    pub fn normalize(input: &str) -> Self {
        Self(input.trim().to_ascii_uppercase())
    }

    /// The canonical (uppercase) form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Audience — who receives an outbound event?
// ---------------------------------------------------------------------------

/// The resolved recipients of one outbound [`ServerEvent`].
///
/// The lobby resolves room membership at emit time, so the dispatch
/// layer only ever sees concrete connection ids — it needs no room
/// knowledge of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Exactly one connection (usually the requester).
    One(ClientId),

    /// A resolved set: a whole room, or a room minus the sender.
    Set(Vec<ClientId>),
}

impl Audience {
    /// The recipients as a slice, regardless of variant.
    pub fn as_slice(&self) -> &[ClientId] {
        match self {
            Self::One(id) => std::slice::from_ref(id),
            Self::Set(ids) => ids,
        }
    }

    /// Whether `id` is among the recipients.
    pub fn contains(&self, id: ClientId) -> bool {
        self.as_slice().contains(&id)
    }
}

// ---------------------------------------------------------------------------
// Player list entries
// ---------------------------------------------------------------------------

/// One row of the player list sent with every lobby-level event.
///
/// `is_host` is derived per emission (id == room host), never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEntry {
    pub id: ClientId,
    pub name: String,
    pub ready: bool,
    pub found_count: u32,
    pub score: i32,
    pub misclicks: u32,
    pub finished: bool,
    pub is_host: bool,
}

/// One row of the final scoreboard in `game-over`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub name: String,
    pub score: i32,
    pub found_count: u32,
    pub misclicks: u32,
    pub is_host: bool,
}

// ---------------------------------------------------------------------------
// Inbound events (client → server)
// ---------------------------------------------------------------------------

/// Everything a client can ask the server to do.
///
/// Scores, found counts, and misclicks are reported by the client and
/// relayed verbatim — the server is a relay, not a scoring authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    /// Open a new room; payload is the requested display name.
    CreateRoom(String),

    /// Join an existing room by code.
    JoinRoom { room_id: String, player_name: String },

    /// Flip the sender's ready flag.
    ToggleReady,

    /// The sender found an object; running score and count.
    FlyFound { score: i32, found_count: u32 },

    /// The sender clicked empty space; running misclick total.
    PlayerMiss { misclicks: u32 },

    /// The sender's round is over, with their final figures.
    PlayerFinished {
        won: bool,
        score: i32,
        found_count: u32,
        misclicks: u32,
    },

    /// Back to the lobby for another round.
    RequestRematch,

    /// Leave the current room.
    LeaveRoom,
}

// ---------------------------------------------------------------------------
// Outbound events (server → client)
// ---------------------------------------------------------------------------

/// Everything the server tells clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// To the creator: your room exists, here is its code.
    RoomCreated {
        room_id: RoomCode,
        players: Vec<PlayerEntry>,
    },

    /// To the joiner: you are in.
    RoomJoined {
        room_id: RoomCode,
        players: Vec<PlayerEntry>,
    },

    /// To a failed joiner only; never broadcast.
    JoinError(String),

    /// To the existing occupant: someone arrived.
    PlayerJoined { players: Vec<PlayerEntry> },

    /// Whole room: a ready flag changed.
    PlayersUpdated { players: Vec<PlayerEntry> },

    /// Whole room: both ready — play this level.
    GameStart { level_number: u8 },

    /// Room minus sender: the opponent's running score.
    OpponentUpdate {
        player_id: ClientId,
        player_name: String,
        score: i32,
        found_count: u32,
    },

    /// Room minus sender: the opponent is done.
    OpponentFinished {
        player_name: String,
        won: bool,
        score: i32,
        found_count: u32,
    },

    /// Whole room: both done, final scoreboard.
    GameOver { results: Vec<ResultEntry> },

    /// Whole room: reset to the lobby for another round.
    Rematch { players: Vec<PlayerEntry> },

    /// Remaining occupants: someone left (and who is in the room now).
    PlayerLeft {
        player_name: String,
        players: Vec<PlayerEntry>,
    },
}

// =========================================================================
// Tests
// =========================================================================
