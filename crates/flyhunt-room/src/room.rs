//! The room entity: one match session between up to two players.

use std::fmt;
use std::time::{Duration, Instant};

use flyhunt_protocol::{ClientId, PlayerEntry, ResultEntry, RoomCode};

use crate::Player;

/// Hard player cap per room. The whole protocol is two-player.
pub const ROOM_CAPACITY: usize = 2;

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// ```text
/// Waiting → Playing → Finished
///    ↑_________|_________|     (rematch, or a player leaving)
/// ```
///
/// Destruction is reachable from any state: the last player leaving, or
/// the reaper finding the room past its TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    /// Accepting a second player and collecting ready flags.
    Waiting,
    /// A round is in progress.
    Playing,
    /// Both players finished; results have been sent.
    Finished,
}

impl RoomStatus {
    /// Whether the room is accepting joins.
    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Whether gameplay events are currently accepted.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Playing => write!(f, "playing"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// One match session.
///
/// Players are kept in insertion order; host migration picks the first
/// remaining entry, which reproduces the original first-map-entry rule.
#[derive(Debug)]
pub struct Room {
    code: RoomCode,
    /// The creator, or the successor after a migration. Display only —
    /// the host has no extra protocol authority.
    pub host: ClientId,
    players: Vec<Player>,
    /// Level picked for the current round. Meaningful once Playing.
    pub level_number: u8,
    pub status: RoomStatus,
    created_at: Instant,
}

impl Room {
    /// Creates a waiting room with `host` as its only occupant.
    pub fn new(code: RoomCode, host: Player) -> Self {
        Self {
            code,
            host: host.id,
            players: vec![host],
            level_number: 1,
            status: RoomStatus::Waiting,
            created_at: Instant::now(),
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Time since creation. The reaper's only input.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= ROOM_CAPACITY
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn player(&self, id: ClientId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: ClientId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Appends a player. Callers check capacity first; the cap is a
    /// store-level rule, not silently enforced here.
    pub fn add_player(&mut self, player: Player) {
        debug_assert!(self.players.len() < ROOM_CAPACITY);
        self.players.push(player);
    }

    /// Removes and returns the player, preserving insertion order of
    /// the rest.
    pub fn remove_player(&mut self, id: ClientId) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(index))
    }

    /// The earliest-joined remaining player (host migration target).
    pub fn first_player(&self) -> Option<&Player> {
        self.players.first()
    }

    /// Connection handles of every occupant.
    pub fn client_ids(&self) -> Vec<ClientId> {
        self.players.iter().map(|p| p.id).collect()
    }

    /// Connection handles of every occupant except `excluded`.
    pub fn client_ids_except(&self, excluded: ClientId) -> Vec<ClientId> {
        self.players
            .iter()
            .map(|p| p.id)
            .filter(|id| *id != excluded)
            .collect()
    }

    pub fn all_ready(&self) -> bool {
        self.players.iter().all(|p| p.ready)
    }

    pub fn all_finished(&self) -> bool {
        self.players.iter().all(|p| p.finished)
    }

    /// Zeroes every player's round figures (ready flags untouched).
    pub fn reset_rounds(&mut self) {
        for p in &mut self.players {
            p.reset_round();
        }
    }

    /// Full rematch reset: round figures and ready flags.
    pub fn reset_for_rematch(&mut self) {
        for p in &mut self.players {
            p.reset_round();
            p.ready = false;
        }
    }

    /// The player list as sent on the wire, host flag derived.
    pub fn entries(&self) -> Vec<PlayerEntry> {
        self.players.iter().map(|p| p.entry(self.host)).collect()
    }

    /// The final scoreboard for `game-over`.
    pub fn results(&self) -> Vec<ResultEntry> {
        self.players
            .iter()
            .map(|p| ResultEntry {
                name: p.name.clone(),
                score: p.score,
                found_count: p.found_count,
                misclicks: p.misclicks,
                is_host: p.id == self.host,
            })
            .collect()
    }
}
