//! Per-player state inside a room.

use flyhunt_protocol::{ClientId, PlayerEntry};

/// One connected participant in a room.
///
/// The connection handle is the identity — there is nothing behind it.
/// All gameplay figures are client-reported and stored verbatim; the
/// server relays, it does not recompute.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: ClientId,
    pub name: String,
    pub ready: bool,
    pub found_count: u32,
    pub score: i32,
    pub misclicks: u32,
    pub finished: bool,
}

impl Player {
    /// Creates a player, falling back to `default_name` when the
    /// requested name is blank.
    pub fn new(id: ClientId, name: &str, default_name: &str) -> Self {
        let name = name.trim();
        Self {
            id,
            name: if name.is_empty() {
                default_name.to_string()
            } else {
                name.to_string()
            },
            ready: false,
            found_count: 0,
            score: 0,
            misclicks: 0,
            finished: false,
        }
    }

    /// Zeroes the per-round figures.
    ///
    /// The ready flag is left alone on purpose: game start keeps it
    /// (both flags are true at that instant), rematch clears it
    /// separately.
    pub fn reset_round(&mut self) {
        self.found_count = 0;
        self.score = 0;
        self.misclicks = 0;
        self.finished = false;
    }

    /// The wire representation, with `is_host` derived against `host`.
    pub fn entry(&self, host: ClientId) -> PlayerEntry {
        PlayerEntry {
            id: self.id,
            name: self.name.clone(),
            ready: self.ready,
            found_count: self.found_count,
            score: self.score,
            misclicks: self.misclicks,
            finished: self.finished,
            is_host: self.id == host,
        }
    }
}
