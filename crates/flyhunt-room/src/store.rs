//! In-memory room store and connection registry.
//!
//! The store owns every live [`Room`], keyed by code, plus the reverse
//! index from connection handle to room code. Both maps are mutated
//! only by the [`Lobby`](crate::Lobby) (and the reaper through it), on
//! one logical thread, so they can never disagree for longer than a
//! single event's handling.

use std::collections::HashMap;
use std::time::Duration;

use flyhunt_protocol::{ClientId, RoomCode};

use crate::Room;

/// All live rooms, with an index from connection to room.
///
/// An owned instance, not process-global: tests build as many
/// independent stores as they like.
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: HashMap<RoomCode, Room>,
    /// Registry: which room is this connection in? Kept in lockstep
    /// with room membership via [`link`](Self::link) /
    /// [`unlink`](Self::unlink).
    index: HashMap<ClientId, RoomCode>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    /// Stores a room and registers its current occupants.
    pub fn insert(&mut self, room: Room) {
        for id in room.client_ids() {
            self.index.insert(id, room.code().clone());
        }
        self.rooms.insert(room.code().clone(), room);
    }

    pub fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn get_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// Deletes a room and purges every registry entry pointing at it.
    pub fn remove(&mut self, code: &RoomCode) -> Option<Room> {
        let room = self.rooms.remove(code)?;
        self.index.retain(|_, c| c != code);
        Some(room)
    }

    /// Registers a connection as belonging to a room. Paired with
    /// [`Room::add_player`] by the caller.
    pub fn link(&mut self, id: ClientId, code: RoomCode) {
        self.index.insert(id, code);
    }

    /// Drops a connection's registry entry. Paired with
    /// [`Room::remove_player`] by the caller.
    pub fn unlink(&mut self, id: ClientId) {
        self.index.remove(&id);
    }

    /// The code of the room this connection is in, if any.
    pub fn code_for(&self, id: ClientId) -> Option<&RoomCode> {
        self.index.get(&id)
    }

    /// Resolves a connection straight to its room.
    pub fn room_for(&self, id: ClientId) -> Option<&Room> {
        self.rooms.get(self.index.get(&id)?)
    }

    /// Mutable variant of [`room_for`](Self::room_for).
    pub fn room_for_mut(&mut self, id: ClientId) -> Option<&mut Room> {
        let code = self.index.get(&id)?.clone();
        self.rooms.get_mut(&code)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Codes of every room older than `ttl`, regardless of status.
    pub fn expired(&self, ttl: Duration) -> Vec<RoomCode> {
        self.rooms
            .values()
            .filter(|room| room.age() > ttl)
            .map(|room| room.code().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;

    fn sample_room(code: &str, host: u64) -> Room {
        Room::new(
            RoomCode::normalize(code),
            Player::new(ClientId(host), "host", "Player 1"),
        )
    }

    #[test]
    fn test_insert_registers_occupants() {
        let mut store = RoomStore::new();
        store.insert(sample_room("AB3X", 1));

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.code_for(ClientId(1)),
            Some(&RoomCode::normalize("AB3X"))
        );
        assert!(store.room_for(ClientId(1)).is_some());
    }

    #[test]
    fn test_lookup_is_case_insensitive_via_normalization() {
        let mut store = RoomStore::new();
        store.insert(sample_room("AB3X", 1));

        // Lowercase user input normalizes to the stored key.
        assert!(store.get(&RoomCode::normalize("ab3x")).is_some());
        assert!(store.get(&RoomCode::normalize("ZZZZ")).is_none());
    }

    #[test]
    fn test_remove_purges_registry_entries() {
        let mut store = RoomStore::new();
        store.insert(sample_room("AB3X", 1));
        store.link(ClientId(2), RoomCode::normalize("AB3X"));

        let removed = store.remove(&RoomCode::normalize("AB3X"));

        assert!(removed.is_some());
        assert!(store.code_for(ClientId(1)).is_none());
        assert!(store.code_for(ClientId(2)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_unknown_code_returns_none() {
        let mut store = RoomStore::new();
        assert!(store.remove(&RoomCode::normalize("QQQQ")).is_none());
    }

    #[test]
    fn test_unlink_only_drops_the_one_connection() {
        let mut store = RoomStore::new();
        store.insert(sample_room("AB3X", 1));
        store.link(ClientId(2), RoomCode::normalize("AB3X"));

        store.unlink(ClientId(2));

        assert!(store.code_for(ClientId(2)).is_none());
        assert!(store.code_for(ClientId(1)).is_some());
    }

    #[test]
    fn test_room_for_mut_resolves_through_the_index() {
        let mut store = RoomStore::new();
        store.insert(sample_room("AB3X", 1));

        let room = store.room_for_mut(ClientId(1)).expect("host is indexed");
        room.level_number = 9;

        assert_eq!(
            store.get(&RoomCode::normalize("AB3X")).unwrap().level_number,
            9
        );
    }

    #[test]
    fn test_expired_respects_the_ttl() {
        let mut store = RoomStore::new();
        store.insert(sample_room("AB3X", 1));
        store.insert(sample_room("CD5Y", 2));

        // A generous TTL keeps everything; a zero TTL condemns it all.
        assert!(store.expired(Duration::from_secs(3600)).is_empty());
        assert_eq!(store.expired(Duration::ZERO).len(), 2);
    }
}
