//! The lobby: the room lifecycle state machine.
//!
//! Every client-initiated event funnels through [`Lobby::handle`],
//! which validates it against the sender's room, mutates room state,
//! and returns the outbound instructions to deliver. The lobby is
//! fully synchronous and owns its [`RoomStore`] — the transport layer
//! above decides how to serialize access (one mutex) and how to
//! deliver the instructions.

use std::ops::RangeInclusive;
use std::time::Duration;

use flyhunt_protocol::{Audience, ClientEvent, ClientId, RoomCode, ServerEvent};
use rand::Rng;

use crate::{JoinError, Player, Room, RoomStatus, RoomStore, code};

/// Levels a match can land on, drawn uniformly at game start.
pub const CAMPAIGN_LEVELS: RangeInclusive<u8> = 1..=32;

/// Name given to a creator who didn't provide one.
const HOST_DEFAULT_NAME: &str = "Player 1";
/// Name given to a joiner who didn't provide one.
const GUEST_DEFAULT_NAME: &str = "Player 2";

/// One outbound instruction: deliver `event` to `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub to: Audience,
    pub event: ServerEvent,
}

impl Outbound {
    fn one(to: ClientId, event: ServerEvent) -> Self {
        Self {
            to: Audience::One(to),
            event,
        }
    }

    fn set(to: Vec<ClientId>, event: ServerEvent) -> Self {
        Self {
            to: Audience::Set(to),
            event,
        }
    }
}

/// The room lifecycle manager.
///
/// Owns the store it operates on; inject a fresh one per test, per
/// server, wherever.
#[derive(Debug, Default)]
pub struct Lobby {
    store: RoomStore,
}

impl Lobby {
    pub fn new() -> Self {
        Self {
            store: RoomStore::new(),
        }
    }

    /// Read access to the underlying store (health probes, tests).
    pub fn store(&self) -> &RoomStore {
        &self.store
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.store.len()
    }

    /// Processes one client event to completion.
    ///
    /// Never panics on odd input: events that reference no room, or
    /// arrive in the wrong status, return an empty instruction list.
    pub fn handle(&mut self, sender: ClientId, event: ClientEvent) -> Vec<Outbound> {
        match event {
            ClientEvent::CreateRoom(name) => self.create_room(sender, &name),
            ClientEvent::JoinRoom {
                room_id,
                player_name,
            } => self.join_room(sender, &room_id, &player_name),
            ClientEvent::ToggleReady => self.toggle_ready(sender),
            ClientEvent::FlyFound { score, found_count } => {
                self.fly_found(sender, score, found_count)
            }
            ClientEvent::PlayerMiss { misclicks } => {
                self.player_miss(sender, misclicks)
            }
            ClientEvent::PlayerFinished {
                won,
                score,
                found_count,
                misclicks,
            } => self.player_finished(sender, won, score, found_count, misclicks),
            ClientEvent::RequestRematch => self.request_rematch(sender),
            ClientEvent::LeaveRoom => self.leave_room(sender),
        }
    }

    /// Transport-level connection loss. Identical to an explicit leave.
    pub fn disconnect(&mut self, sender: ClientId) -> Vec<Outbound> {
        self.leave_room(sender)
    }

    /// Deletes every room older than `ttl`, regardless of status or
    /// occupancy. Occupants are not notified; they find out through
    /// their next failed operation. Returns how many rooms went.
    pub fn reap_stale(&mut self, ttl: Duration) -> usize {
        let expired = self.store.expired(ttl);
        let count = expired.len();
        for code in expired {
            self.store.remove(&code);
            tracing::info!(room = %code, "reaped stale room");
        }
        count
    }

    // -- Event handlers ---------------------------------------------------

    fn create_room(&mut self, sender: ClientId, name: &str) -> Vec<Outbound> {
        // One room per connection; a creator who is already somewhere
        // is misbehaving and gets ignored.
        if self.store.code_for(sender).is_some() {
            tracing::debug!(%sender, "create-room while already in a room, ignoring");
            return Vec::new();
        }

        let code = code::generate_unique(&self.store);
        let host = Player::new(sender, name, HOST_DEFAULT_NAME);
        let room = Room::new(code.clone(), host);

        tracing::info!(room = %code, %sender, "room created");

        let event = ServerEvent::RoomCreated {
            room_id: code,
            players: room.entries(),
        };
        self.store.insert(room);

        vec![Outbound::one(sender, event)]
    }

    fn join_room(
        &mut self,
        sender: ClientId,
        room_id: &str,
        player_name: &str,
    ) -> Vec<Outbound> {
        if self.store.code_for(sender).is_some() {
            tracing::debug!(%sender, "join-room while already in a room, ignoring");
            return Vec::new();
        }

        let code = RoomCode::normalize(room_id);
        match self.try_join(sender, &code, player_name) {
            Ok(out) => out,
            Err(e) => {
                tracing::debug!(room = %code, %sender, error = %e, "join rejected");
                vec![Outbound::one(sender, ServerEvent::JoinError(e.to_string()))]
            }
        }
    }

    fn try_join(
        &mut self,
        sender: ClientId,
        code: &RoomCode,
        player_name: &str,
    ) -> Result<Vec<Outbound>, JoinError> {
        let room = self.store.get_mut(code).ok_or(JoinError::RoomNotFound)?;
        if !room.status.is_waiting() {
            return Err(JoinError::GameInProgress);
        }
        if room.is_full() {
            return Err(JoinError::RoomFull);
        }

        room.add_player(Player::new(sender, player_name, GUEST_DEFAULT_NAME));
        let players = room.entries();
        let others = room.client_ids_except(sender);
        self.store.link(sender, code.clone());

        tracing::info!(room = %code, %sender, "player joined");

        Ok(vec![
            Outbound::one(
                sender,
                ServerEvent::RoomJoined {
                    room_id: code.clone(),
                    players: players.clone(),
                },
            ),
            Outbound::set(others, ServerEvent::PlayerJoined { players }),
        ])
    }

    fn toggle_ready(&mut self, sender: ClientId) -> Vec<Outbound> {
        let Some(room) = self.store.room_for_mut(sender) else {
            return Vec::new();
        };
        let Some(player) = room.player_mut(sender) else {
            return Vec::new();
        };

        player.ready = !player.ready;
        let (name, ready) = (player.name.clone(), player.ready);
        tracing::info!(room = %room.code(), player = %name, ready, "ready toggled");

        let mut out = vec![Outbound::set(
            room.client_ids(),
            ServerEvent::PlayersUpdated {
                players: room.entries(),
            },
        )];

        // The sole admission gate: exactly two players, both ready.
        // Edge-triggered — toggling off and on re-evaluates it.
        if room.is_full() && room.all_ready() {
            let level = rand::rng().random_range(CAMPAIGN_LEVELS);
            room.level_number = level;
            room.status = RoomStatus::Playing;
            room.reset_rounds();

            tracing::info!(room = %room.code(), level, "game starting");
            out.push(Outbound::set(
                room.client_ids(),
                ServerEvent::GameStart {
                    level_number: level,
                },
            ));
        }

        out
    }

    fn fly_found(
        &mut self,
        sender: ClientId,
        score: i32,
        found_count: u32,
    ) -> Vec<Outbound> {
        let Some(room) = self.store.room_for_mut(sender) else {
            return Vec::new();
        };
        if !room.status.is_playing() {
            return Vec::new();
        }
        let Some(player) = room.player_mut(sender) else {
            return Vec::new();
        };

        // Relay, not referee: reported figures overwrite stored state.
        player.score = score;
        player.found_count = found_count;
        let player_name = player.name.clone();

        vec![Outbound::set(
            room.client_ids_except(sender),
            ServerEvent::OpponentUpdate {
                player_id: sender,
                player_name,
                score,
                found_count,
            },
        )]
    }

    fn player_miss(&mut self, sender: ClientId, misclicks: u32) -> Vec<Outbound> {
        let Some(room) = self.store.room_for_mut(sender) else {
            return Vec::new();
        };
        if !room.status.is_playing() {
            return Vec::new();
        }
        if let Some(player) = room.player_mut(sender) {
            // Bookkeeping only; surfaces later in the results list.
            player.misclicks = misclicks;
        }
        Vec::new()
    }

    fn player_finished(
        &mut self,
        sender: ClientId,
        won: bool,
        score: i32,
        found_count: u32,
        misclicks: u32,
    ) -> Vec<Outbound> {
        let Some(room) = self.store.room_for_mut(sender) else {
            return Vec::new();
        };
        if !room.status.is_playing() {
            return Vec::new();
        }
        let Some(player) = room.player_mut(sender) else {
            return Vec::new();
        };

        player.finished = true;
        player.score = score;
        player.found_count = found_count;
        player.misclicks = misclicks;
        let player_name = player.name.clone();

        tracing::info!(
            room = %room.code(),
            player = %player_name,
            won,
            score,
            "player finished"
        );

        let mut out = vec![Outbound::set(
            room.client_ids_except(sender),
            ServerEvent::OpponentFinished {
                player_name,
                won,
                score,
                found_count,
            },
        )];

        // Results are computed exactly once, when the last finisher
        // lands. The status flip keeps a re-sent finish from ever
        // reaching this branch again.
        if room.all_finished() {
            room.status = RoomStatus::Finished;
            tracing::info!(room = %room.code(), "game over");
            out.push(Outbound::set(
                room.client_ids(),
                ServerEvent::GameOver {
                    results: room.results(),
                },
            ));
        }

        out
    }

    fn request_rematch(&mut self, sender: ClientId) -> Vec<Outbound> {
        let Some(room) = self.store.room_for_mut(sender) else {
            return Vec::new();
        };

        room.reset_for_rematch();
        room.status = RoomStatus::Waiting;

        tracing::info!(room = %room.code(), "rematch requested");

        // Back to the lobby: players must re-ready to start again.
        vec![Outbound::set(
            room.client_ids(),
            ServerEvent::Rematch {
                players: room.entries(),
            },
        )]
    }

    fn leave_room(&mut self, sender: ClientId) -> Vec<Outbound> {
        let Some(code) = self.store.code_for(sender).cloned() else {
            return Vec::new();
        };
        self.store.unlink(sender);

        let mut out = Vec::new();
        let mut delete = false;

        if let Some(room) = self.store.get_mut(&code) {
            let player_name = room
                .remove_player(sender)
                .map(|p| p.name)
                .unwrap_or_else(|| "Unknown".to_string());
            tracing::info!(room = %code, player = %player_name, "player left");

            if room.is_empty() {
                delete = true;
            } else {
                if room.host == sender {
                    if let Some(next) = room.first_player() {
                        room.host = next.id;
                        tracing::info!(room = %code, host = %room.host, "host migrated");
                    }
                }
                // A match cannot continue one-player; whatever was in
                // flight is abandoned and the survivor waits again.
                room.status = RoomStatus::Waiting;

                out.push(Outbound::set(
                    room.client_ids(),
                    ServerEvent::PlayerLeft {
                        player_name,
                        players: room.entries(),
                    },
                ));
            }
        }

        if delete {
            self.store.remove(&code);
            tracing::info!(room = %code, "room deleted (empty)");
        }

        out
    }
}
