//! Background sweep that deletes rooms past their TTL.
//!
//! A blunt age-based collector, not an activity timer: a room with a
//! match still running is reaped the moment it is old enough. Nobody
//! is notified — abandoned clients discover the loss through their
//! next failed operation or their own connection dropping.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::Lobby;

/// Sweep cadence and room lifetime.
#[derive(Debug, Clone)]
pub struct ReaperConfig {
    /// How often to scan the store.
    pub sweep_interval: Duration,
    /// Maximum room age; anything older goes, whatever its status.
    pub room_ttl: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(60),
            room_ttl: Duration::from_secs(30 * 60),
        }
    }
}

/// Spawns the sweep task. It shares the lobby mutex with request
/// handling, so a sweep and an event never interleave — whichever
/// locks first wins, and a reaped room simply looks not-found to the
/// loser.
pub fn spawn(config: ReaperConfig, lobby: Arc<Mutex<Lobby>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.sweep_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // interval's first tick completes immediately; consume it so
        // the first real sweep happens one full interval in.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let reaped = lobby.lock().await.reap_stale(config.room_ttl);
            if reaped > 0 {
                tracing::info!(reaped, "stale room sweep");
            }
        }
    })
}
