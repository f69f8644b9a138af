//! The match registry — one entry per live match, keyed by an opaque
//! match id supplied by whatever external lobby/matchmaking layer sits in
//! front of this server.
//!
//! A `Mutex<HashMap<String, MatchHandle>>` plus a watchdog that reaps
//! entries whose actor task has already exited.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use hx_engine::new_match;

use crate::actor::{run_match, ActorMessage};
use crate::config::ServerConfig;

#[derive(Clone)]
pub struct MatchHandle {
    pub sender: mpsc::UnboundedSender<ActorMessage>,
}

#[derive(Default)]
pub struct MatchRegistry {
    matches: Mutex<HashMap<String, MatchHandle>>,
}

impl MatchRegistry {
    /// Return the handle for `match_id`, spawning a fresh match actor (with
    /// freshly shuffled decks, seeded from `seed`) if none exists yet.
    pub async fn get_or_create(
        self: &Arc<Self>,
        match_id: &str,
        seed: u32,
        config: ServerConfig,
    ) -> MatchHandle {
        let mut matches = self.matches.lock().await;
        if let Some(handle) = matches.get(match_id) {
            return handle.clone();
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let state = new_match("p1".into(), "p2".into(), seed);
        tokio::spawn(run_match(state, rx, config));

        let handle = MatchHandle { sender: tx };
        matches.insert(match_id.to_string(), handle.clone());
        tracing::info!(match_id, "spawned new match actor");
        handle
    }

    /// Drop registry entries whose actor task has already exited (game
    /// over, both seats permanently gone). A fallback safety net — the
    /// actor resolving is the normal path, this just reclaims the map
    /// entry.
    pub async fn reap_dead_matches(&self) {
        let mut matches = self.matches.lock().await;
        matches.retain(|match_id, handle| {
            let alive = !handle.sender.is_closed();
            if !alive {
                tracing::info!(match_id, "reaping finished match");
            }
            alive
        });
    }
}
