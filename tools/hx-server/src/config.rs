//! Server configuration — env vars only, read once at start-up.

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub port: u16,
    /// How long a disconnected seat has to rejoin before the match is
    /// forfeited to the remaining seat.
    pub reconnect_window: Duration,
    /// How long a match may sit with no commands from either seat before
    /// it is closed with `reason=timeout`.
    pub idle_timeout: Duration,
    /// How long the active seat has during `Main` before the server issues
    /// an automatic `end_turn` on their behalf. Defaults large enough that
    /// it never fires in ordinary play.
    pub per_turn_timeout: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_u16("PORT", 3031),
            reconnect_window: Duration::from_secs(env_u64("RECONNECT_WINDOW_SECS", 30)),
            idle_timeout: Duration::from_secs(env_u64("IDLE_TIMEOUT_SECS", 1800)),
            per_turn_timeout: Duration::from_secs(env_u64("PER_TURN_TIMEOUT_SECS", 600)),
        }
    }
}

fn env_u16(key: &str, default: u16) -> u16 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
