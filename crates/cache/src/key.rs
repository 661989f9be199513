//! Keying scheme and resource-typed TTLs (spec.md §4.2)

use std::time::Duration;

/// Resource kind a cache key belongs to, used to pick its TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Wallet,
    Player,
    GameList,
    GameState,
    Default,
}

impl ResourceKind {
    pub fn ttl(self) -> Duration {
        match self {
            ResourceKind::Wallet => Duration::from_secs(60),
            ResourceKind::Player => Duration::from_secs(600),
            ResourceKind::GameList => Duration::from_secs(1800),
            ResourceKind::GameState => Duration::from_secs(30),
            ResourceKind::Default => Duration::from_secs(300),
        }
    }
}

/// L2-hit back-fill TTL is capped at 60s regardless of the resource's own
/// TTL, so a long-lived L2 entry never pins a stale L1 copy for long.
pub fn backfill_ttl(original: Duration) -> Duration {
    original.min(Duration::from_secs(60))
}

pub fn wallet_key(player_id: &str) -> String {
    format!("wallet:{player_id}")
}

pub fn session_key(player_id: &str) -> String {
    format!("session:{player_id}")
}

pub fn game_state_key(game_id: &str) -> String {
    format!("game_state:{game_id}")
}

pub fn lock_key(key: &str) -> String {
    format!("lock:{key}")
}

pub const WALLET_UPDATES_CHANNEL: &str = "wallet_updates";
