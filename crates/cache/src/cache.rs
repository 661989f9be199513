//! Two-tier cache orchestrator (spec.md §4.2)
//!
//! Reads consult L1 then L2; an L2 hit back-fills L1 with a shortened TTL.
//! Writers never update the cache in place — a mutation invalidates (see
//! `invalidate`), relying on next-read back-fill to avoid stale-write races.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use redis::aio::ConnectionManager;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tracing::warn;

use crate::error::CacheError;
use crate::integrity::IntegrityGuard;
use crate::key::{backfill_ttl, lock_key, wallet_key, ResourceKind, WALLET_UPDATES_CHANNEL};
use crate::l1::L1Cache;
use crate::l2::L2Cache;

const LOCK_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WalletPayload {
    balance: Decimal,
    currency: String,
    tag: String,
}

#[derive(Debug, Clone)]
pub struct CachedWallet {
    pub balance: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WalletUpdatedEvent {
    event: String,
    player_id: String,
    timestamp: chrono::DateTime<chrono::Utc>,
}

pub struct Cache {
    l1: L1Cache,
    l2: L2Cache,
    integrity: IntegrityGuard,
    redis_url: String,
}

impl Cache {
    pub async fn connect(redis_url: &str, hmac_key: impl Into<Vec<u8>>, l1_capacity: usize) -> Result<Self, CacheError> {
        let l2 = L2Cache::connect(redis_url).await?;
        Ok(Self {
            l1: L1Cache::with_capacity(l1_capacity),
            l2,
            integrity: IntegrityGuard::new(hmac_key),
            redis_url: redis_url.to_string(),
        })
    }

    pub fn from_connection_manager(
        conn: ConnectionManager,
        redis_url: &str,
        hmac_key: impl Into<Vec<u8>>,
        l1_capacity: usize,
    ) -> Self {
        Self {
            l1: L1Cache::with_capacity(l1_capacity),
            l2: L2Cache::from_connection_manager(conn),
            integrity: IntegrityGuard::new(hmac_key),
            redis_url: redis_url.to_string(),
        }
    }

    // === Wallet balance, with HMAC integrity ===

    /// Returns `Some((wallet, true))` on a verified L1 hit, `Some((wallet,
    /// false))` on a verified L2 hit (which also back-fills L1), and `None`
    /// on a miss or a failed integrity check (spec.md §4.2, §4.3.balance).
    pub async fn get_wallet(&self, player_id: &str) -> Option<(CachedWallet, bool)> {
        let key = wallet_key(player_id);

        if let Some(raw) = self.l1.get(&key) {
            if let Some(wallet) = self.decode_wallet(player_id, &key, &raw).await {
                return Some((wallet, true));
            }
        }

        match self.l2.get(&key).await {
            Ok(Some(raw)) => {
                if let Some(wallet) = self.decode_wallet(player_id, &key, &raw).await {
                    self.l1.put(key, raw, backfill_ttl(ResourceKind::Wallet.ttl()));
                    return Some((wallet, false));
                }
                None
            }
            Ok(None) => None,
            Err(err) => {
                warn!(player_id, error = %err, "L2 read failed, treating as cache miss");
                None
            }
        }
    }

    async fn decode_wallet(&self, player_id: &str, key: &str, raw: &str) -> Option<CachedWallet> {
        let payload: WalletPayload = match serde_json::from_str(raw) {
            Ok(p) => p,
            Err(_) => {
                self.invalidate_wallet(player_id).await;
                return None;
            }
        };

        if !self.integrity.verify(player_id, payload.balance, &payload.tag) {
            warn!(player_id, key, "cache integrity check failed, evicting");
            self.invalidate_wallet(player_id).await;
            return None;
        }

        Some(CachedWallet {
            balance: payload.balance,
            currency: payload.currency,
        })
    }

    /// Write the wallet balance into both tiers, tagged with an HMAC.
    /// Rarely called directly on the mutation path (mutations invalidate
    /// instead); used by `balance()` to populate the cache after a store
    /// read. Takes the coalescing lock first; if another writer holds it,
    /// invalidates instead of risking a stale overwrite.
    pub async fn put_wallet(&self, player_id: &str, balance: Decimal, currency: &str) {
        let key = wallet_key(player_id);
        let lock = lock_key(&key);

        match self.l2.try_lock(&lock, LOCK_TTL).await {
            Ok(true) => {}
            Ok(false) => {
                self.invalidate_wallet(player_id).await;
                return;
            }
            Err(err) => {
                warn!(player_id, error = %err, "cache lock acquisition failed, skipping write");
                return;
            }
        }

        let tag = self.integrity.tag(player_id, balance);
        let payload = WalletPayload {
            balance,
            currency: currency.to_string(),
            tag,
        };
        let raw = match serde_json::to_string(&payload) {
            Ok(s) => s,
            Err(_) => return,
        };

        let ttl = ResourceKind::Wallet.ttl();
        self.l1.put(key.clone(), raw.clone(), ttl);
        if let Err(err) = self.l2.set(&key, &raw, ttl).await {
            warn!(player_id, error = %err, "L2 wallet write failed");
        }
    }

    /// Invalidate the cached wallet: delete from both tiers. The mutation
    /// path calls this instead of `put_wallet` after every debit/credit/
    /// cancel commit (spec.md §4.2 invalidation policy).
    pub async fn invalidate_wallet(&self, player_id: &str) {
        let key = wallet_key(player_id);
        self.l1.remove(&key);
        if let Err(err) = self.l2.delete(&key).await {
            warn!(player_id, error = %err, "L2 wallet invalidation failed");
        }
    }

    /// Best-effort publish of `wallet_updated` on the shared channel so
    /// other instances can drop their own L1 entry. Failure never fails
    /// the caller (spec.md §4.2, §9).
    pub async fn publish_wallet_updated(&self, player_id: &str) {
        let event = WalletUpdatedEvent {
            event: "wallet_updated".to_string(),
            player_id: player_id.to_string(),
            timestamp: chrono::Utc::now(),
        };
        let payload = match serde_json::to_string(&event) {
            Ok(p) => p,
            Err(_) => return,
        };
        if let Err(err) = self.l2.publish(WALLET_UPDATES_CHANNEL, &payload).await {
            warn!(player_id, error = %err, "wallet_updates publish failed");
        }
    }

    // === Generic JSON entries (session, game_state, game lists, etc.) ===

    pub async fn get_json(&self, key: &str, kind: ResourceKind) -> Option<Json> {
        if let Some(raw) = self.l1.get(key) {
            if let Ok(value) = serde_json::from_str(&raw) {
                return Some(value);
            }
        }

        match self.l2.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Json>(&raw) {
                Ok(value) => {
                    self.l1.put(key.to_string(), raw, backfill_ttl(kind.ttl()));
                    Some(value)
                }
                Err(_) => None,
            },
            Ok(None) => None,
            Err(err) => {
                warn!(key, error = %err, "L2 read failed, treating as cache miss");
                None
            }
        }
    }

    pub async fn put_json(&self, key: &str, value: &Json, kind: ResourceKind) {
        let raw = match serde_json::to_string(value) {
            Ok(s) => s,
            Err(_) => return,
        };
        let ttl = kind.ttl();
        self.l1.put(key.to_string(), raw.clone(), ttl);
        if let Err(err) = self.l2.set(key, &raw, ttl).await {
            warn!(key, error = %err, "L2 write failed");
        }
    }

    pub async fn invalidate(&self, key: &str) {
        self.l1.remove(key);
        if let Err(err) = self.l2.delete(key).await {
            warn!(key, error = %err, "L2 invalidation failed");
        }
    }

    /// Spawn a background task that subscribes to `wallet_updates` and
    /// drops the corresponding L1 entry on every message, so other
    /// processes' mutations don't leave this instance holding a stale
    /// entry past its own TTL.
    pub fn spawn_invalidation_listener(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let cache = Arc::clone(self);
        let redis_url = cache.redis_url.clone();

        tokio::spawn(async move {
            loop {
                match run_invalidation_listener(&cache, &redis_url).await {
                    Ok(()) => break,
                    Err(err) => {
                        warn!(error = %err, "wallet_updates subscription dropped, retrying in 2s");
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                }
            }
        })
    }
}

async fn run_invalidation_listener(cache: &Arc<Cache>, redis_url: &str) -> Result<(), CacheError> {
    let client = redis::Client::open(redis_url)?;
    let mut pubsub = client.get_async_pubsub().await?;
    pubsub.subscribe(WALLET_UPDATES_CHANNEL).await?;

    let mut stream = pubsub.on_message();
    while let Some(msg) = stream.next().await {
        let payload: String = match msg.get_payload() {
            Ok(p) => p,
            Err(_) => continue,
        };
        if let Ok(event) = serde_json::from_str::<WalletUpdatedEvent>(&payload) {
            cache.l1.remove(&wallet_key(&event.player_id));
        }
    }
    Ok(())
}
