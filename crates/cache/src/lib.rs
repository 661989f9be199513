//! Two-tier cache: in-process LRU (L1) backed by Redis (L2), HMAC-tagged
//! wallet reads, TTL-scoped keys, and pub/sub invalidation (spec.md §4.2).

pub mod cache;
pub mod error;
pub mod integrity;
pub mod key;
pub mod l1;
pub mod l2;

pub use cache::{Cache, CachedWallet};
pub use error::CacheError;
pub use key::{game_state_key, session_key, wallet_key, ResourceKind};
