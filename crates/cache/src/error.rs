//! Cache errors
//!
//! Every variant here is recoverable from the caller's point of view: a
//! cache failure degrades to a store read, it never fails the request
//! (spec.md §4.2, §9).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("integrity check failed for key {0}")]
    IntegrityFailed(String),
}
