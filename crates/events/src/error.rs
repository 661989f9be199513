//! Event bus errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
