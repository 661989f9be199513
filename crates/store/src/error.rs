//! Store errors
//!
//! Postgres unique-violation (SQLSTATE 23505) is the mechanism the wallet
//! engine relies on to catch concurrent duplicate `transaction_id` inserts
//! at commit time (spec.md §4.1/§4.3 step 6).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unique constraint violation on {0}")]
    UniqueViolation(String),

    #[error("row not found")]
    NotFound,

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("pii cipher error: {0}")]
    Pii(#[from] crate::pii::PiiError),
}

impl StoreError {
    /// True if this is a Postgres unique-violation (SQLSTATE 23505),
    /// the signal the wallet engine treats as a concurrent duplicate.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StoreError::UniqueViolation(_) => true,
            StoreError::Database(sqlx::Error::Database(db_err)) => {
                db_err.code().as_deref() == Some("23505")
            }
            _ => false,
        }
    }
}

/// Classify a raw sqlx error, turning a unique-violation into the
/// dedicated variant so callers can `matches!` on it directly.
pub fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return StoreError::UniqueViolation(db_err.message().to_string());
        }
    }
    StoreError::Database(err)
}
