//! Connection pool wrapper

use std::sync::Arc;

use crate::error::StoreError;
use crate::pii::PiiCipher;
use crate::schema::ensure_schema;
use crate::session::StoreSession;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Owns the shared Postgres connection pool, the at-rest PII cipher, and
/// hands out transactional sessions. Request-scoped services hold only a
/// `&StorePool`.
#[derive(Clone)]
pub struct StorePool {
    pool: PgPool,
    pii: Arc<PiiCipher>,
}

impl StorePool {
    /// `pii_key` is the base64-encoded 32-byte AES-256-GCM key used to
    /// encrypt/decrypt player names at rest (spec.md §1 "symmetric
    /// encryption primitive for at-rest PII").
    pub async fn connect(database_url: &str, pii_key: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .connect(database_url)
            .await
            .map_err(StoreError::Database)?;
        ensure_schema(&pool).await.map_err(StoreError::Database)?;
        let pii = Arc::new(PiiCipher::new(pii_key)?);
        Ok(Self { pool, pii })
    }

    /// Wrap an already-constructed pool and cipher (used by tests with a
    /// pre-seeded schema, or by callers that manage pool options themselves).
    pub fn from_pool(pool: PgPool, pii: Arc<PiiCipher>) -> Self {
        Self { pool, pii }
    }

    pub fn raw(&self) -> &PgPool {
        &self.pool
    }

    /// Open a new transactional session. Callers commit or roll back
    /// explicitly; the underlying `sqlx::Transaction` also rolls back on
    /// `Drop` as a safety net, per spec.md §4.1 ("commit on normal exit,
    /// rollback on any failure; no partial writes escape").
    pub async fn session(&self) -> Result<StoreSession, sqlx::Error> {
        let tx = self.pool.begin().await?;
        Ok(StoreSession::new(tx, self.pii.clone()))
    }
}
