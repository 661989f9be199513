//! Redis-backed, publish-only event bus (spec.md §4.5)
//!
//! Fire-and-forget: a publish failure is logged and swallowed, never
//! propagated to the caller. The wallet/AML mutation it follows has
//! already committed by the time this runs.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::warn;

use crate::error::EventError;
use crate::event::DomainEvent;

#[derive(Clone)]
pub struct EventBus {
    conn: ConnectionManager,
}

impl EventBus {
    pub async fn connect(redis_url: &str) -> Result<Self, EventError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }

    pub fn from_connection_manager(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Publish an event. Never returns an error to the caller; failures
    /// are logged at `warn` level (spec.md §4.5: "best-effort").
    pub async fn publish(&self, event: &DomainEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(p) => p,
            Err(err) => {
                warn!(error = %err, "failed to serialize event, dropping");
                return;
            }
        };

        let mut conn = self.conn.clone();
        if let Err(err) = conn.publish::<_, _, ()>(event.channel(), payload).await {
            warn!(error = %err, channel = event.channel(), "event publish failed");
        }
    }
}
