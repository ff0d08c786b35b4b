//! Notification Bus on Redis Pub/Sub
//!
//! One channel announces newly accepted keys to downstream workers.
//! Delivery is best-effort fire-and-forget; publishing to a channel with
//! no subscribers is a successful no-op.

use async_trait::async_trait;
use funnel_core::{BusError, NotificationEvent};
use funnel_storage::NotificationBus;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

/// Publisher for the insert announcement channel.
#[derive(Clone)]
pub struct RedisBus {
    conn: ConnectionManager,
    insert_channel: String,
}

impl RedisBus {
    pub fn new(conn: ConnectionManager, insert_channel: impl Into<String>) -> Self {
        Self {
            conn,
            insert_channel: insert_channel.into(),
        }
    }
}

#[async_trait]
impl NotificationBus for RedisBus {
    async fn publish(&self, event: &NotificationEvent) -> Result<(), BusError> {
        let mut conn = self.conn.clone();
        // The wire payload is the bare key, matching what the workers
        // already consume.
        let _receivers: i64 = conn
            .publish(&self.insert_channel, event.key.get())
            .await
            .map_err(|e| {
                if e.is_io_error() {
                    BusError::Unavailable {
                        reason: e.to_string(),
                    }
                } else {
                    BusError::PublishFailed {
                        reason: e.to_string(),
                    }
                }
            })?;
        Ok(())
    }
}
