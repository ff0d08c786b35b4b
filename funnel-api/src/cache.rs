//! Fast-Path Cache on Redis
//!
//! Status entries live in a single Redis hash: field = key, value =
//! status string. The hash is shared with external workers that replace
//! the `pending` placeholder with their own payload, so reads tolerate
//! arbitrary values (see `CacheStatus::from_cache_value`).

use crate::config::RedisConfig;
use async_trait::async_trait;
use funnel_core::{CacheError, CacheStatus, ValueKey};
use funnel_storage::StatusCache;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};
use std::collections::HashMap;

/// Open a managed Redis connection with bounded retries.
///
/// The connection manager transparently reconnects; per-command retries
/// are kept low so an unavailable cache fails the submit fast instead of
/// stalling it.
pub async fn connect_redis(config: &RedisConfig) -> Result<ConnectionManager, redis::RedisError> {
    let manager_config = ConnectionManagerConfig::new()
        .set_number_of_retries(config.retries)
        .set_connection_timeout(config.connection_timeout);

    let client = Client::open(config.url.as_str())?;
    client
        .get_connection_manager_with_config(manager_config)
        .await
}

/// Status cache backed by a Redis hash.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    values_hash: String,
}

impl RedisCache {
    pub fn new(conn: ConnectionManager, values_hash: impl Into<String>) -> Self {
        Self {
            conn,
            values_hash: values_hash.into(),
        }
    }

    fn write_error(e: redis::RedisError) -> CacheError {
        if e.is_io_error() {
            CacheError::Unavailable {
                reason: e.to_string(),
            }
        } else {
            CacheError::WriteFailed {
                reason: e.to_string(),
            }
        }
    }

    fn read_error(e: redis::RedisError) -> CacheError {
        if e.is_io_error() {
            CacheError::Unavailable {
                reason: e.to_string(),
            }
        } else {
            CacheError::ReadFailed {
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl StatusCache for RedisCache {
    async fn set(&self, key: ValueKey, status: CacheStatus) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset(&self.values_hash, key.get(), status.as_str())
            .await
            .map_err(Self::write_error)?;
        Ok(())
    }

    async fn snapshot(&self) -> Result<HashMap<u32, CacheStatus>, CacheError> {
        let mut conn = self.conn.clone();
        let entries: HashMap<String, String> = conn
            .hgetall(&self.values_hash)
            .await
            .map_err(Self::read_error)?;

        // Fields that do not parse as integers were not written by this
        // service or its workers; they are skipped rather than surfaced.
        Ok(entries
            .into_iter()
            .filter_map(|(field, value)| {
                field
                    .parse::<u32>()
                    .ok()
                    .map(|key| (key, CacheStatus::from_cache_value(&value)))
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::read_error)?;
        Ok(())
    }
}
