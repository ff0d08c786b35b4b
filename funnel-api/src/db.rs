//! Durable Store on PostgreSQL
//!
//! Connection pooling via deadpool-postgres. The store is a single
//! append-only table; initialization is an idempotent create-if-absent
//! executed once at startup. Reads are served as a lazy stream so the
//! full table is never buffered in the service.

use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use funnel_core::{StoreError, Timestamp, ValueKey, ValueRecord};
use funnel_storage::DurableStore;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use std::time::Duration;
use tokio_postgres::types::ToSql;
use tokio_postgres::NoTls;

// BIGINT so any u32 key fits without sign wrapping.
const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS accepted_values (
        key BIGINT NOT NULL,
        received_at TIMESTAMPTZ NOT NULL
    )";

const INSERT_RECORD: &str = "INSERT INTO accepted_values (key, received_at) VALUES ($1, $2)";

const SELECT_RECORDS: &str = "SELECT key, received_at FROM accepted_values ORDER BY received_at";

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection timeout
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "funnel".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("FUNNEL_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("FUNNEL_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("FUNNEL_DB_NAME").unwrap_or_else(|_| "funnel".to_string()),
            user: std::env::var("FUNNEL_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("FUNNEL_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("FUNNEL_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("FUNNEL_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> Result<Pool, StoreError> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| StoreError::InitFailed {
                reason: format!("failed to create pool: {}", e),
            })
    }
}

// ============================================================================
// DURABLE STORE IMPLEMENTATION
// ============================================================================

/// Append-only durable store backed by a pooled PostgreSQL connection.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    /// Create a new store with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new store from configuration.
    pub fn from_config(config: &DbConfig) -> Result<Self, StoreError> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    async fn get_conn(&self) -> Result<deadpool_postgres::Object, StoreError> {
        self.pool.get().await.map_err(|e| StoreError::Unavailable {
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl DurableStore for PgStore {
    async fn init(&self) -> Result<(), StoreError> {
        let conn = self.get_conn().await?;
        conn.execute(CREATE_TABLE, &[])
            .await
            .map_err(|e| StoreError::InitFailed {
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn append(&self, record: &ValueRecord) -> Result<(), StoreError> {
        let conn = self.get_conn().await?;
        let key = i64::from(record.key.get());
        conn.execute(INSERT_RECORD, &[&key, &record.received_at])
            .await
            .map_err(|e| StoreError::AppendFailed {
                reason: e.to_string(),
            })?;
        Ok(())
    }

    fn records(&self) -> BoxStream<'static, Result<ValueRecord, StoreError>> {
        let pool = self.pool.clone();
        let stream = async_stream::try_stream! {
            let conn = pool.get().await.map_err(|e| StoreError::Unavailable {
                reason: e.to_string(),
            })?;
            let rows = conn
                .query_raw(SELECT_RECORDS, std::iter::empty::<&(dyn ToSql + Sync)>())
                .await
                .map_err(|e| StoreError::QueryFailed {
                    reason: e.to_string(),
                })?;
            futures_util::pin_mut!(rows);
            while let Some(row) = rows.try_next().await.map_err(|e| StoreError::QueryFailed {
                reason: e.to_string(),
            })? {
                let key: i64 = row.try_get(0).map_err(|e| StoreError::QueryFailed {
                    reason: e.to_string(),
                })?;
                let received_at: Timestamp =
                    row.try_get(1).map_err(|e| StoreError::QueryFailed {
                        reason: e.to_string(),
                    })?;
                yield ValueRecord::at(ValueKey::trusted(key as u32), received_at);
            }
        };
        stream.boxed()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let conn = self.get_conn().await?;
        conn.simple_query("SELECT 1")
            .await
            .map_err(|e| StoreError::Unavailable {
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_column_holds_any_u32_without_sign_wrap() {
        assert!(CREATE_TABLE.contains("BIGINT"));
        for raw in [0u32, 40, u32::MAX] {
            let stored = i64::from(ValueKey::trusted(raw).get());
            assert!(stored >= 0);
            assert_eq!(stored as u32, raw);
        }
    }
}
