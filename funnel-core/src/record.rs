//! Entity structures for the intake pipeline.

use crate::key::ValueKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Append-only durable record of an accepted value.
///
/// Immutable once stored; never deleted by this subsystem. Duplicate keys
/// across submissions are expected and preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ValueRecord {
    pub key: ValueKey,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub received_at: Timestamp,
}

impl ValueRecord {
    /// Create a record timestamped now.
    pub fn new(key: ValueKey) -> Self {
        Self {
            key,
            received_at: Utc::now(),
        }
    }

    /// Create a record with an explicit timestamp (store reads).
    pub fn at(key: ValueKey, received_at: Timestamp) -> Self {
        Self { key, received_at }
    }
}

/// Working status of a key in the fast-path cache.
///
/// Created as `Pending` at intake time. The cache is shared mutable state:
/// downstream workers transition entries to `Ready` or `Failed`
/// concurrently with intake writes (last-write-wins, no CAS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    Pending,
    Ready,
    Failed,
}

impl CacheStatus {
    /// Stable string form used as the cache hash value.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Pending => "pending",
            CacheStatus::Ready => "ready",
            CacheStatus::Failed => "failed",
        }
    }

    /// Interpret a raw cache hash value written by this service or by an
    /// external worker. Workers overwrite the placeholder with their own
    /// payload, so any unrecognized value means the work is done.
    pub fn from_cache_value(raw: &str) -> Self {
        match raw {
            "pending" => CacheStatus::Pending,
            "failed" => CacheStatus::Failed,
            _ => CacheStatus::Ready,
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ephemeral event announcing a newly accepted value on the bus.
///
/// At-least-once delivery: subscribers must tolerate duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NotificationEvent {
    pub key: ValueKey,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub emitted_at: Timestamp,
}

impl NotificationEvent {
    pub fn new(key: ValueKey) -> Self {
        Self {
            key,
            emitted_at: Utc::now(),
        }
    }
}
