//! Async adapter traits for the three external collaborators.
//!
//! All implementations must be `Send + Sync`: the intake service shares
//! them across concurrent submit and query calls with no cross-call
//! mutual exclusion. None of the traits assume exclusive ownership of the
//! backing resource; the cache in particular is written concurrently by
//! external workers.

use async_trait::async_trait;
use funnel_core::{
    BusError, CacheError, CacheStatus, NotificationEvent, StoreError, ValueKey, ValueRecord,
};
use futures_util::stream::BoxStream;
use std::collections::HashMap;

/// Append-only source-of-truth record store.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Idempotent create-if-absent initialization, called once at
    /// startup before the first append.
    async fn init(&self) -> Result<(), StoreError>;

    /// Append one accepted record. Concurrent appends are allowed;
    /// arrival order is not significant (records carry timestamps).
    async fn append(&self, record: &ValueRecord) -> Result<(), StoreError>;

    /// Lazy stream over every stored record. Restartable: calling again
    /// produces a fresh pass over the store. No pagination guarantee.
    fn records(&self) -> BoxStream<'static, Result<ValueRecord, StoreError>>;

    /// Cheap connectivity check for health reporting.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Low-latency store for the working status of each key.
#[async_trait]
pub trait StatusCache: Send + Sync {
    /// Write the status for a key. Last-write-wins against concurrent
    /// writers; no compare-and-swap is required.
    async fn set(&self, key: ValueKey, status: CacheStatus) -> Result<(), CacheError>;

    /// Point-in-time snapshot of every entry. Eventually consistent
    /// relative to the durable store.
    async fn snapshot(&self) -> Result<HashMap<u32, CacheStatus>, CacheError>;

    /// Cheap connectivity check for health reporting.
    async fn ping(&self) -> Result<(), CacheError>;
}

/// Publish/subscribe channel announcing newly accepted values.
#[async_trait]
pub trait NotificationBus: Send + Sync {
    /// Publish one event. At-least-once semantics: the event may reach
    /// subscribers more than once across retries by callers.
    async fn publish(&self, event: &NotificationEvent) -> Result<(), BusError>;
}
