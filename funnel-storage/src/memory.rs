//! In-memory implementations of the adapter traits.
//!
//! Used by the test suite and local development. Each implementation has
//! a `set_unavailable` toggle so tests can exercise the partial-failure
//! paths of the intake coordination (cache down, bus down, store down).

use crate::traits::{DurableStore, NotificationBus, StatusCache};
use async_trait::async_trait;
use funnel_core::{
    BusError, CacheError, CacheStatus, NotificationEvent, StoreError, ValueKey, ValueRecord,
};
use futures_util::stream::{self, BoxStream, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

// ============================================================================
// DURABLE STORE
// ============================================================================

/// Append-only record store backed by a `Vec`.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<Vec<ValueRecord>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of the stored records, for assertions.
    pub fn stored(&self) -> Vec<ValueRecord> {
        self.records.read().map(|r| r.clone()).unwrap_or_default()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                reason: "store marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DurableStore for InMemoryStore {
    async fn init(&self) -> Result<(), StoreError> {
        self.check_available()
    }

    async fn append(&self, record: &ValueRecord) -> Result<(), StoreError> {
        self.check_available()?;
        let mut records = self.records.write().map_err(|_| StoreError::AppendFailed {
            reason: "record lock poisoned".to_string(),
        })?;
        records.push(record.clone());
        Ok(())
    }

    fn records(&self) -> BoxStream<'static, Result<ValueRecord, StoreError>> {
        if let Err(e) = self.check_available() {
            return stream::iter(vec![Err(e)]).boxed();
        }
        let snapshot = self.stored();
        stream::iter(snapshot.into_iter().map(Ok)).boxed()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}

// ============================================================================
// STATUS CACHE
// ============================================================================

/// Status cache backed by a `HashMap`.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<u32, CacheStatus>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `CacheError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Overwrite an entry the way an external worker would.
    pub fn worker_write(&self, key: ValueKey, status: CacheStatus) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.get(), status);
        }
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable {
                reason: "cache marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl StatusCache for InMemoryCache {
    async fn set(&self, key: ValueKey, status: CacheStatus) -> Result<(), CacheError> {
        self.check_available()?;
        let mut entries = self.entries.write().map_err(|_| CacheError::WriteFailed {
            reason: "entry lock poisoned".to_string(),
        })?;
        entries.insert(key.get(), status);
        Ok(())
    }

    async fn snapshot(&self) -> Result<HashMap<u32, CacheStatus>, CacheError> {
        self.check_available()?;
        let entries = self.entries.read().map_err(|_| CacheError::ReadFailed {
            reason: "entry lock poisoned".to_string(),
        })?;
        Ok(entries.clone())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.check_available()
    }
}

// ============================================================================
// NOTIFICATION BUS
// ============================================================================

/// Pub/sub bus backed by a tokio broadcast channel.
///
/// Published events are also retained in a log for test assertions.
/// Sending with no subscribers is not an error, matching the semantics of
/// a real broker channel with no listeners.
#[derive(Clone)]
pub struct InMemoryBus {
    published: Arc<RwLock<Vec<NotificationEvent>>>,
    tx: broadcast::Sender<NotificationEvent>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryBus {
    /// Create a bus whose broadcast channel buffers up to `capacity`
    /// events per lagging subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self {
            published: Arc::new(RwLock::new(Vec::new())),
            tx,
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent publish fail with `BusError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Subscribe to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.tx.subscribe()
    }

    /// Every event published so far, for assertions.
    pub fn published(&self) -> Vec<NotificationEvent> {
        self.published.read().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl NotificationBus for InMemoryBus {
    async fn publish(&self, event: &NotificationEvent) -> Result<(), BusError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BusError::Unavailable {
                reason: "bus marked unavailable".to_string(),
            });
        }
        let mut published = self.published.write().map_err(|_| BusError::PublishFailed {
            reason: "publish log lock poisoned".to_string(),
        })?;
        published.push(event.clone());
        // No receivers is fine; the event is simply dropped.
        let _ = self.tx.send(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnel_core::KeyDomain;
    use futures_util::TryStreamExt;
    use proptest::prelude::*;

    fn key(value: u32) -> ValueKey {
        ValueKey::parse(&value.to_string(), &KeyDomain::default()).unwrap()
    }

    fn status(index: u8) -> CacheStatus {
        match index % 3 {
            0 => CacheStatus::Pending,
            1 => CacheStatus::Ready,
            _ => CacheStatus::Failed,
        }
    }

    #[tokio::test]
    async fn store_appends_and_streams_back() {
        let store = InMemoryStore::new();
        store.init().await.unwrap();
        store.append(&ValueRecord::new(key(3))).await.unwrap();
        store.append(&ValueRecord::new(key(3))).await.unwrap();

        let records: Vec<ValueRecord> = store.records().try_collect().await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.key == key(3)));
    }

    #[tokio::test]
    async fn store_streams_are_restartable() {
        let store = InMemoryStore::new();
        store.append(&ValueRecord::new(key(1))).await.unwrap();

        let first: Vec<ValueRecord> = store.records().try_collect().await.unwrap();
        let second: Vec<ValueRecord> = store.records().try_collect().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unavailable_store_rejects_appends() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);
        let result = store.append(&ValueRecord::new(key(0))).await;
        assert!(matches!(result, Err(StoreError::Unavailable { .. })));

        store.set_unavailable(false);
        assert!(store.append(&ValueRecord::new(key(0))).await.is_ok());
    }

    #[tokio::test]
    async fn cache_snapshot_reflects_writes() {
        let cache = InMemoryCache::new();
        cache.set(key(7), CacheStatus::Pending).await.unwrap();

        let snapshot = cache.snapshot().await.unwrap();
        assert_eq!(snapshot.get(&7), Some(&CacheStatus::Pending));
    }

    #[tokio::test]
    async fn worker_overwrite_wins() {
        let cache = InMemoryCache::new();
        cache.set(key(7), CacheStatus::Pending).await.unwrap();
        cache.worker_write(key(7), CacheStatus::Ready);

        let snapshot = cache.snapshot().await.unwrap();
        assert_eq!(snapshot.get(&7), Some(&CacheStatus::Ready));
    }

    #[tokio::test]
    async fn bus_delivers_to_subscribers_and_logs() {
        let bus = InMemoryBus::new(8);
        let mut rx = bus.subscribe();

        let event = NotificationEvent::new(key(5));
        bus.publish(&event).await.unwrap();

        assert_eq!(bus.published(), vec![event.clone()]);
        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn bus_publish_without_subscribers_succeeds() {
        let bus = InMemoryBus::new(8);
        assert!(bus.publish(&NotificationEvent::new(key(1))).await.is_ok());
    }

    #[tokio::test]
    async fn unavailable_bus_rejects_publish() {
        let bus = InMemoryBus::new(8);
        bus.set_unavailable(true);
        let result = bus.publish(&NotificationEvent::new(key(1))).await;
        assert!(matches!(result, Err(BusError::Unavailable { .. })));
    }

    proptest! {
        #[test]
        fn append_sequences_stream_back_in_order(
            keys in proptest::collection::vec(0u32..=40, 0..32),
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let store = InMemoryStore::new();
                for k in &keys {
                    store.append(&ValueRecord::new(key(*k))).await.unwrap();
                }

                let streamed: Vec<u32> = store
                    .records()
                    .try_collect::<Vec<ValueRecord>>()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|r| r.key.get())
                    .collect();
                prop_assert_eq!(streamed, keys);
                Ok(())
            })?;
        }

        #[test]
        fn snapshot_reflects_the_last_write_per_key(
            writes in proptest::collection::vec((0u32..=40, 0u8..3), 1..32),
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let cache = InMemoryCache::new();
                let mut expected = HashMap::new();
                for (k, s) in &writes {
                    cache.set(key(*k), status(*s)).await.unwrap();
                    expected.insert(*k, status(*s));
                }

                prop_assert_eq!(cache.snapshot().await.unwrap(), expected);
                Ok(())
            })?;
        }

        #[test]
        fn every_publish_is_logged_once(
            keys in proptest::collection::vec(0u32..=40, 0..32),
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let bus = InMemoryBus::new(64);
                for k in &keys {
                    bus.publish(&NotificationEvent::new(key(*k))).await.unwrap();
                }

                let logged: Vec<u32> =
                    bus.published().iter().map(|e| e.key.get()).collect();
                prop_assert_eq!(logged, keys);
                Ok(())
            })?;
        }
    }
}
