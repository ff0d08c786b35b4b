//! Intake Service
//!
//! Coordinates the three side effects of accepting a value, in fixed
//! order: fast-path cache write, bus publish, durable append. The order
//! and the partial-failure policy are the contract:
//!
//! 1. Cache write fails -> abort, nothing else is issued.
//! 2. Publish fails -> degrade, persistence still happens.
//! 3. Append fails -> the value is not confirmed; the earlier side
//!    effects are best-effort and are not rolled back.
//!
//! The service holds no mutable state beyond the injected adapter
//! handles, so concurrent submits (same key or not) proceed
//! independently with no cross-call mutual exclusion.

use funnel_core::{
    Accepted, CacheError, CacheStatus, KeyDomain, NotificationEvent, StepOutcome, StoreError,
    SubmitError, SubmitReceipt, ValueKey, ValueRecord,
};
use funnel_storage::{DurableStore, NotificationBus, StatusCache};
use futures_util::stream::BoxStream;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// The value-intake and fan-out coordinator.
///
/// Adapter handles are explicit constructor dependencies, never
/// process-wide singletons.
#[derive(Clone)]
pub struct IntakeService {
    store: Arc<dyn DurableStore>,
    cache: Arc<dyn StatusCache>,
    bus: Arc<dyn NotificationBus>,
    domain: KeyDomain,
}

impl IntakeService {
    pub fn new(
        store: Arc<dyn DurableStore>,
        cache: Arc<dyn StatusCache>,
        bus: Arc<dyn NotificationBus>,
        domain: KeyDomain,
    ) -> Self {
        Self {
            store,
            cache,
            bus,
            domain,
        }
    }

    /// The key domain this service validates against.
    pub fn domain(&self) -> KeyDomain {
        self.domain
    }

    /// Validate a raw JSON value and run the intake coordination.
    ///
    /// Validation failures return before any side effect is issued.
    pub async fn submit(&self, value: &JsonValue) -> Result<Accepted, SubmitError> {
        let key = ValueKey::parse_json(value, &self.domain)?;
        self.submit_key(key).await
    }

    /// Run the intake coordination for an already-validated key.
    pub async fn submit_key(&self, key: ValueKey) -> Result<Accepted, SubmitError> {
        let mut receipt = SubmitReceipt::none();

        // Step 1: cache placeholder. The cache is the cheapest and
        // fastest-failing backend; aborting here bounds wasted work.
        match self.cache.set(key, CacheStatus::Pending).await {
            Ok(()) => receipt.cache_write = StepOutcome::Completed,
            Err(source) => {
                receipt.cache_write = StepOutcome::Failed;
                return Err(SubmitError::CacheUnavailable { receipt, source });
            }
        }

        // Step 2: announce on the bus. A failed publish degrades the
        // result but must not block persistence.
        let event = NotificationEvent::new(key);
        let notify_degraded = match self.bus.publish(&event).await {
            Ok(()) => {
                receipt.publish = StepOutcome::Completed;
                None
            }
            Err(source) => {
                receipt.publish = StepOutcome::Failed;
                warn!(%key, error = %source, "publish failed; continuing to persistence");
                Some(source.to_string())
            }
        };

        // Step 3: durable append. Only a successful append confirms the
        // value; the earlier side effects stay in place either way.
        match self.store.append(&ValueRecord::new(key)).await {
            Ok(()) => receipt.durable_append = StepOutcome::Completed,
            Err(source) => {
                receipt.durable_append = StepOutcome::Failed;
                return Err(SubmitError::Persistence { receipt, source });
            }
        }

        debug!(%key, degraded = notify_degraded.is_some(), "value accepted");
        Ok(Accepted {
            key,
            receipt,
            notify_degraded,
        })
    }

    /// Lazy, restartable stream over every durably stored record.
    pub fn records(&self) -> BoxStream<'static, Result<ValueRecord, StoreError>> {
        self.store.records()
    }

    /// Point-in-time snapshot of the fast-path cache.
    pub async fn cache_snapshot(&self) -> Result<HashMap<u32, CacheStatus>, CacheError> {
        self.cache.snapshot().await
    }

    /// Connectivity check against the durable store.
    pub async fn store_ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    /// Connectivity check against the fast-path cache.
    pub async fn cache_ping(&self) -> Result<(), CacheError> {
        self.cache.ping().await
    }
}
