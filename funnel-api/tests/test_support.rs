//! Shared test fixtures for the funnel-api integration tests.
//!
//! Builds the intake service over the in-memory adapters from
//! funnel-storage, keeping clones of the adapter handles around so tests
//! can inject failures and assert on side effects directly.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use funnel_api::{ApiConfig, AppState, IntakeService};
use funnel_core::KeyDomain;
use funnel_storage::{InMemoryBus, InMemoryCache, InMemoryStore};

/// Handles to the backends behind a test intake service.
#[derive(Clone)]
pub struct TestBackends {
    pub store: InMemoryStore,
    pub cache: InMemoryCache,
    pub bus: InMemoryBus,
}

/// Intake service over fresh in-memory backends with the default domain.
pub fn test_intake() -> (IntakeService, TestBackends) {
    test_intake_with_domain(KeyDomain::default())
}

/// Intake service over fresh in-memory backends with a custom domain.
pub fn test_intake_with_domain(domain: KeyDomain) -> (IntakeService, TestBackends) {
    let backends = TestBackends {
        store: InMemoryStore::new(),
        cache: InMemoryCache::new(),
        bus: InMemoryBus::new(64),
    };
    let intake = IntakeService::new(
        Arc::new(backends.store.clone()),
        Arc::new(backends.cache.clone()),
        Arc::new(backends.bus.clone()),
        domain,
    );
    (intake, backends)
}

/// Full application router over in-memory backends, for HTTP-level tests.
pub fn test_router() -> (Router, TestBackends) {
    let (intake, backends) = test_intake();
    let router = funnel_api::create_api_router(AppState::new(intake), &ApiConfig::default());
    (router, backends)
}
