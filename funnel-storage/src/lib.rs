//! FUNNEL Storage - Adapter Traits and In-Memory Implementations
//!
//! Defines the abstraction layer over the three external collaborators:
//! the durable store, the fast-path cache, and the notification bus.
//! The production implementations (PostgreSQL, Redis) live in funnel-api;
//! the in-memory implementations here back the test suite and local
//! development, and can inject faults to exercise partial-failure paths.

pub mod memory;
pub mod traits;

pub use memory::{InMemoryBus, InMemoryCache, InMemoryStore};
pub use traits::{DurableStore, NotificationBus, StatusCache};
