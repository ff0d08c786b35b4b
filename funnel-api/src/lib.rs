//! FUNNEL API - Value Intake and Fan-Out Service
//!
//! Accepts candidate keys over REST, validates them against a
//! configurable domain bound, and coordinates three side effects in
//! fixed order: a fast-path cache write (Redis hash), a notification
//! publish (Redis pub/sub), and a durable append (PostgreSQL). The
//! coordination contract and its partial-failure semantics live in
//! [`intake::IntakeService`]; the adapters implement the traits from
//! funnel-storage.

pub mod bus;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod intake;
pub mod macros;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod state;

// Re-export commonly used types
pub use bus::RedisBus;
pub use cache::{connect_redis, RedisCache};
pub use config::{ApiConfig, IntakeConfig, RedisConfig};
pub use db::{DbConfig, PgStore};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use intake::IntakeService;
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::AppState;
