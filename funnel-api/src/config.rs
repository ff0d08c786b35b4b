//! API Configuration Module
//!
//! Configuration for the HTTP surface, the intake domain bound, and the
//! Redis collaborators. Everything is loaded from environment variables
//! with development defaults; the PostgreSQL pool configuration lives in
//! [`crate::db::DbConfig`].

use funnel_core::{KeyDomain, DEFAULT_MAX_KEY};
use std::time::Duration;

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// Configuration for CORS and the HTTP listener.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(), // Empty = allow all
            cors_max_age_secs: 86400, // 24 hours
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `FUNNEL_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `FUNNEL_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("FUNNEL_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_max_age_secs = std::env::var("FUNNEL_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86400);

        Self {
            cors_origins,
            cors_max_age_secs,
        }
    }
}

// ============================================================================
// INTAKE CONFIGURATION
// ============================================================================

/// Configuration for the intake domain bound.
///
/// The bound is a deployment policy, so it is configuration rather than
/// hard-coded business logic.
#[derive(Debug, Clone, Copy)]
pub struct IntakeConfig {
    pub domain: KeyDomain,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            domain: KeyDomain::default(),
        }
    }
}

impl IntakeConfig {
    /// Create IntakeConfig from environment variables.
    ///
    /// Environment variables:
    /// - `FUNNEL_MAX_KEY`: Inclusive upper bound for accepted keys (default: 40)
    pub fn from_env() -> Self {
        let max_key = std::env::var("FUNNEL_MAX_KEY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_KEY);

        Self {
            domain: KeyDomain::new(max_key),
        }
    }
}

// ============================================================================
// REDIS CONFIGURATION
// ============================================================================

/// Configuration for the Redis-backed cache and bus.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis connection URL.
    pub url: String,
    /// Hash key holding the per-value status entries.
    pub values_hash: String,
    /// Pub/sub channel announcing accepted values.
    pub insert_channel: String,
    /// Number of command retries before the connection manager gives up.
    pub retries: usize,
    /// Connection timeout for the initial handshake.
    pub connection_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            values_hash: "values".to_string(),
            insert_channel: "insert".to_string(),
            retries: 1,
            connection_timeout: Duration::from_millis(500),
        }
    }
}

impl RedisConfig {
    /// Create RedisConfig from environment variables.
    ///
    /// Environment variables:
    /// - `FUNNEL_REDIS_URL`: Connection URL (default: redis://localhost:6379)
    /// - `FUNNEL_CACHE_HASH`: Hash key for status entries (default: values)
    /// - `FUNNEL_CHANNEL`: Pub/sub channel name (default: insert)
    /// - `FUNNEL_REDIS_TIMEOUT_MS`: Connection timeout in ms (default: 500)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("FUNNEL_REDIS_URL").unwrap_or(defaults.url),
            values_hash: std::env::var("FUNNEL_CACHE_HASH").unwrap_or(defaults.values_hash),
            insert_channel: std::env::var("FUNNEL_CHANNEL").unwrap_or(defaults.insert_channel),
            retries: defaults.retries,
            connection_timeout: std::env::var("FUNNEL_REDIS_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.connection_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable() {
        let intake = IntakeConfig::default();
        assert_eq!(intake.domain.max_key, 40);

        let redis = RedisConfig::default();
        assert_eq!(redis.values_hash, "values");
        assert_eq!(redis.insert_channel, "insert");
    }
}
