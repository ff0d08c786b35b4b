//! FUNNEL API Server Entry Point
//!
//! Bootstraps configuration from the environment, initializes the
//! durable store schema, wires the adapters into the intake service, and
//! starts the Axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use funnel_api::{
    connect_redis, create_api_router, ApiConfig, ApiError, ApiResult, AppState, DbConfig,
    IntakeConfig, IntakeService, PgStore, RedisBus, RedisCache, RedisConfig,
};
use funnel_storage::DurableStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing();

    let db_config = DbConfig::from_env();
    let store = PgStore::from_config(&db_config)?;
    // Idempotent create-if-absent; safe across concurrent replicas.
    store.init().await?;

    let redis_config = RedisConfig::from_env();
    let redis_conn = connect_redis(&redis_config).await.map_err(|e| {
        ApiError::internal_error(format!("Failed to connect to redis: {}", e))
    })?;
    let cache = RedisCache::new(redis_conn.clone(), redis_config.values_hash.clone());
    let bus = RedisBus::new(redis_conn, redis_config.insert_channel.clone());

    let intake_config = IntakeConfig::from_env();
    let intake = IntakeService::new(
        Arc::new(store),
        Arc::new(cache),
        Arc::new(bus),
        intake_config.domain,
    );

    let api_config = ApiConfig::from_env();
    let app: Router = create_api_router(AppState::new(intake), &api_config);

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, max_key = intake_config.domain.max_key, "Starting FUNNEL API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("funnel_api=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("FUNNEL_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("FUNNEL_API_PORT").ok())
        .unwrap_or_else(|| "5001".to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::internal_error(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::internal_error(format!("Invalid bind address {}: {}", addr, e)))
}
