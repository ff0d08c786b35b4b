//! Value Intake REST Routes
//!
//! The inbound surface of the service: submit a candidate key, list all
//! durably stored records, read the fast-path cache snapshot. Handlers
//! delegate to the [`IntakeService`]; error mapping lives in
//! `crate::error`.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use funnel_core::{CacheStatus, ValueRecord};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ApiError, ApiResult};
use crate::intake::IntakeService;
use crate::state::AppState;

// ============================================================================
// TYPES
// ============================================================================

/// Request body for submitting a value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubmitValueRequest {
    /// Candidate key. Integers and numeric strings are both accepted;
    /// anything else is rejected with a validation error.
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub value: serde_json::Value,
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/v1/values - Submit a candidate key
#[utoipa::path(
    post,
    path = "/api/v1/values",
    tag = "Values",
    request_body = SubmitValueRequest,
    responses(
        (status = 201, description = "Value accepted and durably recorded", body = funnel_core::Accepted),
        (status = 422, description = "Value failed validation; no side effects", body = ApiError),
        (status = 503, description = "Fast-path cache unavailable; submit aborted", body = ApiError),
        (status = 500, description = "Durable write failed; value not confirmed", body = ApiError),
    ),
)]
pub async fn submit_value(
    State(intake): State<IntakeService>,
    Json(req): Json<SubmitValueRequest>,
) -> ApiResult<impl IntoResponse> {
    let accepted = intake.submit(&req.value).await?;
    Ok((StatusCode::CREATED, Json(accepted)))
}

/// GET /api/v1/values/all - List every durably stored record
#[utoipa::path(
    get,
    path = "/api/v1/values/all",
    tag = "Values",
    responses(
        (status = 200, description = "All accepted records, duplicates included", body = Vec<ValueRecord>),
        (status = 500, description = "Durable store query failed", body = ApiError),
    ),
)]
pub async fn list_all_values(
    State(intake): State<IntakeService>,
) -> ApiResult<Json<Vec<ValueRecord>>> {
    let records: Vec<ValueRecord> = intake.records().try_collect().await?;
    Ok(Json(records))
}

/// GET /api/v1/values/current - Snapshot of the fast-path cache
///
/// Eventually consistent relative to /values/all: entries appear here
/// as soon as the cache write lands, and external workers may have
/// already transitioned them past `pending`.
#[utoipa::path(
    get,
    path = "/api/v1/values/current",
    tag = "Values",
    responses(
        (status = 200, description = "Mapping of key to working status"),
        (status = 503, description = "Fast-path cache unavailable", body = ApiError),
    ),
)]
pub async fn current_cache(
    State(intake): State<IntakeService>,
) -> ApiResult<Json<HashMap<u32, CacheStatus>>> {
    let snapshot = intake.cache_snapshot().await?;
    Ok(Json(snapshot))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the values router, nested under /api/v1/values.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_value))
        .route("/all", get(list_all_values))
        .route("/current", get(current_cache))
}
