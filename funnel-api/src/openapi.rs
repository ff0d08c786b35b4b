//! OpenAPI Specification for the FUNNEL API
//!
//! Generates the OpenAPI document from route annotations and the shared
//! schema types.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::health::{ComponentHealth, HealthDetails, HealthResponse, HealthStatus};
use crate::routes::values::SubmitValueRequest;
use crate::routes::{health, values};

use funnel_core::{Accepted, CacheStatus, StepOutcome, SubmitReceipt, ValueKey, ValueRecord};

/// OpenAPI document for the FUNNEL API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FUNNEL API",
        version = "0.2.0",
        description = "Value intake and fan-out service: validate, cache, persist, announce",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "http://localhost:5001", description = "Local Development")
    ),
    tags(
        (name = "Values", description = "Value intake and read paths"),
        (name = "Health", description = "Liveness and readiness checks")
    ),
    paths(
        values::submit_value,
        values::list_all_values,
        values::current_cache,
        health::ping,
        health::live,
        health::ready,
    ),
    components(schemas(
        SubmitValueRequest,
        Accepted,
        SubmitReceipt,
        StepOutcome,
        ValueKey,
        ValueRecord,
        CacheStatus,
        ApiError,
        ErrorCode,
        HealthResponse,
        HealthStatus,
        HealthDetails,
        ComponentHealth,
    ))
)]
pub struct ApiDoc;
