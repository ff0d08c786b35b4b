//! Error Types for the FUNNEL API
//!
//! Defines the structured error envelope returned by every endpoint:
//! an `ApiError` with a categorizing `ErrorCode`, a human-readable
//! message, and optional details. The details carry the submit receipt
//! when side effects may already have been issued, so callers can reason
//! about partial effects. All errors serialize as JSON with the HTTP
//! status implied by their code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use funnel_core::{CacheError, StoreError, SubmitError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input failed validation (not an integer)
    ValidationFailed,

    /// Input is outside the accepted key domain
    InvalidRange,

    /// Fast-path cache write failed; the submit was aborted before any
    /// durable or bus write
    CacheUnavailable,

    /// Durable append failed; the value is not confirmed
    PersistenceFailed,

    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed | ErrorCode::InvalidRange => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorCode::CacheUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::PersistenceFailed | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Value failed validation",
            ErrorCode::InvalidRange => "Value is outside the accepted domain",
            ErrorCode::CacheUnavailable => "Fast-path cache is unavailable",
            ErrorCode::PersistenceFailed => "Durable write failed; value not confirmed",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (submit receipt, backend reason)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<serde_json::Value>,
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
            details: None,
        }
    }

    /// Add additional details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let code = match err {
            ValidationError::NotAnInteger { .. } => ErrorCode::ValidationFailed,
            ValidationError::OutOfRange { .. } => ErrorCode::InvalidRange,
        };
        Self::new(code, err.to_string())
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        let receipt = err.receipt();
        let api_error = match err {
            SubmitError::Validation(validation) => return validation.into(),
            SubmitError::CacheUnavailable { source, .. } => {
                Self::new(ErrorCode::CacheUnavailable, source.to_string())
            }
            SubmitError::Persistence { source, .. } => {
                Self::new(ErrorCode::PersistenceFailed, source.to_string())
            }
        };
        match receipt.and_then(|r| serde_json::to_value(r).ok()) {
            Some(details) => api_error.with_details(serde_json::json!({ "receipt": details })),
            None => api_error,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        Self::new(ErrorCode::CacheUnavailable, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnel_core::SubmitReceipt;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            ErrorCode::ValidationFailed.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::InvalidRange.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::CacheUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::PersistenceFailed.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn persistence_errors_carry_the_receipt() {
        let err = SubmitError::Persistence {
            receipt: SubmitReceipt::none(),
            source: StoreError::AppendFailed {
                reason: "connection reset".to_string(),
            },
        };
        let api: ApiError = err.into();
        assert_eq!(api.code, ErrorCode::PersistenceFailed);
        let details = api.details.expect("receipt details");
        assert!(details.get("receipt").is_some());
    }

    #[test]
    fn validation_errors_have_no_details() {
        let err = SubmitError::Validation(ValidationError::OutOfRange {
            value: 41,
            max_key: 40,
        });
        let api: ApiError = err.into();
        assert_eq!(api.code, ErrorCode::InvalidRange);
        assert!(api.details.is_none());
    }
}
