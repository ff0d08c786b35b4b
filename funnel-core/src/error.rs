//! Error types for intake operations
//!
//! One enum per layer, mirroring the propagation policy: validation is
//! rejected locally with no side effects, cache and store errors become
//! the operation's result, publish errors degrade but never fail a
//! submit. Nothing here is fatal to the process.

use crate::receipt::SubmitReceipt;
use thiserror::Error;

/// Input validation errors. Always recoverable by resubmitting corrected
/// input; guaranteed to have produced no side effects.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("value {raw:?} is not an integer")]
    NotAnInteger { raw: String },

    #[error("value {value} is outside the accepted domain [0, {max_key}]")]
    OutOfRange { value: i64, max_key: u32 },
}

/// Durable store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("append failed: {reason}")]
    AppendFailed { reason: String },

    #[error("record query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("schema initialization failed: {reason}")]
    InitFailed { reason: String },
}

/// Fast-path cache errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("cache write failed: {reason}")]
    WriteFailed { reason: String },

    #[error("cache read failed: {reason}")]
    ReadFailed { reason: String },
}

/// Notification bus errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BusError {
    #[error("bus unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("publish failed: {reason}")]
    PublishFailed { reason: String },
}

/// Failure outcome of a submit call.
///
/// Every variant past validation carries the completion receipt so the
/// caller can see which side effects were already issued.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Rejected at the boundary; no side effects occurred.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The fast-path cache write failed; the call aborted before any
    /// durable or bus write. Retrying the whole submit is safe.
    #[error("fast-path cache unavailable: {source}")]
    CacheUnavailable {
        receipt: SubmitReceipt,
        source: CacheError,
    },

    /// The durable append failed after the cache write (and possibly the
    /// publish) already happened. The value is not confirmed; the earlier
    /// side effects are best-effort and are not rolled back.
    #[error("durable append failed: {source}")]
    Persistence {
        receipt: SubmitReceipt,
        source: StoreError,
    },
}

impl SubmitError {
    /// The completion receipt, when side effects may have been issued.
    pub fn receipt(&self) -> Option<SubmitReceipt> {
        match self {
            SubmitError::Validation(_) => None,
            SubmitError::CacheUnavailable { receipt, .. }
            | SubmitError::Persistence { receipt, .. } => Some(*receipt),
        }
    }
}
