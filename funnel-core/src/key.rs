//! Bounded key domain and validated key parsing.
//!
//! Inbound values cross the trust boundary exactly once, through
//! [`ValueKey::parse`] or [`ValueKey::parse_json`]. Everything past that
//! point works with an already-validated key.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default inclusive upper bound for accepted keys.
///
/// The effective bound is configuration ([`KeyDomain`]), not a
/// hard-coded business rule.
pub const DEFAULT_MAX_KEY: u32 = 40;

/// The accepted key domain `[0, max_key]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDomain {
    /// Inclusive upper bound for accepted keys.
    pub max_key: u32,
}

impl Default for KeyDomain {
    fn default() -> Self {
        Self {
            max_key: DEFAULT_MAX_KEY,
        }
    }
}

impl KeyDomain {
    /// Create a domain with the given inclusive upper bound.
    pub fn new(max_key: u32) -> Self {
        Self { max_key }
    }

    /// Whether the given integer falls inside the domain.
    pub fn contains(&self, value: i64) -> bool {
        (0..=self.max_key as i64).contains(&value)
    }
}

/// A key that has passed domain validation.
///
/// Invariant: a `ValueKey` always satisfies `key <= domain.max_key` for
/// the domain it was parsed against. Violating inputs are rejected before
/// any side effect occurs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct ValueKey(u32);

impl ValueKey {
    /// Parse raw text into a validated key.
    pub fn parse(raw: &str, domain: &KeyDomain) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let value: i64 = trimmed.parse().map_err(|_| ValidationError::NotAnInteger {
            raw: trimmed.to_string(),
        })?;
        Self::from_i64(value, domain)
    }

    /// Validate an already-numeric value against the domain.
    pub fn from_i64(value: i64, domain: &KeyDomain) -> Result<Self, ValidationError> {
        if !domain.contains(value) {
            return Err(ValidationError::OutOfRange {
                value,
                max_key: domain.max_key,
            });
        }
        Ok(Self(value as u32))
    }

    /// Parse a JSON field, accepting both integers and numeric strings.
    ///
    /// Browser clients send the value as a string taken from a form
    /// input; numeric JSON is accepted as well. Anything else (floats,
    /// booleans, objects) is a validation error.
    pub fn parse_json(
        value: &serde_json::Value,
        domain: &KeyDomain,
    ) -> Result<Self, ValidationError> {
        match value {
            serde_json::Value::Number(n) => {
                let int = n.as_i64().ok_or_else(|| ValidationError::NotAnInteger {
                    raw: n.to_string(),
                })?;
                Self::from_i64(int, domain)
            }
            serde_json::Value::String(s) => Self::parse(s, domain),
            other => Err(ValidationError::NotAnInteger {
                raw: other.to_string(),
            }),
        }
    }

    /// Rehydrate a key that was validated at intake time and re-read
    /// from the durable store. Does not re-check the domain bound, which
    /// may have been lowered since the record was accepted.
    pub fn trusted(value: u32) -> Self {
        Self(value)
    }

    /// The validated integer.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
