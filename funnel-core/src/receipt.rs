//! Tri-state completion receipt for submit calls.
//!
//! The three side effects of a submit (cache write, bus publish, durable
//! append) are not transactional. The receipt records which steps were
//! issued and how they ended, so a caller that timed out or received a
//! partial failure can reason about what actually happened.

use crate::key::ValueKey;
use serde::{Deserialize, Serialize};

/// Outcome of a single coordination step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// The step was never issued (an earlier step aborted the call).
    #[default]
    Skipped,
    /// The step was issued and acknowledged.
    Completed,
    /// The step was issued and the backend reported an error.
    Failed,
}

/// Completion receipt for one submit call, in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubmitReceipt {
    pub cache_write: StepOutcome,
    pub publish: StepOutcome,
    pub durable_append: StepOutcome,
}

impl SubmitReceipt {
    /// Receipt for a call that performed no side effects yet.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether every issued step completed.
    pub fn fully_completed(&self) -> bool {
        self.cache_write == StepOutcome::Completed
            && self.publish == StepOutcome::Completed
            && self.durable_append == StepOutcome::Completed
    }
}

/// Successful intake acknowledgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Accepted {
    pub key: ValueKey,
    pub receipt: SubmitReceipt,
    /// Present when the notification publish failed but the value was
    /// still durably recorded. The publish is not retried here; retry
    /// policy, if any, belongs to the bus client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_degraded: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_receipt_has_no_issued_steps() {
        let receipt = SubmitReceipt::none();
        assert_eq!(receipt.cache_write, StepOutcome::Skipped);
        assert_eq!(receipt.publish, StepOutcome::Skipped);
        assert_eq!(receipt.durable_append, StepOutcome::Skipped);
        assert!(!receipt.fully_completed());
    }
}
