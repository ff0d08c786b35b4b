//! Property-Based Tests for the Intake Contract
//!
//! For any input payload, the intake service SHALL either:
//! - accept it, leaving exactly one new record, one cache entry, and one
//!   notification per call, or
//! - reject it with a validation error and leave zero side effects.
//!
//! Acceptance is decided purely by the domain bound, never by backend
//! state or prior submits.

use funnel_core::{CacheStatus, KeyDomain, SubmitError};
use funnel_storage::StatusCache;
use proptest::prelude::*;
use serde_json::json;

mod test_support;
use test_support::{test_intake, test_intake_with_domain};

// ============================================================================
// PROPERTY TEST STRATEGIES
// ============================================================================

/// Arbitrary JSON payloads: in-domain and out-of-domain integers, their
/// string forms, and non-integer junk.
fn payload_strategy() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        // Integers around the domain boundary
        (-100i64..200).prop_map(|v| json!(v)),
        // The same range as wire strings
        (-100i64..200).prop_map(|v| json!(v.to_string())),
        // Non-integer payloads
        Just(json!(4.5)),
        Just(json!(true)),
        Just(json!(null)),
        "[a-z]{1,8}".prop_map(|s| json!(s)),
    ]
}

/// Whether a payload is an in-domain integer (directly or as a string).
fn expected_key(payload: &serde_json::Value, domain: &KeyDomain) -> Option<u32> {
    let int = match payload {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    domain.contains(int).then_some(int as u32)
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn submit_accepts_exactly_the_domain(payload in payload_strategy()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let domain = KeyDomain::default();
            let (intake, backends) = test_intake();

            let result = intake.submit(&payload).await;

            match expected_key(&payload, &domain) {
                Some(key) => {
                    let accepted = result.unwrap();
                    prop_assert_eq!(accepted.key.get(), key);
                    prop_assert!(accepted.receipt.fully_completed());

                    prop_assert_eq!(backends.store.stored().len(), 1);
                    prop_assert_eq!(backends.bus.published().len(), 1);
                    let snapshot = backends.cache.snapshot().await.unwrap();
                    prop_assert_eq!(snapshot.get(&key), Some(&CacheStatus::Pending));
                }
                None => {
                    prop_assert!(matches!(result, Err(SubmitError::Validation(_))));
                    prop_assert!(backends.store.stored().is_empty());
                    prop_assert!(backends.bus.published().is_empty());
                    prop_assert!(backends.cache.snapshot().await.unwrap().is_empty());
                }
            }
            Ok(())
        })?;
    }

    #[test]
    fn custom_bound_moves_the_acceptance_boundary(
        max_key in 0u32..100,
        value in 0i64..200,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let domain = KeyDomain::new(max_key);
            let (intake, _backends) = test_intake_with_domain(domain);

            let result = intake.submit(&json!(value)).await;
            if domain.contains(value) {
                prop_assert!(result.is_ok());
            } else {
                prop_assert!(matches!(result, Err(SubmitError::Validation(_))));
            }
            Ok(())
        })?;
    }

    #[test]
    fn repeated_submits_append_once_per_call(
        keys in proptest::collection::vec(0u32..=40, 1..20),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let (intake, backends) = test_intake();

            for key in &keys {
                intake.submit(&json!(key)).await.unwrap();
            }

            prop_assert_eq!(backends.store.stored().len(), keys.len());
            prop_assert_eq!(backends.bus.published().len(), keys.len());

            // The cache deduplicates by key; the store does not.
            let distinct: std::collections::HashSet<u32> = keys.iter().copied().collect();
            let snapshot = backends.cache.snapshot().await.unwrap();
            prop_assert_eq!(snapshot.len(), distinct.len());
            Ok(())
        })?;
    }
}
