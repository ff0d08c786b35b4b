//! FUNNEL Core - Entity Types
//!
//! Pure data structures for the value-intake pipeline. The only behavior
//! in this crate is parse/validate on the inbound key; coordination logic
//! lives in funnel-api and the adapter traits live in funnel-storage.

pub mod error;
pub mod key;
pub mod receipt;
pub mod record;

pub use error::{BusError, CacheError, StoreError, SubmitError, ValidationError};
pub use key::{KeyDomain, ValueKey, DEFAULT_MAX_KEY};
pub use receipt::{Accepted, StepOutcome, SubmitReceipt};
pub use record::{CacheStatus, NotificationEvent, Timestamp, ValueRecord};
