//! Shared application state for Axum routers.

use crate::intake::IntakeService;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// The intake coordinator, holding the injected adapter handles.
    pub intake: IntakeService,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(intake: IntakeService) -> Self {
        Self {
            intake,
            start_time: std::time::Instant::now(),
        }
    }
}

// Use macro to reduce boilerplate for FromRef implementations
crate::impl_from_ref!(IntakeService, intake);
crate::impl_from_ref!(std::time::Instant, start_time);
