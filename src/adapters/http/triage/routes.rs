//! HTTP routes for the triage endpoint.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health, post_triage, TriageAppState};

/// Creates the triage router.
pub fn triage_router(state: TriageAppState) -> Router {
    Router::new()
        .route("/api/triage", post(post_triage))
        .route("/health", get(health))
        .with_state(state)
}
