//! HTTP adapter for the triage endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    DiagnosisDto, ErrorResponse, LeadRef, MatchedProDto, TriageRequestBody, TriageResponseBody,
};
pub use handlers::TriageAppState;
pub use routes::triage_router;
