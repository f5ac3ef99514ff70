//! Shared domain primitives: identifiers and error types.

mod errors;
mod ids;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{LeadId, ProId, SessionId, UserId};
