//! Handoff domain: contact completeness, the DIY/pro decision, and the
//! lead record created when a session routes to a professional.

mod contact;
mod decision;
mod lead;

pub use contact::ContactInfo;
pub use decision::{decide, HandoffDecision};
pub use lead::Lead;
