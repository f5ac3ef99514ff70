//! Lead creation handler.

mod create_lead;

pub use create_lead::{CreateLeadCommand, CreateLeadError, CreateLeadHandler};
