//! Command handlers.

pub mod conversation;
pub mod leads;
pub mod matching;
pub mod triage;

pub use conversation::{
    AdvanceConversationCommand, AdvanceConversationError, AdvanceConversationHandler,
    AdvanceConversationResult, TurnOutcome,
};
pub use leads::{CreateLeadCommand, CreateLeadError, CreateLeadHandler};
pub use matching::{MatchProsError, MatchProsHandler, MatchProsQuery};
pub use triage::{TriageError, TriageOutcome, TriageRequest, TriageResponse, TriageService};
