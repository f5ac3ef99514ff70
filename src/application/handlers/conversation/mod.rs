//! Conversation state machine handler.

mod advance;

pub use advance::{
    AdvanceConversationCommand, AdvanceConversationError, AdvanceConversationHandler,
    AdvanceConversationResult, TurnOutcome,
};
