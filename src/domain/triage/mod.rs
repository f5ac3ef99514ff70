//! Triage conversation domain: per-session project state, conversation
//! phases, and the risk-scored diagnosis value objects.

mod diagnosis;
mod merge;
mod phase;
mod project_state;

pub use diagnosis::{Diagnosis, RiskLevel};
pub use merge::deep_merge;
pub use phase::Phase;
pub use project_state::{
    ProjectState, StateUpdate, Turn, TurnRole, MAX_HISTORY_TURNS,
};
