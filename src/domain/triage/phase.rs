//! Conversation phase state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro-state of a triage conversation.
///
/// # Transitions
///
/// Phases only move forward: `Assessment -> Guidance -> Stop` or
/// `Assessment -> Stop`. Once a session reaches `Stop` a terminal
/// diagnosis exists and a new session must be started for a new project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Still gathering information; the default/initial state.
    #[default]
    Assessment,
    /// Enough is known to give interim DIY advice without handoff.
    Guidance,
    /// A terminal diagnosis has been reached.
    Stop,
}

impl Phase {
    /// Whether a transition from `self` to `target` is legal.
    pub fn can_transition_to(&self, target: Phase) -> bool {
        match (self, target) {
            (Phase::Assessment, _) => true,
            (Phase::Guidance, Phase::Guidance) | (Phase::Guidance, Phase::Stop) => true,
            (Phase::Stop, Phase::Stop) => true,
            _ => false,
        }
    }

    /// Applies a proposed transition, keeping the current phase if the
    /// proposal would move backwards.
    pub fn clamp(&self, proposed: Phase) -> Phase {
        if self.can_transition_to(proposed) {
            proposed
        } else {
            *self
        }
    }

    /// Whether this phase is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Stop)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Assessment => "ASSESSMENT",
            Phase::Guidance => "GUIDANCE",
            Phase::Stop => "STOP",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessment_can_reach_any_phase() {
        assert!(Phase::Assessment.can_transition_to(Phase::Assessment));
        assert!(Phase::Assessment.can_transition_to(Phase::Guidance));
        assert!(Phase::Assessment.can_transition_to(Phase::Stop));
    }

    #[test]
    fn guidance_cannot_return_to_assessment() {
        assert!(!Phase::Guidance.can_transition_to(Phase::Assessment));
        assert!(Phase::Guidance.can_transition_to(Phase::Stop));
    }

    #[test]
    fn stop_is_terminal() {
        assert!(!Phase::Stop.can_transition_to(Phase::Assessment));
        assert!(!Phase::Stop.can_transition_to(Phase::Guidance));
        assert!(Phase::Stop.can_transition_to(Phase::Stop));
        assert!(Phase::Stop.is_terminal());
    }

    #[test]
    fn clamp_ignores_backward_proposals() {
        assert_eq!(Phase::Stop.clamp(Phase::Assessment), Phase::Stop);
        assert_eq!(Phase::Guidance.clamp(Phase::Assessment), Phase::Guidance);
        assert_eq!(Phase::Assessment.clamp(Phase::Guidance), Phase::Guidance);
    }

    #[test]
    fn phase_serializes_screaming_snake() {
        let json = serde_json::to_string(&Phase::Assessment).unwrap();
        assert_eq!(json, "\"ASSESSMENT\"");
        let parsed: Phase = serde_json::from_str("\"STOP\"").unwrap();
        assert_eq!(parsed, Phase::Stop);
    }
}
