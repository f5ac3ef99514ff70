//! Per-session conversation record.
//!
//! `ProjectState` is pure data plus the invariant-preserving update logic.
//! It is only ever mutated through [`ProjectState::apply`], which computes
//! the merged state into a fresh value so a failed update can never leave
//! a partially-merged record behind.
//!
//! # Invariants
//!
//! - `session_id` is immutable after creation
//! - `conversation_history.len() <= MAX_HISTORY_TURNS` after any update
//! - `confirmed_values` is append/merge-only; no update deletes a key
//! - `questions_asked` is append-only and free of exact duplicates
//! - `phase` only moves forward (see [`Phase::can_transition_to`])
//! - `task` may be refined but never unset

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{SessionId, UserId};

use super::merge::deep_merge;
use super::phase::Phase;

/// Hard cap on retained conversation turns. Older turns are dropped,
/// never the current one.
pub const MAX_HISTORY_TURNS: usize = 20;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// A single turn in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Creates a user turn stamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Creates an assistant turn stamped now.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Partial update applied to a `ProjectState` in one atomic step.
///
/// `confirmed_values` is deep-merged; `phase` and `task` are shallow
/// overwrites (phase clamped to legal transitions); `turns` and
/// `questions` are appended.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub confirmed_values: Option<Map<String, Value>>,
    pub questions: Vec<String>,
    pub phase: Option<Phase>,
    pub task: Option<String>,
    pub turns: Vec<Turn>,
}

impl StateUpdate {
    /// An update that only appends conversation turns.
    ///
    /// Used when a classifier call fails: the raw user turn is kept so a
    /// retry resumes with full context, but no phase or question state
    /// advances.
    pub fn turns_only(turns: Vec<Turn>) -> Self {
        Self {
            turns,
            ..Self::default()
        }
    }
}

/// The per-session conversation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    pub session_id: SessionId,
    /// Inferred project category, e.g. "faucet_replacement".
    pub task: Option<String>,
    /// Facts established through the conversation, deep-merged per turn.
    pub confirmed_values: Map<String, Value>,
    /// Every question the classifier has asked, in order, deduplicated.
    pub questions_asked: Vec<String>,
    pub phase: Phase,
    pub conversation_history: Vec<Turn>,
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl ProjectState {
    /// Creates a fresh default state for a session.
    pub fn new(session_id: SessionId, user_id: Option<UserId>) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            task: None,
            confirmed_values: Map::new(),
            questions_asked: Vec::new(),
            phase: Phase::Assessment,
            conversation_history: Vec::new(),
            user_id,
            created_at: now,
            last_updated: now,
        }
    }

    /// Filters `proposed` down to questions not already asked in this
    /// session, also dropping exact duplicates within the batch.
    pub fn unseen_questions(&self, proposed: &[String]) -> Vec<String> {
        let mut accepted: Vec<String> = Vec::new();
        for q in proposed {
            if self.questions_asked.iter().any(|asked| asked == q) {
                continue;
            }
            if accepted.iter().any(|a| a == q) {
                continue;
            }
            accepted.push(q.clone());
        }
        accepted
    }

    /// Applies an update, returning the merged state as a new value.
    ///
    /// The receiver is untouched; callers swap the result in only after
    /// the whole merge has succeeded.
    pub fn apply(&self, update: StateUpdate) -> ProjectState {
        let mut next = self.clone();

        if let Some(patch) = update.confirmed_values {
            deep_merge(&mut next.confirmed_values, &patch);
        }

        for q in self.unseen_questions(&update.questions) {
            next.questions_asked.push(q);
        }

        if let Some(proposed) = update.phase {
            next.phase = next.phase.clamp(proposed);
        }

        if let Some(task) = update.task {
            // Task can be refined but never unset.
            if !task.trim().is_empty() {
                next.task = Some(task);
            }
        }

        next.conversation_history.extend(update.turns);
        let len = next.conversation_history.len();
        if len > MAX_HISTORY_TURNS {
            next.conversation_history.drain(0..len - MAX_HISTORY_TURNS);
        }

        next.last_updated = Utc::now();
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_state() -> ProjectState {
        ProjectState::new(SessionId::new(), None)
    }

    fn patch(v: Value) -> Option<Map<String, Value>> {
        match v {
            Value::Object(m) => Some(m),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn new_state_starts_in_assessment() {
        let state = test_state();
        assert_eq!(state.phase, Phase::Assessment);
        assert!(state.conversation_history.is_empty());
        assert!(state.questions_asked.is_empty());
        assert!(state.confirmed_values.is_empty());
        assert!(state.task.is_none());
    }

    #[test]
    fn apply_deep_merges_confirmed_values() {
        let state = test_state().apply(StateUpdate {
            confirmed_values: patch(json!({"location": "kitchen", "details": {"type": "sink"}})),
            ..StateUpdate::default()
        });

        let state = state.apply(StateUpdate {
            confirmed_values: patch(json!({"details": {"brand": "kohler"}})),
            ..StateUpdate::default()
        });

        assert_eq!(
            Value::Object(state.confirmed_values),
            json!({
                "location": "kitchen",
                "details": {"type": "sink", "brand": "kohler"}
            })
        );
    }

    #[test]
    fn apply_leaves_receiver_untouched() {
        let state = test_state();
        let _next = state.apply(StateUpdate {
            confirmed_values: patch(json!({"location": "kitchen"})),
            turns: vec![Turn::user("hello")],
            ..StateUpdate::default()
        });

        assert!(state.confirmed_values.is_empty());
        assert!(state.conversation_history.is_empty());
    }

    #[test]
    fn apply_caps_history_at_most_recent_turns() {
        let mut state = test_state();
        for i in 1..=25 {
            state = state.apply(StateUpdate::turns_only(vec![Turn::user(format!("turn {}", i))]));
        }

        assert_eq!(state.conversation_history.len(), MAX_HISTORY_TURNS);
        assert_eq!(state.conversation_history[0].content, "turn 6");
        assert_eq!(state.conversation_history[19].content, "turn 25");
    }

    #[test]
    fn apply_deduplicates_questions() {
        let state = test_state().apply(StateUpdate {
            questions: vec!["Where is the leak?".to_string()],
            ..StateUpdate::default()
        });

        let state = state.apply(StateUpdate {
            questions: vec![
                "Where is the leak?".to_string(),
                "How old is the faucet?".to_string(),
            ],
            ..StateUpdate::default()
        });

        assert_eq!(
            state.questions_asked,
            vec!["Where is the leak?", "How old is the faucet?"]
        );
    }

    #[test]
    fn apply_deduplicates_within_a_single_batch() {
        let state = test_state().apply(StateUpdate {
            questions: vec!["Is water shut off?".to_string(), "Is water shut off?".to_string()],
            ..StateUpdate::default()
        });

        assert_eq!(state.questions_asked, vec!["Is water shut off?"]);
    }

    #[test]
    fn unseen_questions_filters_already_asked() {
        let state = test_state().apply(StateUpdate {
            questions: vec!["Where is the leak?".to_string()],
            ..StateUpdate::default()
        });

        let unseen = state.unseen_questions(&[
            "Where is the leak?".to_string(),
            "Any water damage?".to_string(),
        ]);

        assert_eq!(unseen, vec!["Any water damage?"]);
    }

    #[test]
    fn apply_clamps_backward_phase_transitions() {
        let state = test_state().apply(StateUpdate {
            phase: Some(Phase::Stop),
            ..StateUpdate::default()
        });
        assert_eq!(state.phase, Phase::Stop);

        let state = state.apply(StateUpdate {
            phase: Some(Phase::Assessment),
            ..StateUpdate::default()
        });
        assert_eq!(state.phase, Phase::Stop);
    }

    #[test]
    fn apply_allows_forward_phase_transitions() {
        let state = test_state().apply(StateUpdate {
            phase: Some(Phase::Guidance),
            ..StateUpdate::default()
        });
        assert_eq!(state.phase, Phase::Guidance);

        let state = state.apply(StateUpdate {
            phase: Some(Phase::Stop),
            ..StateUpdate::default()
        });
        assert_eq!(state.phase, Phase::Stop);
    }

    #[test]
    fn apply_refines_but_never_unsets_task() {
        let state = test_state().apply(StateUpdate {
            task: Some("faucet_repair".to_string()),
            ..StateUpdate::default()
        });
        assert_eq!(state.task.as_deref(), Some("faucet_repair"));

        let state = state.apply(StateUpdate {
            task: Some("faucet_replacement".to_string()),
            ..StateUpdate::default()
        });
        assert_eq!(state.task.as_deref(), Some("faucet_replacement"));

        let state = state.apply(StateUpdate {
            task: Some("  ".to_string()),
            ..StateUpdate::default()
        });
        assert_eq!(state.task.as_deref(), Some("faucet_replacement"));
    }

    #[test]
    fn turns_only_update_does_not_advance_phase_or_questions() {
        let state = test_state().apply(StateUpdate::turns_only(vec![Turn::user("help")]));

        assert_eq!(state.phase, Phase::Assessment);
        assert!(state.questions_asked.is_empty());
        assert_eq!(state.conversation_history.len(), 1);
    }
}
