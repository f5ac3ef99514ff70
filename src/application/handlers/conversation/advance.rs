//! AdvanceConversationHandler - apply one user turn to a triage session.
//!
//! Implements the conversation state machine: load (or lazily create)
//! the session, consult the risk classifier with the capped history,
//! deduplicate its questions against everything already asked, and
//! persist the turn as one atomic update.
//!
//! The per-session lock lives inside the store; the classifier call
//! happens against a working copy, so no lock is held across the
//! network suspension.

use std::sync::Arc;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::triage::{Diagnosis, Phase, ProjectState, StateUpdate, Turn};
use crate::ports::{
    AssessmentRequest, ClassifierError, RiskClassifier, SessionStore, SessionStoreError,
};

/// Command carrying one user message for a session.
#[derive(Debug, Clone)]
pub struct AdvanceConversationCommand {
    pub session_id: SessionId,
    pub message: String,
    pub user_id: Option<UserId>,
}

/// What this turn produced for the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The classifier wants more information.
    NeedsMoreInfo { questions: Vec<String>, phase: Phase },
    /// The conversation advanced without new questions or a terminal
    /// diagnosis; interim guidance applies.
    Guidance { phase: Phase },
    /// A terminal diagnosis was reached; handoff evaluation follows.
    Finalized { diagnosis: Diagnosis },
    /// Transient classifier failure; the user turn was kept and the
    /// caller should rephrase and retry.
    Retry,
}

/// Result of advancing a conversation by one turn.
#[derive(Debug, Clone)]
pub struct AdvanceConversationResult {
    pub state: ProjectState,
    pub outcome: TurnOutcome,
}

/// Fatal errors from advancing a conversation. Transient classifier
/// failures are not errors; they surface as [`TurnOutcome::Retry`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum AdvanceConversationError {
    #[error("Session store failure: {0}")]
    Store(String),

    #[error("Classifier failure: {0}")]
    Classifier(String),
}

impl From<SessionStoreError> for AdvanceConversationError {
    fn from(err: SessionStoreError) -> Self {
        AdvanceConversationError::Store(err.to_string())
    }
}

/// Handler applying one user turn to a session.
pub struct AdvanceConversationHandler {
    store: Arc<dyn SessionStore>,
    classifier: Arc<dyn RiskClassifier>,
}

impl AdvanceConversationHandler {
    pub fn new(store: Arc<dyn SessionStore>, classifier: Arc<dyn RiskClassifier>) -> Self {
        Self { store, classifier }
    }

    pub async fn handle(
        &self,
        cmd: AdvanceConversationCommand,
    ) -> Result<AdvanceConversationResult, AdvanceConversationError> {
        let user_turn = Turn::user(cmd.message.clone());

        // Working copy with the incoming turn applied; nothing is
        // persisted until the classifier has answered.
        let prior = match self.store.get(cmd.session_id).await {
            Ok(state) => state,
            Err(SessionStoreError::NotFound(_)) => {
                ProjectState::new(cmd.session_id, cmd.user_id.clone())
            }
            Err(other) => return Err(other.into()),
        };
        let working = prior.apply(StateUpdate::turns_only(vec![user_turn.clone()]));

        let request = AssessmentRequest {
            history: working.conversation_history.clone(),
            confirmed_values: working.confirmed_values.clone(),
            questions_asked: working.questions_asked.clone(),
        };

        let assessment = match self.classifier.assess(request).await {
            Ok(assessment) => assessment,
            Err(err) if err.is_transient() => {
                tracing::warn!(
                    session_id = %cmd.session_id,
                    error = %err,
                    "classifier failed transiently; keeping user turn only"
                );
                // Keep the raw user turn so a retry resumes with full
                // context, but advance nothing else.
                let state = self
                    .store
                    .update(
                        cmd.session_id,
                        StateUpdate::turns_only(vec![user_turn]),
                        cmd.user_id,
                    )
                    .await?;
                return Ok(AdvanceConversationResult {
                    state,
                    outcome: TurnOutcome::Retry,
                });
            }
            Err(err) => return Err(AdvanceConversationError::Classifier(err.to_string())),
        };

        // Guardrail: drop questions the classifier repeated. The
        // conversation must visibly progress turn over turn.
        let questions = working.unseen_questions(&assessment.questions);
        if questions.len() < assessment.questions.len() {
            tracing::debug!(
                session_id = %cmd.session_id,
                dropped = assessment.questions.len() - questions.len(),
                "classifier repeated already-asked questions"
            );
        }

        let mut phase = working.phase.clamp(assessment.phase);
        if assessment.needs_more_info && questions.is_empty() && phase == Phase::Assessment {
            // The classifier has nothing new to ask; an empty, silent
            // reply is worse than moving on toward a diagnosis.
            phase = Phase::Guidance;
        }

        let assistant_turn = Turn::assistant(assistant_reply(&questions, &assessment.diagnosis));
        let update = StateUpdate {
            confirmed_values: Some(assessment.confirmed_values_delta),
            questions: questions.clone(),
            phase: Some(phase),
            task: assessment.task,
            turns: vec![user_turn, assistant_turn],
        };

        let state = self.store.update(cmd.session_id, update, cmd.user_id).await?;

        let outcome = match (&state.phase, assessment.diagnosis) {
            (Phase::Stop, Some(diagnosis)) => TurnOutcome::Finalized { diagnosis },
            _ if !questions.is_empty() => TurnOutcome::NeedsMoreInfo {
                questions,
                phase: state.phase,
            },
            _ => TurnOutcome::Guidance { phase: state.phase },
        };

        Ok(AdvanceConversationResult { state, outcome })
    }
}

/// Renders the assistant's side of the turn for the history record.
fn assistant_reply(questions: &[String], diagnosis: &Option<Diagnosis>) -> String {
    if !questions.is_empty() {
        questions.join(" ")
    } else if let Some(diagnosis) = diagnosis {
        diagnosis.issue.clone()
    } else {
        "Here is what to do next based on what we know so far.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemorySessionStore, MockRiskClassifier};
    use crate::domain::triage::RiskLevel;
    use crate::ports::Assessment;
    use serde_json::{json, Map, Value};

    fn as_map(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    fn asking(questions: &[&str]) -> Assessment {
        Assessment {
            needs_more_info: true,
            questions: questions.iter().map(|q| q.to_string()).collect(),
            confirmed_values_delta: Map::new(),
            task: None,
            diagnosis: None,
            phase: Phase::Assessment,
        }
    }

    fn finalizing(risk: RiskLevel, diy_allowed: bool) -> Assessment {
        Assessment {
            needs_more_info: false,
            questions: Vec::new(),
            confirmed_values_delta: Map::new(),
            task: None,
            diagnosis: Some(Diagnosis {
                issue: "supply line leak".to_string(),
                risk,
                diy_allowed,
            }),
            phase: Phase::Stop,
        }
    }

    fn handler(
        store: Arc<InMemorySessionStore>,
        classifier: Arc<MockRiskClassifier>,
    ) -> AdvanceConversationHandler {
        AdvanceConversationHandler::new(store, classifier)
    }

    fn cmd(session_id: SessionId, message: &str) -> AdvanceConversationCommand {
        AdvanceConversationCommand {
            session_id,
            message: message.to_string(),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn first_turn_creates_session_and_asks_questions() {
        let store = Arc::new(InMemorySessionStore::default());
        let classifier =
            Arc::new(MockRiskClassifier::new().with_assessment(asking(&["Where is the leak?"])));
        let handler = handler(store.clone(), classifier);

        let session_id = SessionId::new();
        let result = handler.handle(cmd(session_id, "replacing faucet")).await.unwrap();

        assert_eq!(
            result.outcome,
            TurnOutcome::NeedsMoreInfo {
                questions: vec!["Where is the leak?".to_string()],
                phase: Phase::Assessment,
            }
        );
        // User + assistant turns persisted.
        let state = store.get(session_id).await.unwrap();
        assert_eq!(state.conversation_history.len(), 2);
        assert_eq!(state.questions_asked, vec!["Where is the leak?"]);
    }

    #[tokio::test]
    async fn classifier_sees_capped_history_and_asked_questions() {
        let store = Arc::new(InMemorySessionStore::default());
        let classifier = Arc::new(
            MockRiskClassifier::new()
                .with_assessment(asking(&["Where is the leak?"]))
                .with_assessment(asking(&["How old is the faucet?"])),
        );
        let handler = handler(store.clone(), classifier.clone());

        let session_id = SessionId::new();
        handler.handle(cmd(session_id, "replacing faucet")).await.unwrap();
        handler.handle(cmd(session_id, "kitchen")).await.unwrap();

        let request = classifier.last_request().unwrap();
        assert_eq!(request.questions_asked, vec!["Where is the leak?"]);
        // prior user+assistant turns plus the new user turn
        assert_eq!(request.history.len(), 3);
    }

    #[tokio::test]
    async fn repeated_questions_are_not_persisted_or_echoed() {
        let store = Arc::new(InMemorySessionStore::default());
        let classifier = Arc::new(
            MockRiskClassifier::new()
                .with_assessment(asking(&["Where is the leak?"]))
                .with_assessment(asking(&["Where is the leak?", "Any water damage?"])),
        );
        let handler = handler(store.clone(), classifier);

        let session_id = SessionId::new();
        handler.handle(cmd(session_id, "faucet leaks")).await.unwrap();
        let result = handler.handle(cmd(session_id, "kitchen")).await.unwrap();

        assert_eq!(
            result.outcome,
            TurnOutcome::NeedsMoreInfo {
                questions: vec!["Any water damage?".to_string()],
                phase: Phase::Assessment,
            }
        );
        let state = store.get(session_id).await.unwrap();
        assert_eq!(
            state.questions_asked,
            vec!["Where is the leak?", "Any water damage?"]
        );
    }

    #[tokio::test]
    async fn all_questions_repeated_forces_phase_forward() {
        let store = Arc::new(InMemorySessionStore::default());
        let classifier = Arc::new(
            MockRiskClassifier::new()
                .with_assessment(asking(&["Where is the leak?"]))
                .with_assessment(asking(&["Where is the leak?"])),
        );
        let handler = handler(store.clone(), classifier);

        let session_id = SessionId::new();
        handler.handle(cmd(session_id, "faucet leaks")).await.unwrap();
        let result = handler.handle(cmd(session_id, "kitchen")).await.unwrap();

        assert_eq!(
            result.outcome,
            TurnOutcome::Guidance {
                phase: Phase::Guidance
            }
        );
        let state = store.get(session_id).await.unwrap();
        assert_eq!(state.phase, Phase::Guidance);
    }

    #[tokio::test]
    async fn stop_with_diagnosis_finalizes() {
        let store = Arc::new(InMemorySessionStore::default());
        let classifier =
            Arc::new(MockRiskClassifier::new().with_assessment(finalizing(RiskLevel::High, false)));
        let handler = handler(store.clone(), classifier);

        let session_id = SessionId::new();
        let result = handler.handle(cmd(session_id, "water everywhere")).await.unwrap();

        match result.outcome {
            TurnOutcome::Finalized { diagnosis } => {
                assert_eq!(diagnosis.risk, RiskLevel::High);
            }
            other => panic!("expected Finalized, got {:?}", other),
        }
        assert_eq!(store.get(session_id).await.unwrap().phase, Phase::Stop);
    }

    #[tokio::test]
    async fn transient_failure_keeps_user_turn_and_nothing_else() {
        let store = Arc::new(InMemorySessionStore::default());
        let classifier = Arc::new(MockRiskClassifier::new().with_error(ClassifierError::Timeout));
        let handler = handler(store.clone(), classifier);

        let session_id = SessionId::new();
        let result = handler.handle(cmd(session_id, "faucet leaks")).await.unwrap();

        assert_eq!(result.outcome, TurnOutcome::Retry);
        let state = store.get(session_id).await.unwrap();
        assert_eq!(state.conversation_history.len(), 1);
        assert_eq!(state.phase, Phase::Assessment);
        assert!(state.questions_asked.is_empty());
    }

    #[tokio::test]
    async fn retry_after_transient_failure_resumes_from_same_point() {
        let store = Arc::new(InMemorySessionStore::default());
        let classifier = Arc::new(
            MockRiskClassifier::new()
                .with_error(ClassifierError::Malformed("garbage".to_string()))
                .with_assessment(asking(&["Where is the leak?"])),
        );
        let handler = handler(store.clone(), classifier.clone());

        let session_id = SessionId::new();
        handler.handle(cmd(session_id, "faucet leaks")).await.unwrap();
        let result = handler.handle(cmd(session_id, "faucet leaks")).await.unwrap();

        assert!(matches!(result.outcome, TurnOutcome::NeedsMoreInfo { .. }));
        // The failed turn's user message is still part of the context.
        let request = classifier.last_request().unwrap();
        assert_eq!(request.history.len(), 2);
    }

    #[tokio::test]
    async fn non_transient_failure_surfaces_as_error() {
        let store = Arc::new(InMemorySessionStore::default());
        let classifier = Arc::new(
            MockRiskClassifier::new()
                .with_error(ClassifierError::Unavailable("boom".to_string())),
        );
        let handler = handler(store.clone(), classifier);

        let result = handler.handle(cmd(SessionId::new(), "faucet leaks")).await;
        assert!(matches!(result, Err(AdvanceConversationError::Classifier(_))));
    }

    #[tokio::test]
    async fn phase_never_regresses_after_stop() {
        let store = Arc::new(InMemorySessionStore::default());
        let regressing = Assessment {
            phase: Phase::Assessment,
            ..asking(&["What else?"])
        };
        let classifier = Arc::new(
            MockRiskClassifier::new()
                .with_assessment(finalizing(RiskLevel::Low, true))
                .with_assessment(regressing),
        );
        let handler = handler(store.clone(), classifier);

        let session_id = SessionId::new();
        handler.handle(cmd(session_id, "leak fixed?")).await.unwrap();
        handler.handle(cmd(session_id, "one more thing")).await.unwrap();

        assert_eq!(store.get(session_id).await.unwrap().phase, Phase::Stop);
    }

    #[tokio::test]
    async fn confirmed_values_accumulate_across_turns() {
        let store = Arc::new(InMemorySessionStore::default());
        let first = Assessment {
            confirmed_values_delta: as_map(json!({"location": "kitchen", "details": {"type": "sink"}})),
            ..asking(&["What brand?"])
        };
        let second = Assessment {
            confirmed_values_delta: as_map(json!({"details": {"brand": "kohler"}})),
            ..asking(&["How old?"])
        };
        let classifier = Arc::new(
            MockRiskClassifier::new()
                .with_assessment(first)
                .with_assessment(second),
        );
        let handler = handler(store.clone(), classifier);

        let session_id = SessionId::new();
        handler.handle(cmd(session_id, "sink problem")).await.unwrap();
        handler.handle(cmd(session_id, "it's a kohler")).await.unwrap();

        let state = store.get(session_id).await.unwrap();
        assert_eq!(
            Value::Object(state.confirmed_values),
            json!({
                "location": "kitchen",
                "details": {"type": "sink", "brand": "kohler"}
            })
        );
    }
}
