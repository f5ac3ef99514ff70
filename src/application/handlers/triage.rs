//! TriageService - orchestrates one triage turn end to end.
//!
//! Advances the conversation, and when a turn finalizes, applies the
//! handoff decision: DIY guidance, diagnosis-only, or a pro handoff
//! (idempotent lead creation plus pro matching).
//!
//! Pro matching is best-effort: a directory outage degrades the response
//! to an empty match list, the lead having already been created.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::handoff::{decide, ContactInfo, HandoffDecision};
use crate::domain::matching::{normalize_trade, MatchedPro};
use crate::domain::triage::{Diagnosis, Phase};

use super::conversation::{
    AdvanceConversationCommand, AdvanceConversationError, AdvanceConversationHandler, TurnOutcome,
};
use super::leads::{CreateLeadCommand, CreateLeadError, CreateLeadHandler};
use super::matching::{MatchProsHandler, MatchProsQuery};

/// Fallback trade when neither the request nor the session names one.
const DEFAULT_SERVICE_TYPE: &str = "handyman";

/// Message returned in place of questions when the classifier failed
/// transiently and the turn should be retried.
const RETRY_PROMPT: &str =
    "Sorry, I had trouble with that. Could you describe the issue again, maybe in different words?";

/// One triage turn from the caller.
#[derive(Debug, Clone)]
pub struct TriageRequest {
    /// Absent on the first turn; the service mints a session id.
    pub session_id: Option<SessionId>,
    pub description: String,
    /// Image URLs attached to the message, if any.
    pub images: Vec<String>,
    pub contact: ContactInfo,
    /// Caller-declared trade; falls back to the task inferred in
    /// conversation, then to [`DEFAULT_SERVICE_TYPE`].
    pub trade: Option<String>,
    pub user_id: Option<UserId>,
}

/// What the turn resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum TriageOutcome {
    /// The conversation continues; `questions` may be empty when the
    /// turn produced interim guidance instead.
    InProgress {
        needs_more_info: bool,
        questions: Vec<String>,
        phase: Phase,
    },
    /// Finalized; the caller can handle it themselves.
    Diy { diagnosis: Diagnosis },
    /// Finalized and pro-worthy, but contact info was incomplete, so no
    /// lead or match was produced.
    DiagnosisOnly { diagnosis: Diagnosis },
    /// Finalized with a handoff: lead created, pros matched.
    ProRecommended {
        diagnosis: Diagnosis,
        lead_id: crate::domain::foundation::LeadId,
        matched_pros: Vec<MatchedPro>,
    },
}

/// Response for one triage turn.
#[derive(Debug, Clone)]
pub struct TriageResponse {
    pub session_id: SessionId,
    pub outcome: TriageOutcome,
}

/// Errors surfaced to the transport layer.
#[derive(Debug, Clone, Error)]
pub enum TriageError {
    #[error("{0}")]
    Conversation(#[from] AdvanceConversationError),

    #[error("{0}")]
    Lead(#[from] CreateLeadError),

    #[error("Message must not be empty")]
    EmptyMessage,
}

/// Orchestrator for the triage flow.
pub struct TriageService {
    conversation: Arc<AdvanceConversationHandler>,
    leads: Arc<CreateLeadHandler>,
    matching: Arc<MatchProsHandler>,
}

impl TriageService {
    pub fn new(
        conversation: Arc<AdvanceConversationHandler>,
        leads: Arc<CreateLeadHandler>,
        matching: Arc<MatchProsHandler>,
    ) -> Self {
        Self {
            conversation,
            leads,
            matching,
        }
    }

    pub async fn triage(&self, request: TriageRequest) -> Result<TriageResponse, TriageError> {
        if request.description.trim().is_empty() {
            return Err(TriageError::EmptyMessage);
        }

        let session_id = request.session_id.unwrap_or_else(SessionId::new);
        let message = render_message(&request.description, &request.images);

        let advanced = self
            .conversation
            .handle(AdvanceConversationCommand {
                session_id,
                message,
                user_id: request.user_id.clone(),
            })
            .await?;

        let outcome = match advanced.outcome {
            TurnOutcome::NeedsMoreInfo { questions, phase } => TriageOutcome::InProgress {
                needs_more_info: true,
                questions,
                phase,
            },
            TurnOutcome::Guidance { phase } => TriageOutcome::InProgress {
                needs_more_info: false,
                questions: Vec::new(),
                phase,
            },
            TurnOutcome::Retry => TriageOutcome::InProgress {
                needs_more_info: true,
                questions: vec![RETRY_PROMPT.to_string()],
                phase: advanced.state.phase,
            },
            TurnOutcome::Finalized { diagnosis } => {
                let service_type = service_type(&request.trade, &advanced.state.task);
                self.finalize(session_id, diagnosis, &request.contact, service_type)
                    .await?
            }
        };

        Ok(TriageResponse {
            session_id,
            outcome,
        })
    }

    async fn finalize(
        &self,
        session_id: SessionId,
        diagnosis: Diagnosis,
        contact: &ContactInfo,
        service_type: String,
    ) -> Result<TriageOutcome, TriageError> {
        match decide(&diagnosis, contact) {
            HandoffDecision::Diy => Ok(TriageOutcome::Diy { diagnosis }),
            HandoffDecision::DiagnosisOnly => {
                info!(session_id = %session_id, "Handoff criteria met but contact incomplete");
                Ok(TriageOutcome::DiagnosisOnly { diagnosis })
            }
            HandoffDecision::ProRecommended => {
                let lead = self
                    .leads
                    .handle(CreateLeadCommand {
                        session_id,
                        service_type: service_type.clone(),
                        diagnosis: diagnosis.clone(),
                        contact: contact.clone(),
                    })
                    .await?;

                let matched_pros = match self
                    .matching
                    .handle(MatchProsQuery {
                        trade: service_type,
                        contact: contact.clone(),
                        limit: None,
                    })
                    .await
                {
                    Ok(pros) => pros,
                    Err(e) => {
                        warn!(
                            session_id = %session_id,
                            error = %e,
                            "Pro matching failed, returning lead without matches"
                        );
                        Vec::new()
                    }
                };

                Ok(TriageOutcome::ProRecommended {
                    diagnosis,
                    lead_id: lead.id,
                    matched_pros,
                })
            }
        }
    }
}

/// Folds attached image references into the message seen by the
/// classifier boundary.
fn render_message(description: &str, images: &[String]) -> String {
    if images.is_empty() {
        description.to_string()
    } else {
        let mut message = description.to_string();
        message.push_str("\n\nAttached images:\n");
        for url in images {
            message.push_str(url);
            message.push('\n');
        }
        message
    }
}

fn service_type(requested: &Option<String>, inferred: &Option<String>) -> String {
    requested
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .or(inferred.as_deref())
        .map(normalize_trade)
        .unwrap_or_else(|| DEFAULT_SERVICE_TYPE.to_string())
}
