//! Risk Classifier Port - the contract the engine requires from any
//! classifier implementation (LLM-backed or otherwise).
//!
//! This boundary is the one place a model can be substituted without
//! touching the state machine. The engine hands over the capped history,
//! the confirmed values, and every question already asked (so the
//! classifier is contractually forbidden from re-asking one); it gets
//! back a strictly validated assessment.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::triage::{Diagnosis, Phase, Turn};

/// What the engine sends to the classifier each turn.
#[derive(Debug, Clone)]
pub struct AssessmentRequest {
    /// Full (capped) conversation history including the latest user turn.
    pub history: Vec<Turn>,
    /// Facts confirmed so far.
    pub confirmed_values: Map<String, Value>,
    /// Questions already asked; must not be repeated.
    pub questions_asked: Vec<String>,
}

/// Structured result of one classifier call.
#[derive(Debug, Clone)]
pub struct Assessment {
    /// Whether the classifier wants another turn of questions.
    pub needs_more_info: bool,
    /// Follow-up questions to put to the user.
    pub questions: Vec<String>,
    /// Newly confirmed facts, deep-merged into the session state.
    pub confirmed_values_delta: Map<String, Value>,
    /// Inferred project category, if the classifier has one.
    pub task: Option<String>,
    /// Terminal diagnosis; present when the conversation can finalize.
    pub diagnosis: Option<Diagnosis>,
    /// Phase the classifier proposes for the session.
    pub phase: Phase,
}

/// Errors from the classifier boundary.
#[derive(Debug, Clone, Error)]
pub enum ClassifierError {
    #[error("Classifier call timed out")]
    Timeout,

    #[error("Classifier returned malformed output: {0}")]
    Malformed(String),

    #[error("Classifier unavailable: {0}")]
    Unavailable(String),
}

impl ClassifierError {
    /// Transient failures are recovered conversationally: the turn is not
    /// persisted past the raw history append and the caller is told to
    /// rephrase. Anything else surfaces as a generic failure.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClassifierError::Timeout | ClassifierError::Malformed(_))
    }
}

/// Port for the risk classifier collaborator.
#[async_trait]
pub trait RiskClassifier: Send + Sync {
    /// Assesses the conversation so far.
    async fn assess(&self, request: AssessmentRequest) -> Result<Assessment, ClassifierError>;
}
