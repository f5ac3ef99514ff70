//! Mock Risk Classifier for testing.
//!
//! Scripted implementation of the [`RiskClassifier`] port: responses are
//! consumed in order, errors can be injected, and every request is
//! recorded for verification.
//!
//! # Example
//!
//! ```ignore
//! let classifier = MockRiskClassifier::new()
//!     .with_assessment(ask_more(vec!["Where is the leak?"]))
//!     .with_error(ClassifierError::Timeout);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{Assessment, AssessmentRequest, ClassifierError, RiskClassifier};

/// Scripted mock implementation of [`RiskClassifier`].
#[derive(Debug, Clone, Default)]
pub struct MockRiskClassifier {
    responses: Arc<Mutex<VecDeque<Result<Assessment, ClassifierError>>>>,
    calls: Arc<Mutex<Vec<AssessmentRequest>>>,
    delay: Option<Duration>,
}

impl MockRiskClassifier {
    /// Creates a mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful assessment.
    pub fn with_assessment(self, assessment: Assessment) -> Self {
        self.responses
            .lock()
            .expect("mock lock")
            .push_back(Ok(assessment));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: ClassifierError) -> Self {
        self.responses
            .lock()
            .expect("mock lock")
            .push_back(Err(error));
        self
    }

    /// Adds a fixed latency to every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of assess calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock lock").len()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<AssessmentRequest> {
        self.calls.lock().expect("mock lock").last().cloned()
    }
}

#[async_trait]
impl RiskClassifier for MockRiskClassifier {
    async fn assess(&self, request: AssessmentRequest) -> Result<Assessment, ClassifierError> {
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }

        self.calls.lock().expect("mock lock").push(request);

        self.responses
            .lock()
            .expect("mock lock")
            .pop_front()
            .unwrap_or_else(|| {
                Err(ClassifierError::Unavailable(
                    "mock classifier has no scripted response".to_string(),
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::triage::{Phase, Turn};
    use serde_json::Map;

    fn ask(question: &str) -> Assessment {
        Assessment {
            needs_more_info: true,
            questions: vec![question.to_string()],
            confirmed_values_delta: Map::new(),
            task: None,
            diagnosis: None,
            phase: Phase::Assessment,
        }
    }

    fn request() -> AssessmentRequest {
        AssessmentRequest {
            history: vec![Turn::user("my faucet leaks")],
            confirmed_values: Map::new(),
            questions_asked: Vec::new(),
        }
    }

    #[tokio::test]
    async fn responses_are_consumed_in_order() {
        let classifier = MockRiskClassifier::new()
            .with_assessment(ask("first?"))
            .with_assessment(ask("second?"));

        let a = classifier.assess(request()).await.unwrap();
        let b = classifier.assess(request()).await.unwrap();

        assert_eq!(a.questions, vec!["first?"]);
        assert_eq!(b.questions, vec!["second?"]);
    }

    #[tokio::test]
    async fn injected_errors_are_returned() {
        let classifier = MockRiskClassifier::new().with_error(ClassifierError::Timeout);
        let result = classifier.assess(request()).await;
        assert!(matches!(result, Err(ClassifierError::Timeout)));
    }

    #[tokio::test]
    async fn exhausted_script_reports_unavailable() {
        let classifier = MockRiskClassifier::new();
        let result = classifier.assess(request()).await;
        assert!(matches!(result, Err(ClassifierError::Unavailable(_))));
    }

    #[tokio::test]
    async fn calls_are_recorded() {
        let classifier = MockRiskClassifier::new().with_assessment(ask("q?"));
        classifier.assess(request()).await.unwrap();

        assert_eq!(classifier.call_count(), 1);
        let recorded = classifier.last_request().unwrap();
        assert_eq!(recorded.history.len(), 1);
    }
}
