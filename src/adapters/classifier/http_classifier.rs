//! HTTP Risk Classifier Adapter
//!
//! Calls a classifier service (typically an LLM gateway) over HTTP and
//! parses its JSON strictly into an [`Assessment`]. Any missing or
//! wrong-typed field is a [`ClassifierError::Malformed`], never a silent
//! coercion; timeouts map to [`ClassifierError::Timeout`] so the state
//! machine can recover conversationally.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::domain::triage::{Diagnosis, Phase, RiskLevel, Turn};
use crate::ports::{Assessment, AssessmentRequest, ClassifierError, RiskClassifier};

/// Configuration for the HTTP classifier.
#[derive(Debug, Clone)]
pub struct HttpRiskClassifierConfig {
    /// Full URL of the assess endpoint.
    pub endpoint: String,
    /// Bearer token, if the service requires one.
    api_key: Option<Secret<String>>,
    /// Per-call timeout. Must stay well under user-perceived latency.
    pub timeout: Duration,
}

impl HttpRiskClassifierConfig {
    /// Creates a configuration for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: Duration::from_secs(8),
        }
    }

    /// Sets the bearer token.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(key.into()));
        self
    }

    /// Sets the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP implementation of [`RiskClassifier`].
pub struct HttpRiskClassifier {
    config: HttpRiskClassifierConfig,
    client: Client,
}

impl HttpRiskClassifier {
    /// Creates a classifier client with the configured timeout.
    pub fn new(config: HttpRiskClassifierConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassifierError::Unavailable(e.to_string()))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl RiskClassifier for HttpRiskClassifier {
    async fn assess(&self, request: AssessmentRequest) -> Result<Assessment, ClassifierError> {
        let body = WireRequest {
            history: request.history,
            confirmed_values: Value::Object(request.confirmed_values),
            questions_asked: request.questions_asked,
        };

        let mut http_request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            http_request = http_request.bearer_auth(key.expose_secret());
        }

        let response = http_request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClassifierError::Timeout
            } else {
                ClassifierError::Unavailable(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(ClassifierError::Unavailable(format!(
                "classifier returned HTTP {}",
                response.status()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ClassifierError::Unavailable(e.to_string()))?;

        parse_assessment(&text)
    }
}

#[derive(Debug, Serialize)]
struct WireRequest {
    history: Vec<Turn>,
    confirmed_values: Value,
    questions_asked: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WireAssessment {
    needs_more_info: Option<bool>,
    questions: Option<Vec<String>>,
    confirmed_values_delta: Option<Value>,
    task: Option<String>,
    diagnosis: Option<WireDiagnosis>,
    phase: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireDiagnosis {
    issue: Option<String>,
    risk: Option<String>,
    diy_allowed: Option<bool>,
}

/// Parses classifier JSON into a validated [`Assessment`].
fn parse_assessment(text: &str) -> Result<Assessment, ClassifierError> {
    let wire: WireAssessment = serde_json::from_str(text)
        .map_err(|e| ClassifierError::Malformed(format!("not valid assessment JSON: {}", e)))?;

    let needs_more_info = wire
        .needs_more_info
        .ok_or_else(|| ClassifierError::Malformed("missing needs_more_info".to_string()))?;

    let phase = match wire.phase.as_deref() {
        Some("ASSESSMENT") => Phase::Assessment,
        Some("GUIDANCE") => Phase::Guidance,
        Some("STOP") => Phase::Stop,
        Some(other) => {
            return Err(ClassifierError::Malformed(format!("unknown phase '{}'", other)))
        }
        None => return Err(ClassifierError::Malformed("missing phase".to_string())),
    };

    let confirmed_values_delta = match wire.confirmed_values_delta {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(ClassifierError::Malformed(
                "confirmed_values_delta must be an object".to_string(),
            ))
        }
    };

    let diagnosis = wire.diagnosis.map(parse_diagnosis).transpose()?;

    Ok(Assessment {
        needs_more_info,
        questions: wire.questions.unwrap_or_default(),
        confirmed_values_delta,
        task: wire.task,
        diagnosis,
        phase,
    })
}

fn parse_diagnosis(wire: WireDiagnosis) -> Result<Diagnosis, ClassifierError> {
    let issue = wire
        .issue
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ClassifierError::Malformed("diagnosis missing issue".to_string()))?;

    let risk = match wire.risk.as_deref() {
        Some("LOW") => RiskLevel::Low,
        Some("MEDIUM") => RiskLevel::Medium,
        Some("HIGH") => RiskLevel::High,
        Some(other) => {
            return Err(ClassifierError::Malformed(format!("unknown risk '{}'", other)))
        }
        None => return Err(ClassifierError::Malformed("diagnosis missing risk".to_string())),
    };

    let diy_allowed = wire
        .diy_allowed
        .ok_or_else(|| ClassifierError::Malformed("diagnosis missing diy_allowed".to_string()))?;

    Ok(Diagnosis {
        issue,
        risk,
        diy_allowed,
    })
}
