//! Risk classifier configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Risk classifier boundary configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// HTTP endpoint of the classifier service
    pub endpoint: Option<String>,

    /// API key, sent as a bearer token when present
    pub api_key: Option<String>,

    /// Per-call timeout in seconds; well under user-perceived latency
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ClassifierConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a remote classifier endpoint is configured
    pub fn has_endpoint(&self) -> bool {
        self.endpoint.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// Validate classifier configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(endpoint) = self.endpoint.as_deref() {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ValidationError::InvalidClassifierEndpoint);
            }
        }
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidClassifierTimeout);
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    8
}
