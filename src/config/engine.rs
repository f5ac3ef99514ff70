//! Triage engine configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Triage engine configuration (session store and matching bounds)
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of concurrently stored sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Number of session store shards
    #[serde(default = "default_shard_count")]
    pub shard_count: usize,

    /// Maximum number of matched pros returned per handoff
    #[serde(default = "default_match_limit")]
    pub match_limit: usize,
}

impl EngineConfig {
    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_sessions == 0 {
            return Err(ValidationError::InvalidSessionCapacity);
        }
        if self.shard_count == 0 {
            return Err(ValidationError::InvalidShardCount);
        }
        if self.match_limit == 0 || self.match_limit > 25 {
            return Err(ValidationError::InvalidMatchLimit);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            shard_count: default_shard_count(),
            match_limit: default_match_limit(),
        }
    }
}

fn default_max_sessions() -> usize {
    10_000
}

fn default_shard_count() -> usize {
    16
}

fn default_match_limit() -> usize {
    5
}
