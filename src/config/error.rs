//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Classifier endpoint must be an http(s) URL")]
    InvalidClassifierEndpoint,

    #[error("Classifier timeout must be between 1 and 60 seconds")]
    InvalidClassifierTimeout,

    #[error("Session capacity must be at least 1")]
    InvalidSessionCapacity,

    #[error("Shard count must be at least 1")]
    InvalidShardCount,

    #[error("Match limit must be between 1 and 25")]
    InvalidMatchLimit,
}
