//! Pro Directory Port - query capability over the professional directory.
//!
//! The directory returns candidates with full fields (raw distance,
//! rating, activity). Filtering and reduction to the caller-facing
//! `MatchedPro` shape happens inside the matching handler, never here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::foundation::ProId;

/// Location-scoped directory query.
#[derive(Debug, Clone)]
pub struct DirectoryQuery {
    pub trade: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    /// Upper bound on candidates returned by the directory itself.
    pub limit: u32,
}

/// A directory candidate, pre-filtering. Carries raw matching fields
/// that must never reach the caller-facing response.
#[derive(Debug, Clone)]
pub struct ProRecord {
    pub id: ProId,
    pub display_name: String,
    pub trades: Vec<String>,
    pub active: bool,
    pub verified: bool,
    /// Distance from the queried location, if the directory resolved one.
    pub distance_miles: Option<f64>,
    /// Average rating, 0.0 to 5.0.
    pub rating: Option<f64>,
    pub last_active_at: Option<DateTime<Utc>>,
}

/// Errors from the directory boundary.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    #[error("Pro directory unavailable: {0}")]
    Unavailable(String),
}

/// Port for the professional directory collaborator.
#[async_trait]
pub trait ProDirectory: Send + Sync {
    /// Returns candidates for a trade near a location. An empty result
    /// is a normal outcome, not an error.
    async fn find_pros(&self, query: &DirectoryQuery) -> Result<Vec<ProRecord>, DirectoryError>;
}
