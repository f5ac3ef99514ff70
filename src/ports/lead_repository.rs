//! Lead Repository Port - persistence for handoff leads.
//!
//! The repository enforces a uniqueness constraint on the source session
//! id; a duplicate insert reports `DuplicateSession` so the factory can
//! fetch and return the existing lead instead of erroring.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::SessionId;
use crate::domain::handoff::Lead;

/// Errors from the lead persistence boundary.
#[derive(Debug, Clone, Error)]
pub enum LeadRepositoryError {
    #[error("A lead already exists for session {0}")]
    DuplicateSession(SessionId),

    #[error("Lead repository unavailable: {0}")]
    Unavailable(String),
}

/// Port for lead persistence.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Inserts a new lead. Fails with `DuplicateSession` if one already
    /// exists for the lead's source session.
    async fn insert(&self, lead: &Lead) -> Result<(), LeadRepositoryError>;

    /// Looks up the lead created for a session, if any.
    async fn find_by_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<Lead>, LeadRepositoryError>;
}
