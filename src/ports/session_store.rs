//! Session Store Port - keyed access to per-session conversation state.
//!
//! The conversation logic depends only on this `get`/`update` contract;
//! the backing store (in-process sharded map, external cache) is
//! swappable behind it.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::triage::{ProjectState, StateUpdate};

/// Errors from the session store.
#[derive(Debug, Clone, Error)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Session store failure: {0}")]
    Internal(String),
}

/// Port for bounded, per-session state storage.
///
/// Implementations must make each `update` an atomic read-modify-write
/// with respect to concurrent calls for the same session id, and must
/// enforce the store's capacity bound internally (eviction is never
/// surfaced to callers).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the current state for a session.
    async fn get(&self, session_id: SessionId) -> Result<ProjectState, SessionStoreError>;

    /// Applies an update, creating a fresh default state if the session
    /// does not exist yet. Returns the merged state.
    async fn update(
        &self,
        session_id: SessionId,
        update: StateUpdate,
        user_id: Option<UserId>,
    ) -> Result<ProjectState, SessionStoreError>;
}
