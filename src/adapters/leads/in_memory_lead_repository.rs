//! In-Memory Lead Repository Adapter
//!
//! Enforces the one-lead-per-session uniqueness constraint in memory,
//! mirroring what the production database does with a unique index on
//! `source_session_id`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::foundation::SessionId;
use crate::domain::handoff::Lead;
use crate::ports::{LeadRepository, LeadRepositoryError};

/// In-memory implementation of [`LeadRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeadRepository {
    leads: Arc<Mutex<HashMap<SessionId, Lead>>>,
}

impl InMemoryLeadRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored leads.
    pub fn len(&self) -> usize {
        self.leads.lock().expect("lead lock").len()
    }

    /// Whether the repository holds no leads.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn insert(&self, lead: &Lead) -> Result<(), LeadRepositoryError> {
        let mut leads = self.leads.lock().expect("lead lock");
        if leads.contains_key(&lead.source_session_id) {
            return Err(LeadRepositoryError::DuplicateSession(lead.source_session_id));
        }
        leads.insert(lead.source_session_id, lead.clone());
        Ok(())
    }

    async fn find_by_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        let leads = self.leads.lock().expect("lead lock");
        Ok(leads.get(&session_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::handoff::ContactInfo;
    use crate::domain::triage::{Diagnosis, RiskLevel};

    fn test_lead(session_id: SessionId) -> Lead {
        let diagnosis = Diagnosis {
            issue: "supply line leak".to_string(),
            risk: RiskLevel::High,
            diy_allowed: false,
        };
        Lead::from_handoff(session_id, "plumbing", &diagnosis, &ContactInfo::default())
    }

    #[tokio::test]
    async fn insert_then_find_round_trips() {
        let repo = InMemoryLeadRepository::new();
        let session_id = SessionId::new();
        let lead = test_lead(session_id);

        repo.insert(&lead).await.unwrap();

        let found = repo.find_by_session(session_id).await.unwrap().unwrap();
        assert_eq!(found.id, lead.id);
    }

    #[tokio::test]
    async fn duplicate_session_insert_is_rejected() {
        let repo = InMemoryLeadRepository::new();
        let session_id = SessionId::new();

        repo.insert(&test_lead(session_id)).await.unwrap();
        let result = repo.insert(&test_lead(session_id)).await;

        assert!(matches!(result, Err(LeadRepositoryError::DuplicateSession(_))));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn find_missing_session_returns_none() {
        let repo = InMemoryLeadRepository::new();
        let found = repo.find_by_session(SessionId::new()).await.unwrap();
        assert!(found.is_none());
    }
}
