//! CreateLeadHandler - idempotent lead creation for pro handoffs.
//!
//! At most one lead ever exists per source session. Replays of the same
//! handoff return the original lead unchanged; the insert/duplicate race
//! is resolved by the repository's uniqueness constraint, with a
//! fetch-and-return on the losing side.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::foundation::SessionId;
use crate::domain::handoff::{ContactInfo, Lead};
use crate::domain::triage::Diagnosis;
use crate::ports::{LeadNotifier, LeadRepository, LeadRepositoryError};

/// Command to create (or replay) a lead for a finalized session.
#[derive(Debug, Clone)]
pub struct CreateLeadCommand {
    pub session_id: SessionId,
    pub service_type: String,
    pub diagnosis: Diagnosis,
    pub contact: ContactInfo,
}

/// Errors from lead creation.
#[derive(Debug, Clone, Error)]
pub enum CreateLeadError {
    #[error("Lead persistence failure: {0}")]
    Repository(String),
}

/// Handler owning the lead lifecycle for handoffs.
pub struct CreateLeadHandler {
    repository: Arc<dyn LeadRepository>,
    notifier: Arc<dyn LeadNotifier>,
}

impl CreateLeadHandler {
    pub fn new(repository: Arc<dyn LeadRepository>, notifier: Arc<dyn LeadNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Creates a lead for the session, or returns the existing one.
    ///
    /// Downstream notification fires only on a fresh create; a delivery
    /// failure is logged and never fails the handoff.
    pub async fn handle(&self, command: CreateLeadCommand) -> Result<Lead, CreateLeadError> {
        if let Some(existing) = self
            .repository
            .find_by_session(command.session_id)
            .await
            .map_err(repo_err)?
        {
            info!(
                session_id = %command.session_id,
                lead_id = %existing.id,
                "Lead already exists for session, returning it"
            );
            return Ok(existing);
        }

        let lead = Lead::from_handoff(
            command.session_id,
            command.service_type,
            &command.diagnosis,
            &command.contact,
        );

        match self.repository.insert(&lead).await {
            Ok(()) => {
                info!(session_id = %command.session_id, lead_id = %lead.id, "Lead created");
                if let Err(e) = self.notifier.lead_created(&lead).await {
                    warn!(lead_id = %lead.id, error = %e, "Lead notification failed");
                }
                Ok(lead)
            }
            // Lost the insert race to a concurrent request for the same
            // session; the winner's lead is the canonical one.
            Err(LeadRepositoryError::DuplicateSession(_)) => {
                let existing = self
                    .repository
                    .find_by_session(command.session_id)
                    .await
                    .map_err(repo_err)?;
                existing.ok_or_else(|| {
                    CreateLeadError::Repository(
                        "Duplicate session reported but no lead found".to_string(),
                    )
                })
            }
            Err(e) => Err(repo_err(e)),
        }
    }
}

fn repo_err(err: LeadRepositoryError) -> CreateLeadError {
    CreateLeadError::Repository(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryLeadRepository;
    use crate::domain::triage::RiskLevel;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingNotifier {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingNotifier {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LeadNotifier for CountingNotifier {
        async fn lead_created(&self, _lead: &Lead) -> Result<(), crate::ports::NotifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(crate::ports::NotifyError::Delivery("down".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn command(session_id: SessionId) -> CreateLeadCommand {
        CreateLeadCommand {
            session_id,
            service_type: "plumbing".to_string(),
            diagnosis: Diagnosis {
                issue: "burst supply line".to_string(),
                risk: RiskLevel::High,
                diy_allowed: false,
            },
            contact: ContactInfo {
                name: Some("Dana Smith".to_string()),
                phone: Some("555-0100".to_string()),
                city: Some("Springfield".to_string()),
                state: Some("IL".to_string()),
                ..ContactInfo::default()
            },
        }
    }

    #[tokio::test]
    async fn creates_a_lead_and_notifies_once() {
        let repository = Arc::new(InMemoryLeadRepository::new());
        let notifier = Arc::new(CountingNotifier::new());
        let handler = CreateLeadHandler::new(repository.clone(), notifier.clone());

        let session_id = SessionId::new();
        let lead = handler.handle(command(session_id)).await.unwrap();

        assert_eq!(lead.source_session_id, session_id);
        assert_eq!(notifier.count(), 1);
        assert!(repository
            .find_by_session(session_id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn replay_returns_same_lead_without_renotifying() {
        let repository = Arc::new(InMemoryLeadRepository::new());
        let notifier = Arc::new(CountingNotifier::new());
        let handler = CreateLeadHandler::new(repository, notifier.clone());

        let session_id = SessionId::new();
        let first = handler.handle(command(session_id)).await.unwrap();
        let second = handler.handle(command(session_id)).await.unwrap();
        let third = handler.handle(command(session_id)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.id, third.id);
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_creation() {
        let repository = Arc::new(InMemoryLeadRepository::new());
        let notifier = Arc::new(CountingNotifier::failing());
        let handler = CreateLeadHandler::new(repository, notifier.clone());

        let lead = handler.handle(command(SessionId::new())).await;
        assert!(lead.is_ok());
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test]
    async fn concurrent_handoffs_produce_one_lead() {
        let repository = Arc::new(InMemoryLeadRepository::new());
        let notifier = Arc::new(CountingNotifier::new());
        let handler = Arc::new(CreateLeadHandler::new(repository.clone(), notifier));

        let session_id = SessionId::new();
        let mut tasks = Vec::new();
        for _ in 0..8 {
            let handler = handler.clone();
            tasks.push(tokio::spawn(
                async move { handler.handle(command(session_id)).await },
            ));
        }

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap().unwrap().id);
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
    }
}
