//! Lead Notifier Port - downstream notification/CRM collaborator.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::handoff::Lead;

/// Errors from notification delivery.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    #[error("Lead notification failed: {0}")]
    Delivery(String),
}

/// Port for notifying downstream systems about a freshly created lead.
///
/// Called at most once per lead (only on fresh creation, never on an
/// idempotent replay). Failures are logged by the caller and never fail
/// the handoff.
#[async_trait]
pub trait LeadNotifier: Send + Sync {
    /// Announces a newly created lead.
    async fn lead_created(&self, lead: &Lead) -> Result<(), NotifyError>;
}
