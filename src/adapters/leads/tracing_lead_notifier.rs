//! Tracing Lead Notifier Adapter
//!
//! Emits a structured log line for each freshly created lead. Stands in
//! for the SMS/CRM delivery pipeline, which is an external collaborator.

use async_trait::async_trait;

use crate::domain::handoff::Lead;
use crate::ports::{LeadNotifier, NotifyError};

/// Log-only implementation of [`LeadNotifier`].
#[derive(Debug, Clone, Default)]
pub struct TracingLeadNotifier;

impl TracingLeadNotifier {
    /// Creates the notifier.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LeadNotifier for TracingLeadNotifier {
    async fn lead_created(&self, lead: &Lead) -> Result<(), NotifyError> {
        tracing::info!(
            lead_id = %lead.id,
            session_id = %lead.source_session_id,
            service_type = %lead.service_type,
            "lead created"
        );
        Ok(())
    }
}
