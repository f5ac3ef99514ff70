//! Lead record created on pro handoff.
//!
//! Immutable from this subsystem's point of view once created; downstream
//! CRM tooling owns it afterwards. At most one lead exists per source
//! session (enforced at the repository boundary).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{LeadId, SessionId};
use crate::domain::triage::Diagnosis;

use super::contact::ContactInfo;

/// A persisted service request produced by a pro handoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub service_type: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub description: String,
    /// Traceability back to the originating conversation.
    pub source_session_id: SessionId,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Builds a new lead from a finalized diagnosis and contact info.
    pub fn from_handoff(
        session_id: SessionId,
        service_type: impl Into<String>,
        diagnosis: &Diagnosis,
        contact: &ContactInfo,
    ) -> Self {
        Self {
            id: LeadId::new(),
            service_type: service_type.into(),
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            address: contact.address.clone(),
            city: contact.city.clone(),
            state: contact.state.clone(),
            zip: contact.zip.clone(),
            description: diagnosis.issue.clone(),
            source_session_id: session_id,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::triage::RiskLevel;

    #[test]
    fn from_handoff_carries_session_and_contact() {
        let session_id = SessionId::new();
        let diagnosis = Diagnosis {
            issue: "active leak at supply line".to_string(),
            risk: RiskLevel::High,
            diy_allowed: false,
        };
        let contact = ContactInfo {
            name: Some("Dana Smith".to_string()),
            phone: Some("555-0100".to_string()),
            city: Some("Springfield".to_string()),
            state: Some("IL".to_string()),
            ..ContactInfo::default()
        };

        let lead = Lead::from_handoff(session_id, "plumbing", &diagnosis, &contact);

        assert_eq!(lead.source_session_id, session_id);
        assert_eq!(lead.service_type, "plumbing");
        assert_eq!(lead.description, "active leak at supply line");
        assert_eq!(lead.name.as_deref(), Some("Dana Smith"));
        assert_eq!(lead.city.as_deref(), Some("Springfield"));
    }

    #[test]
    fn each_lead_gets_a_unique_id() {
        let diagnosis = Diagnosis {
            issue: "x".to_string(),
            risk: RiskLevel::High,
            diy_allowed: false,
        };
        let contact = ContactInfo::default();
        let a = Lead::from_handoff(SessionId::new(), "plumbing", &diagnosis, &contact);
        let b = Lead::from_handoff(SessionId::new(), "plumbing", &diagnosis, &contact);
        assert_ne!(a.id, b.id);
    }
}
