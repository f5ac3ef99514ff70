//! HTTP DTOs for the triage endpoint.
//!
//! These types decouple the wire contract (camelCase JSON) from domain
//! types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{TriageOutcome, TriageResponse};
use crate::domain::foundation::ErrorCode;
use crate::domain::handoff::ContactInfo;
use crate::domain::matching::{DistanceBand, MatchedPro, RatingBand};
use crate::domain::triage::{Diagnosis, Phase, RiskLevel};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request body for `POST /api/triage`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageRequestBody {
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub user_id: Option<String>,
    /// Absent on the first turn; a fresh session is created.
    pub session_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub trade: Option<String>,
}

impl TriageRequestBody {
    pub fn contact_info(&self) -> ContactInfo {
        ContactInfo {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip: self.zip.clone(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Diagnosis as exposed on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisDto {
    pub issue: String,
    pub risk: RiskLevel,
    pub diy_allowed: bool,
}

impl From<Diagnosis> for DiagnosisDto {
    fn from(d: Diagnosis) -> Self {
        Self {
            issue: d.issue,
            risk: d.risk,
            diy_allowed: d.diy_allowed,
        }
    }
}

/// Matched professional as exposed on the wire. Bands only; raw scores
/// and coordinates never cross this boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedProDto {
    pub id: String,
    pub display_name: String,
    pub trade: String,
    pub distance_band: DistanceBand,
    pub rating_band: RatingBand,
}

impl From<MatchedPro> for MatchedProDto {
    fn from(p: MatchedPro) -> Self {
        Self {
            id: p.id.to_string(),
            display_name: p.display_name,
            trade: p.trade,
            distance_band: p.distance_band,
            rating_band: p.rating_band,
        }
    }
}

/// Reference to a created lead.
#[derive(Debug, Clone, Serialize)]
pub struct LeadRef {
    pub id: String,
}

/// Response body for `POST /api/triage`, one shape per outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TriageResponseBody {
    #[serde(rename_all = "camelCase")]
    InProgress {
        success: bool,
        session_id: String,
        needs_more_info: bool,
        questions: Vec<String>,
        phase: Phase,
    },
    #[serde(rename_all = "camelCase")]
    Diagnosed {
        success: bool,
        session_id: String,
        mode: &'static str,
        diagnosis: DiagnosisDto,
    },
    #[serde(rename_all = "camelCase")]
    ProRecommended {
        success: bool,
        session_id: String,
        mode: &'static str,
        diagnosis: DiagnosisDto,
        lead: LeadRef,
        matched_pros: Vec<MatchedProDto>,
    },
}

impl From<TriageResponse> for TriageResponseBody {
    fn from(response: TriageResponse) -> Self {
        let session_id = response.session_id.to_string();
        match response.outcome {
            TriageOutcome::InProgress {
                needs_more_info,
                questions,
                phase,
            } => TriageResponseBody::InProgress {
                success: true,
                session_id,
                needs_more_info,
                questions,
                phase,
            },
            TriageOutcome::Diy { diagnosis } => TriageResponseBody::Diagnosed {
                success: true,
                session_id,
                mode: "DIY",
                diagnosis: diagnosis.into(),
            },
            TriageOutcome::DiagnosisOnly { diagnosis } => TriageResponseBody::Diagnosed {
                success: true,
                session_id,
                mode: "DIAGNOSIS_ONLY",
                diagnosis: diagnosis.into(),
            },
            TriageOutcome::ProRecommended {
                diagnosis,
                lead_id,
                matched_pros,
            } => TriageResponseBody::ProRecommended {
                success: true,
                session_id,
                mode: "PRO_RECOMMENDED",
                diagnosis: diagnosis.into(),
                lead: LeadRef {
                    id: lead_id.to_string(),
                },
                matched_pros: matched_pros.into_iter().map(Into::into).collect(),
            },
        }
    }
}

/// Generic error body. Internal detail never crosses this boundary;
/// callers get a stable code and a short human-readable message.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.to_string(),
            error: message.into(),
        }
    }
}
