//! The handoff decision: DIY, pro-recommended, or diagnosis-only.

use serde::{Deserialize, Serialize};

use crate::domain::triage::Diagnosis;

use super::contact::ContactInfo;

/// Outcome of a finalized diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandoffDecision {
    /// The user gets guidance to resolve the issue themselves.
    Diy,
    /// Route to a professional: create a lead and match pros.
    ProRecommended,
    /// Handoff criteria met but contact info is incomplete; the
    /// diagnosis is still returned, no lead or match is produced.
    DiagnosisOnly,
}

/// Decides what to do with a finalized diagnosis.
///
/// Pure function, no side effects: lead creation and pro matching happen
/// in the orchestration layer, and only after a `ProRecommended` result.
///
/// Rules, in order:
/// 1. HIGH risk or `diy_allowed == false` makes the session a candidate
///    for pro handoff.
/// 2. The handoff only proceeds with complete contact info; otherwise it
///    degrades to `DiagnosisOnly` so geographic matching is never
///    attempted without enough information to act on.
/// 3. Everything else is DIY.
pub fn decide(diagnosis: &Diagnosis, contact: &ContactInfo) -> HandoffDecision {
    if diagnosis.requires_pro() {
        if contact.is_complete() {
            HandoffDecision::ProRecommended
        } else {
            HandoffDecision::DiagnosisOnly
        }
    } else {
        HandoffDecision::Diy
    }
}
