//! Risk-scored diagnosis value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk level attached to a diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        };
        write!(f, "{}", s)
    }
}

/// Terminal diagnosis produced when a conversation finalizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// Short description of the identified issue.
    pub issue: String,
    /// Assessed risk of the issue.
    pub risk: RiskLevel,
    /// Whether the user may safely attempt the repair themselves.
    pub diy_allowed: bool,
}

impl Diagnosis {
    /// Whether this diagnosis should be routed to a professional.
    ///
    /// High risk or an explicit no-DIY verdict both qualify.
    pub fn requires_pro(&self) -> bool {
        self.risk == RiskLevel::High || !self.diy_allowed
    }
}
