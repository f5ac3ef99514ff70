//! Caller-supplied contact and location details.

use serde::{Deserialize, Serialize};

/// Contact information collected alongside the conversation.
///
/// All fields are optional at intake; [`ContactInfo::is_complete`] is the
/// gate for whether a pro handoff may act on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl ContactInfo {
    /// At least one way to reach the caller.
    pub fn has_contact_channel(&self) -> bool {
        Self::present(&self.email) || Self::present(&self.phone)
    }

    /// A location precise enough for geographic matching: city + state,
    /// or a full street address.
    pub fn has_resolvable_location(&self) -> bool {
        (Self::present(&self.city) && Self::present(&self.state)) || Self::present(&self.address)
    }

    /// Complete enough to create a lead and match pros: a name, one
    /// contact channel, and a resolvable location.
    pub fn is_complete(&self) -> bool {
        Self::present(&self.name) && self.has_contact_channel() && self.has_resolvable_location()
    }

    fn present(field: &Option<String>) -> bool {
        field.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}
