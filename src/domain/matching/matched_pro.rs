//! Caller-facing matched professional.
//!
//! Deliberately excludes internal ranking scores, raw coordinates, and
//! unverified contact channels. Distance and rating are reduced to coarse
//! bands so matching internals cannot leak through the API.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ProId;

/// Coarse distance bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceBand {
    WithinFiveMiles,
    WithinTenMiles,
    WithinTwentyFiveMiles,
    OverTwentyFiveMiles,
}

impl DistanceBand {
    /// Buckets a raw distance in miles.
    pub fn from_miles(miles: f64) -> Self {
        if miles <= 5.0 {
            DistanceBand::WithinFiveMiles
        } else if miles <= 10.0 {
            DistanceBand::WithinTenMiles
        } else if miles <= 25.0 {
            DistanceBand::WithinTwentyFiveMiles
        } else {
            DistanceBand::OverTwentyFiveMiles
        }
    }
}

/// Coarse rating bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingBand {
    TopRated,
    Great,
    Good,
    Unrated,
}

impl RatingBand {
    /// Buckets a raw average rating (0.0 to 5.0).
    pub fn from_rating(rating: Option<f64>) -> Self {
        match rating {
            Some(r) if r >= 4.7 => RatingBand::TopRated,
            Some(r) if r >= 4.0 => RatingBand::Great,
            Some(_) => RatingBand::Good,
            None => RatingBand::Unrated,
        }
    }
}

/// A professional returned to the caller. Transient and response-only;
/// never persisted by this subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPro {
    pub id: ProId,
    pub display_name: String,
    pub trade: String,
    pub distance_band: DistanceBand,
    pub rating_band: RatingBand,
}
