//! Pro matching domain: the leak-free response shape and trade
//! normalization.

mod matched_pro;
mod trade;

pub use matched_pro::{DistanceBand, MatchedPro, RatingBand};
pub use trade::{normalize_trade, trades_match};
