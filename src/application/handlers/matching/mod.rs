//! Pro matching handler.

mod match_pros;

pub use match_pros::{MatchProsError, MatchProsHandler, MatchProsQuery};
