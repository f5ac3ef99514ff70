//! Risk classifier adapters.

mod http_classifier;
mod mock_classifier;

pub use http_classifier::{HttpRiskClassifier, HttpRiskClassifierConfig};
pub use mock_classifier::MockRiskClassifier;
