//! Adapters - implementations of the ports against concrete backends.

pub mod classifier;
pub mod directory;
pub mod http;
pub mod leads;
pub mod postgres;
pub mod store;

pub use classifier::{HttpRiskClassifier, HttpRiskClassifierConfig, MockRiskClassifier};
pub use directory::InMemoryProDirectory;
pub use http::{triage_router, TriageAppState};
pub use leads::{InMemoryLeadRepository, TracingLeadNotifier};
pub use postgres::{PostgresLeadRepository, PostgresProDirectory};
pub use store::{InMemorySessionStore, SessionStoreConfig};
