//! Ports - async trait seams between the engine and its collaborators.
//!
//! Every external dependency (session storage, the risk classifier, the
//! pro directory, lead persistence and notification) sits behind one of
//! these traits so implementations can be swapped without touching the
//! conversation logic.

mod lead_notifier;
mod lead_repository;
mod pro_directory;
mod risk_classifier;
mod session_store;

pub use lead_notifier::{LeadNotifier, NotifyError};
pub use lead_repository::{LeadRepository, LeadRepositoryError};
pub use pro_directory::{DirectoryError, DirectoryQuery, ProDirectory, ProRecord};
pub use risk_classifier::{Assessment, AssessmentRequest, ClassifierError, RiskClassifier};
pub use session_store::{SessionStore, SessionStoreError};
