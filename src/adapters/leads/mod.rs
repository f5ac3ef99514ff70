//! Lead persistence and notification adapters.

mod in_memory_lead_repository;
mod tracing_lead_notifier;

pub use in_memory_lead_repository::InMemoryLeadRepository;
pub use tracing_lead_notifier::TracingLeadNotifier;
