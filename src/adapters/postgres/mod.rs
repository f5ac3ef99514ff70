//! PostgreSQL adapters for the pro directory and lead persistence.

mod lead_repository;
mod pro_directory;

pub use lead_repository::PostgresLeadRepository;
pub use pro_directory::PostgresProDirectory;
