//! Pro directory adapters.

mod in_memory_pro_directory;

pub use in_memory_pro_directory::InMemoryProDirectory;
