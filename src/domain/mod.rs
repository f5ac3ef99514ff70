//! Domain layer - pure business logic, no I/O.

pub mod foundation;
pub mod handoff;
pub mod matching;
pub mod triage;
