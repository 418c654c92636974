//! Persistence Adapters - Repository implementations
//!
//! These implement the repository traits from astra-domain.

pub mod in_memory;

pub use in_memory::{InMemoryMissionRepository, InMemoryPersonnelRepository};
