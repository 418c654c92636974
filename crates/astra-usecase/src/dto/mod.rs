//! Data Transfer Objects - what crosses the application boundary
//!
//! Requests arrive as loose strings and options and are validated here;
//! responses are flat, serializable views of the aggregates.

pub mod mission;
pub mod personnel;
pub mod simulation;

pub use mission::*;
pub use personnel::*;
pub use simulation::*;
