//! # ASTRA Shared
//!
//! Configuration and error types used by the binary and its layers.

pub mod config;
pub mod error;

// Re-exports
pub use config::*;
pub use error::*;
