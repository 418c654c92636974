//! Domain Models - The vocabulary of ASTRA
//!
//! These types represent the "Ubiquitous Language" of mission control.
//! Status and event tags keep the agency's Portuguese names on the wire.

pub mod biometric;
pub mod employee;
pub mod event;
pub mod mission;
pub mod protocol;

use thiserror::Error;

/// A string did not name any variant of an enumerated field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: '{value}'")]
pub struct ParseEnumError {
    field: &'static str,
    value: String,
}

impl ParseEnumError {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}
