//! Service errors - what the application layer reports to its callers
//!
//! Domain errors are folded into a handful of kinds the HTTP layer can map
//! onto status codes without knowing anything about missions.

use astra_domain::{MissionError, ParseEnumError, RepositoryError};
use serde::Serialize;
use thiserror::Error;

/// One rejected request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every problem found while validating a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `Ok(())` when nothing was collected
    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self))
        }
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    InvalidStateTransition(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    Conflict(String),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable tag for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::NotFound { .. } => "NOT_FOUND",
            ServiceError::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
            ServiceError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ServiceError::Validation(_) => "VALIDATION_FAILED",
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::Repository(_) => "REPOSITORY_ERROR",
        }
    }
}

impl From<MissionError> for ServiceError {
    fn from(err: MissionError) -> Self {
        match err {
            MissionError::InvalidStateTransition { .. } => {
                ServiceError::InvalidStateTransition(err.to_string())
            }
            MissionError::AlreadyCommanding { .. } | MissionError::DuplicateProtocol { .. } => {
                ServiceError::Conflict(err.to_string())
            }
            _ => ServiceError::InvalidArgument(err.to_string()),
        }
    }
}

impl From<ParseEnumError> for ServiceError {
    fn from(err: ParseEnumError) -> Self {
        ServiceError::InvalidArgument(err.to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            RepositoryError::ConcurrencyError { .. } | RepositoryError::Duplicate { .. } => {
                ServiceError::Conflict(err.to_string())
            }
            RepositoryError::PersistenceError { .. } => ServiceError::Repository(err.to_string()),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
