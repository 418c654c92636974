//! Mission Repository - Abstract persistence for Missions
//!
//! This trait defines what operations the domain needs.
//! How they're implemented (SQL, file, memory) is not our concern here.

use thiserror::Error;

use crate::model::employee::EmployeeId;
use crate::model::mission::{Mission, MissionCode, MissionId, MissionStatus};

/// Errors that can occur during repository operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Failed to persist
    #[error("Persistence error: {message}")]
    PersistenceError { message: String },

    /// A unique key is already taken by another record
    #[error("{entity} {key} already exists")]
    Duplicate { entity: &'static str, key: String },

    /// Someone else saved the record since it was loaded
    #[error(
        "Concurrent modification for {entity} {id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyError {
        entity: &'static str,
        id: String,
        expected: u64,
        actual: u64,
    },
}

/// Mission Repository Trait
///
/// This is a PORT in hexagonal architecture.
/// The domain defines what it needs; adapters provide implementations.
///
/// Implementations are shared between request handlers, so every method
/// takes `&self` and the record store handles its own locking.
pub trait MissionRepository: Send + Sync {
    /// Reserve an identity for a new mission
    fn next_id(&self) -> Result<MissionId, RepositoryError>;

    /// Save a mission (create or update)
    ///
    /// The mission's version must match the stored one (0 for new missions);
    /// otherwise `ConcurrencyError` is returned and nothing is written.
    /// Returns the stored copy carrying its new version.
    fn save(&self, mission: &Mission) -> Result<Mission, RepositoryError>;

    /// Find a mission by ID
    fn find_by_id(&self, id: MissionId) -> Result<Option<Mission>, RepositoryError>;

    /// Find a mission by its code
    fn find_by_code(&self, code: &MissionCode) -> Result<Option<Mission>, RepositoryError>;

    /// All missions, ordered by ID
    fn find_all(&self) -> Result<Vec<Mission>, RepositoryError>;

    /// Find all missions with a specific status
    fn find_by_status(&self, status: MissionStatus) -> Result<Vec<Mission>, RepositoryError> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|m| m.status() == status)
            .collect())
    }

    /// Missions whose crew includes the astronaut
    fn find_by_crew_member(
        &self,
        astronaut_id: EmployeeId,
    ) -> Result<Vec<Mission>, RepositoryError> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|m| m.is_crew_member(astronaut_id))
            .collect())
    }

    /// Missions commanded by the astronaut
    fn find_commanded_by(&self, astronaut_id: EmployeeId) -> Result<Vec<Mission>, RepositoryError> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|m| m.commander() == Some(astronaut_id))
            .collect())
    }

    /// Delete a mission
    fn delete(&self, id: MissionId) -> Result<(), RepositoryError>;

    /// Check if a mission exists
    fn exists(&self, id: MissionId) -> Result<bool, RepositoryError> {
        Ok(self.find_by_id(id)?.is_some())
    }

    /// Count all missions
    fn count(&self) -> Result<usize, RepositoryError>;

    /// Count missions by status
    fn count_by_status(&self, status: MissionStatus) -> Result<usize, RepositoryError> {
        Ok(self.find_by_status(status)?.len())
    }
}
