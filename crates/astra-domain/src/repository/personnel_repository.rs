//! Personnel Repository - Abstract persistence for Employees
//!
//! Astronauts and staff share one record store; the role payload tells
//! them apart.

use crate::model::employee::{Employee, EmployeeId};
use crate::repository::mission_repository::RepositoryError;

/// Personnel Repository Trait
///
/// This is a PORT in hexagonal architecture.
/// Used by the services to look up crew candidates by identity.
pub trait PersonnelRepository: Send + Sync {
    /// Reserve an identity for a new hire
    fn next_id(&self) -> Result<EmployeeId, RepositoryError>;

    /// Save an employee (create or update), checking the version like
    /// `MissionRepository::save`
    fn save(&self, employee: &Employee) -> Result<Employee, RepositoryError>;

    /// Find an employee by ID
    fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError>;

    /// All employees, ordered by ID
    fn find_all(&self) -> Result<Vec<Employee>, RepositoryError>;

    /// Employees holding the astronaut role
    fn find_astronauts(&self) -> Result<Vec<Employee>, RepositoryError> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|e| e.is_astronaut())
            .collect())
    }

    /// Remove an employee
    fn delete(&self, id: EmployeeId) -> Result<(), RepositoryError>;

    /// Check if an employee exists
    fn exists(&self, id: EmployeeId) -> Result<bool, RepositoryError> {
        Ok(self.find_by_id(id)?.is_some())
    }

    /// Count all employees
    fn count(&self) -> Result<usize, RepositoryError>;
}
