//! In-Memory Repository Implementations
//!
//! Simple in-memory implementations of repository traits.
//! Records live for the life of the process; each `save` checks the
//! record's version against the stored one so concurrent writers cannot
//! overwrite each other silently.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use astra_domain::model::employee::{Employee, EmployeeId};
use astra_domain::model::mission::{Mission, MissionCode, MissionId};
use astra_domain::repository::mission_repository::{MissionRepository, RepositoryError};
use astra_domain::repository::personnel_repository::PersonnelRepository;

fn read_lock<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, RepositoryError> {
    lock.read().map_err(|_| RepositoryError::PersistenceError {
        message: "Failed to acquire read lock".to_string(),
    })
}

fn write_lock<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, RepositoryError> {
    lock.write().map_err(|_| RepositoryError::PersistenceError {
        message: "Failed to acquire write lock".to_string(),
    })
}

/// Reject a write whose version does not match what is stored
fn check_version(
    entity: &'static str,
    id: u64,
    expected: u64,
    stored: Option<u64>,
) -> Result<(), RepositoryError> {
    let actual = stored.unwrap_or(0);
    if actual == expected {
        Ok(())
    } else {
        Err(RepositoryError::ConcurrencyError {
            entity,
            id: id.to_string(),
            expected,
            actual,
        })
    }
}

fn not_found(entity: &'static str, id: u64) -> RepositoryError {
    RepositoryError::NotFound {
        entity,
        id: id.to_string(),
    }
}

/// In-memory Mission Repository
///
/// Thread-safe implementation using RwLock. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMissionRepository {
    missions: Arc<RwLock<BTreeMap<u64, Mission>>>,
    last_id: Arc<AtomicU64>,
}

impl InMemoryMissionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MissionRepository for InMemoryMissionRepository {
    fn next_id(&self) -> Result<MissionId, RepositoryError> {
        Ok(MissionId::new(self.last_id.fetch_add(1, Ordering::SeqCst) + 1))
    }

    fn save(&self, mission: &Mission) -> Result<Mission, RepositoryError> {
        let mut missions = write_lock(&self.missions)?;
        let id = mission.id().value();
        check_version(
            "Mission",
            id,
            mission.version(),
            missions.get(&id).map(Mission::version),
        )?;

        // Codes are unique across missions
        if let Some(other) = missions
            .values()
            .find(|m| m.code() == mission.code() && m.id() != mission.id())
        {
            return Err(RepositoryError::Duplicate {
                entity: "Mission code",
                key: other.code().to_string(),
            });
        }

        let stored = mission.clone().with_version(mission.version() + 1);
        missions.insert(id, stored.clone());
        Ok(stored)
    }

    fn find_by_id(&self, id: MissionId) -> Result<Option<Mission>, RepositoryError> {
        Ok(read_lock(&self.missions)?.get(&id.value()).cloned())
    }

    fn find_by_code(&self, code: &MissionCode) -> Result<Option<Mission>, RepositoryError> {
        Ok(read_lock(&self.missions)?
            .values()
            .find(|m| m.code() == code)
            .cloned())
    }

    fn find_all(&self) -> Result<Vec<Mission>, RepositoryError> {
        Ok(read_lock(&self.missions)?.values().cloned().collect())
    }

    fn delete(&self, id: MissionId) -> Result<(), RepositoryError> {
        write_lock(&self.missions)?
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| not_found("Mission", id.value()))
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(read_lock(&self.missions)?.len())
    }
}

/// In-memory Personnel Repository
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersonnelRepository {
    employees: Arc<RwLock<BTreeMap<u64, Employee>>>,
    last_id: Arc<AtomicU64>,
}

impl InMemoryPersonnelRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersonnelRepository for InMemoryPersonnelRepository {
    fn next_id(&self) -> Result<EmployeeId, RepositoryError> {
        Ok(EmployeeId::new(self.last_id.fetch_add(1, Ordering::SeqCst) + 1))
    }

    fn save(&self, employee: &Employee) -> Result<Employee, RepositoryError> {
        let mut employees = write_lock(&self.employees)?;
        let id = employee.id().value();
        check_version(
            "Employee",
            id,
            employee.version(),
            employees.get(&id).map(Employee::version),
        )?;

        let stored = employee.clone().with_version(employee.version() + 1);
        employees.insert(id, stored.clone());
        Ok(stored)
    }

    fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        Ok(read_lock(&self.employees)?.get(&id.value()).cloned())
    }

    fn find_all(&self) -> Result<Vec<Employee>, RepositoryError> {
        Ok(read_lock(&self.employees)?.values().cloned().collect())
    }

    fn delete(&self, id: EmployeeId) -> Result<(), RepositoryError> {
        write_lock(&self.employees)?
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| not_found("Employee", id.value()))
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(read_lock(&self.employees)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astra_domain::model::employee::{AstronautProfile, MedicalFitness};
    use astra_domain::model::mission::{MissionStatus, MissionType};
    use chrono::Utc;

    fn mission(repo: &InMemoryMissionRepository, code: &str) -> Mission {
        Mission::new(
            repo.next_id().unwrap(),
            MissionCode::parse(code).unwrap(),
            "Test mission",
            MissionType::Research,
            Utc::now(),
            Utc::now(),
        )
    }

    #[test]
    fn test_mission_repository() {
        let repo = InMemoryMissionRepository::new();

        let stored = repo.save(&mission(&repo, "LUNA-1")).unwrap();
        assert_eq!(stored.version(), 1);

        let found = repo.find_by_id(stored.id()).unwrap();
        assert!(found.is_some());
        assert!(repo
            .find_by_code(&MissionCode::parse("luna-1").unwrap())
            .unwrap()
            .is_some());

        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.count_by_status(MissionStatus::Planning).unwrap(), 1);
    }

    #[test]
    fn test_ids_are_sequential() {
        let repo = InMemoryMissionRepository::new();
        assert_eq!(repo.next_id().unwrap(), MissionId::new(1));
        assert_eq!(repo.next_id().unwrap(), MissionId::new(2));

        // Clones share the counter
        let clone = repo.clone();
        assert_eq!(clone.next_id().unwrap(), MissionId::new(3));
    }

    #[test]
    fn test_stale_save_is_rejected() {
        let repo = InMemoryMissionRepository::new();
        let stored = repo.save(&mission(&repo, "LUNA-1")).unwrap();

        // Two writers load the same version
        let mut first = repo.find_by_id(stored.id()).unwrap().unwrap();
        let mut second = first.clone();

        first.rename("First");
        repo.save(&first).unwrap();

        second.rename("Second");
        let err = repo.save(&second).unwrap_err();
        assert_eq!(
            err,
            RepositoryError::ConcurrencyError {
                entity: "Mission",
                id: stored.id().to_string(),
                expected: 1,
                actual: 2,
            }
        );
        assert_eq!(repo.find_by_id(stored.id()).unwrap().unwrap().name(), "First");
    }

    #[test]
    fn test_duplicate_code_is_rejected() {
        let repo = InMemoryMissionRepository::new();
        repo.save(&mission(&repo, "LUNA-1")).unwrap();

        assert!(matches!(
            repo.save(&mission(&repo, "LUNA-1")),
            Err(RepositoryError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_delete_missing() {
        let repo = InMemoryMissionRepository::new();
        assert!(matches!(
            repo.delete(MissionId::new(7)),
            Err(RepositoryError::NotFound { entity: "Mission", .. })
        ));
    }

    #[test]
    fn test_personnel_repository() {
        let repo = InMemoryPersonnelRepository::new();

        let astronaut = Employee::astronaut(
            repo.next_id().unwrap(),
            "Sally Ride",
            AstronautProfile::new(MedicalFitness::High),
            Utc::now(),
        );
        let staff = Employee::staff(repo.next_id().unwrap(), "Gene Kranz", None, Utc::now());
        repo.save(&astronaut).unwrap();
        repo.save(&staff).unwrap();

        assert_eq!(repo.count().unwrap(), 2);
        let astronauts = repo.find_astronauts().unwrap();
        assert_eq!(astronauts.len(), 1);
        assert_eq!(astronauts[0].name(), "Sally Ride");

        // Saving the unsaved copy again is a stale write
        assert!(matches!(
            repo.save(&staff),
            Err(RepositoryError::ConcurrencyError { .. })
        ));

        repo.delete(staff.id()).unwrap();
        assert!(!repo.exists(staff.id()).unwrap());
    }
}
