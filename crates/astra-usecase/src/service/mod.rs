//! Application services - one load, mutate, save cycle per operation

pub mod astronaut;
pub mod employee;
pub mod mission;

pub use astronaut::AstronautService;
pub use employee::EmployeeService;
pub use mission::MissionService;

use astra_domain::{Employee, EmployeeId, MissionRepository, PersonnelRepository};

use crate::error::{ServiceError, ServiceResult};

pub(crate) fn load_employee(
    personnel: &dyn PersonnelRepository,
    id: u64,
) -> ServiceResult<Employee> {
    personnel
        .find_by_id(EmployeeId::new(id))?
        .ok_or_else(|| ServiceError::not_found("Employee", id))
}

/// Astronauts are looked up under their own name; staff records do not match
pub(crate) fn load_astronaut(
    personnel: &dyn PersonnelRepository,
    id: u64,
) -> ServiceResult<Employee> {
    personnel
        .find_by_id(EmployeeId::new(id))?
        .filter(Employee::is_astronaut)
        .ok_or_else(|| ServiceError::not_found("Astronaut", id))
}

/// Personnel still assigned to a crew cannot be removed
pub(crate) fn ensure_not_on_crew(
    missions: &dyn MissionRepository,
    employee: &Employee,
) -> ServiceResult<()> {
    let assigned = missions.find_by_crew_member(employee.id())?;
    if assigned.is_empty() {
        return Ok(());
    }

    let codes: Vec<String> = assigned.iter().map(|m| m.code().to_string()).collect();
    Err(ServiceError::Conflict(format!(
        "{} is still on the crew of {}",
        employee.name(),
        codes.join(", ")
    )))
}
