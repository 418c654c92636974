//! Employee Service - Every personnel record, whatever the role

use std::sync::Arc;

use astra_domain::{Employee, MissionRepository, PersonnelRepository};
use chrono::Utc;
use tracing::info;

use super::{ensure_not_on_crew, load_employee};
use crate::dto::{CreateStaffRequest, EmployeeResponse, UpdateEmployeeRequest};
use crate::error::{ServiceError, ServiceResult};

pub struct EmployeeService {
    personnel: Arc<dyn PersonnelRepository>,
    missions: Arc<dyn MissionRepository>,
}

impl EmployeeService {
    pub fn new(
        personnel: Arc<dyn PersonnelRepository>,
        missions: Arc<dyn MissionRepository>,
    ) -> Self {
        Self {
            personnel,
            missions,
        }
    }

    pub fn list(&self) -> ServiceResult<Vec<EmployeeResponse>> {
        Ok(self.personnel.find_all()?.iter().map(Into::into).collect())
    }

    pub fn get(&self, id: u64) -> ServiceResult<EmployeeResponse> {
        Ok((&load_employee(self.personnel.as_ref(), id)?).into())
    }

    /// Hire someone who is not flight crew
    pub fn create_staff(&self, request: CreateStaffRequest) -> ServiceResult<EmployeeResponse> {
        request.validate().into_result()?;

        let title = request
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let mut staff = Employee::staff(
            self.personnel.next_id()?,
            request.name.trim(),
            title,
            Utc::now(),
        )
        .with_active(request.active.unwrap_or(true));
        if let Some(age) = request.age {
            staff.set_age(age);
        }

        let stored = self.personnel.save(&staff)?;
        info!(employee_id = %stored.id(), role = stored.role().tag(), "Employee created");
        Ok((&stored).into())
    }

    pub fn update(
        &self,
        id: u64,
        request: UpdateEmployeeRequest,
    ) -> ServiceResult<EmployeeResponse> {
        request.validate().into_result()?;
        let mut employee = load_employee(self.personnel.as_ref(), id)?;

        if let Some(title) = &request.title {
            if !employee.set_title(title.trim()) {
                return Err(ServiceError::InvalidArgument(format!(
                    "Employee {} is an astronaut and has no title",
                    id
                )));
            }
        }
        if let Some(name) = &request.name {
            employee.rename(name.trim());
        }
        if let Some(age) = request.age {
            employee.set_age(age);
        }
        if let Some(active) = request.active {
            employee.set_active(active);
        }

        let stored = self.personnel.save(&employee)?;
        info!(employee_id = %stored.id(), "Employee updated");
        Ok((&stored).into())
    }

    pub fn delete(&self, id: u64) -> ServiceResult<()> {
        let employee = load_employee(self.personnel.as_ref(), id)?;
        ensure_not_on_crew(self.missions.as_ref(), &employee)?;

        self.personnel.delete(employee.id())?;
        info!(employee_id = %employee.id(), "Employee deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{astronaut, mission_with_crew, repos, Repos};

    fn setup() -> (EmployeeService, Repos) {
        let r = repos();
        (EmployeeService::new(r.personnel.clone(), r.missions.clone()), r)
    }

    fn staff_request(name: &str, title: Option<&str>) -> CreateStaffRequest {
        CreateStaffRequest {
            name: name.to_string(),
            age: None,
            active: None,
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn test_create_staff() {
        let (service, _) = setup();
        let created = service
            .create_staff(staff_request("Gene Kranz", Some("Flight Director")))
            .unwrap();

        assert_eq!(created.role, "STAFF");
        assert_eq!(created.title.as_deref(), Some("Flight Director"));
        assert_eq!(service.get(created.id).unwrap(), created);
    }

    #[test]
    fn test_list_includes_every_role() {
        let (service, r) = setup();
        service.create_staff(staff_request("Gene Kranz", None)).unwrap();
        r.personnel.save(&astronaut(r.personnel.as_ref(), "Sally Ride")).unwrap();

        let roles: Vec<&str> = service.list().unwrap().iter().map(|e| e.role).collect();
        assert_eq!(roles, vec!["STAFF", "ASTRONAUT"]);
    }

    #[test]
    fn test_title_only_for_staff() {
        let (service, r) = setup();
        let stored = r.personnel.save(&astronaut(r.personnel.as_ref(), "Sally Ride")).unwrap();

        let err = service
            .update(
                stored.id().value(),
                UpdateEmployeeRequest {
                    title: Some("Pilot".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), "INVALID_ARGUMENT");

        // Nothing was saved
        assert_eq!(
            r.personnel.find_by_id(stored.id()).unwrap().unwrap().version(),
            stored.version()
        );
    }

    #[test]
    fn test_partial_update() {
        let (service, _) = setup();
        let created = service
            .create_staff(staff_request("Gene Kranz", Some("Flight Director")))
            .unwrap();

        let updated = service
            .update(
                created.id,
                UpdateEmployeeRequest {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!updated.active);
        assert_eq!(updated.name, "Gene Kranz");
        assert_eq!(updated.title.as_deref(), Some("Flight Director"));
    }

    #[test]
    fn test_delete() {
        let (service, r) = setup();
        let crew = r.personnel.save(&astronaut(r.personnel.as_ref(), "Sally Ride")).unwrap();
        r.missions.save(&mission_with_crew(1, &crew)).unwrap();

        assert!(matches!(
            service.delete(crew.id().value()),
            Err(ServiceError::Conflict(_))
        ));

        let staff = service.create_staff(staff_request("Gene Kranz", None)).unwrap();
        service.delete(staff.id).unwrap();
        assert_eq!(
            service.get(staff.id).unwrap_err(),
            ServiceError::not_found("Employee", staff.id)
        );
    }
}
