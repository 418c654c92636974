//! Mission Service - Orchestrates the mission lifecycle
//!
//! Each operation loads the mission, runs one domain operation on it and
//! saves it back. A domain error aborts before the save, so a failed call
//! leaves the stored mission untouched.

use std::sync::Arc;

use astra_domain::{
    CommandPolicy, EmergencyReport, Mission, MissionCode, MissionConfig, MissionError, MissionId,
    MissionRepository, MissionStatus, MissionType, PersonnelRepository, Priority,
};
use chrono::{DateTime, Datelike, Utc};
use tracing::{debug, info, warn};

use super::{load_astronaut, load_employee};
use crate::dto::{
    AddProtocolRequest, AstronautResponse, CreateMissionRequest, EmergencyRequest,
    EmergencyResponse, MissionEventResponse, MissionResponse, SimulationRequest,
    SimulationResponse, UpdateMissionRequest, SIMULATION_MESSAGE, SIMULATION_OUTCOME,
};
use crate::error::{ServiceError, ServiceResult, ValidationErrors};

/// Reason recorded when a pause or emergency arrives without one
const DEFAULT_PAUSE_REASON: &str = "Mission paused";
const DEFAULT_EMERGENCY_DESCRIPTION: &str = "Emergency declared";

pub struct MissionService {
    missions: Arc<dyn MissionRepository>,
    personnel: Arc<dyn PersonnelRepository>,
    policy: CommandPolicy,
    defaults: MissionConfig,
}

impl MissionService {
    pub fn new(
        missions: Arc<dyn MissionRepository>,
        personnel: Arc<dyn PersonnelRepository>,
    ) -> Self {
        Self {
            missions,
            personnel,
            policy: CommandPolicy::new(),
            defaults: MissionConfig::default(),
        }
    }

    /// Builder: settings applied to missions created without their own
    pub fn with_defaults(mut self, defaults: MissionConfig) -> Self {
        self.defaults = defaults;
        self
    }

    // ========== CRUD ==========

    pub fn create(&self, request: CreateMissionRequest) -> ServiceResult<MissionResponse> {
        request.validate().into_result()?;

        let mission_type: MissionType = request.mission_type.parse()?;
        let priority = match &request.priority {
            Some(p) => p.parse()?,
            None => Priority::default(),
        };
        let now = Utc::now();

        let code = match &request.code {
            Some(raw) => {
                let code = MissionCode::parse(raw)
                    .map_err(|e| ServiceError::InvalidArgument(e.to_string()))?;
                if self.missions.find_by_code(&code)?.is_some() {
                    return Err(ServiceError::Conflict(format!(
                        "Mission code {} is already in use",
                        code
                    )));
                }
                code
            }
            None => self.generate_code(mission_type, now)?,
        };

        let config = MissionConfig {
            max_crew_size: request.max_crew_size.or(self.defaults.max_crew_size),
        };
        let mut mission = Mission::new(
            self.missions.next_id()?,
            code,
            request.name.trim(),
            mission_type,
            request.planned_start.unwrap_or(now),
            now,
        )
        .with_priority(priority)
        .with_config(config);
        if let Some(description) = request.description {
            mission = mission.with_description(description);
        }
        if let Some(end) = request.planned_end {
            mission = mission.with_planned_end(end);
        }

        let stored = self.missions.save(&mission)?;
        info!(
            mission_id = %stored.id(),
            code = %stored.code(),
            mission_type = %stored.mission_type(),
            "Mission created"
        );
        Ok((&stored).into())
    }

    /// All missions, or only those in `status` when given
    pub fn list(&self, status: Option<&str>) -> ServiceResult<Vec<MissionResponse>> {
        let missions = match status {
            Some(raw) => self.missions.find_by_status(raw.parse::<MissionStatus>()?)?,
            None => self.missions.find_all()?,
        };
        Ok(missions.iter().map(Into::into).collect())
    }

    pub fn get(&self, id: u64) -> ServiceResult<MissionResponse> {
        Ok((&self.load(id)?).into())
    }

    /// Overwrite the fields present in the request; a requested status is
    /// reached through the matching lifecycle operation
    pub fn update(&self, id: u64, request: UpdateMissionRequest) -> ServiceResult<MissionResponse> {
        request.validate().into_result()?;
        let mut mission = self.load(id)?;
        let now = Utc::now();

        let mission_type = request
            .mission_type
            .as_deref()
            .map(str::parse::<MissionType>)
            .transpose()?;
        let priority = request
            .priority
            .as_deref()
            .map(str::parse::<Priority>)
            .transpose()?;
        let target = request
            .status
            .as_deref()
            .map(str::parse::<MissionStatus>)
            .transpose()?;

        if request.planned_start.is_some() || request.planned_end.is_some() {
            let start = request.planned_start.unwrap_or(mission.planned_start());
            let end = request.planned_end.or(mission.planned_end());
            check_schedule(start, end)?;
            mission.reschedule(start, end);
        }
        if let Some(name) = &request.name {
            mission.rename(name.trim());
        }
        if let Some(description) = request.description {
            mission.set_description(description);
        }
        if let Some(mission_type) = mission_type {
            mission.set_mission_type(mission_type);
        }
        if let Some(priority) = priority {
            mission.set_priority(priority);
        }
        if let Some(max) = request.max_crew_size {
            mission.set_config(MissionConfig {
                max_crew_size: Some(max),
            })?;
        }

        if let Some(target) = target {
            let from = mission.status();
            let reason = request.status_reason.as_deref().unwrap_or(match target {
                MissionStatus::Emergency => DEFAULT_EMERGENCY_DESCRIPTION,
                _ => DEFAULT_PAUSE_REASON,
            });
            if let Some(report) = mission.transition_to(target, reason, now)? {
                log_emergency(&mission, &report);
            }
            info!(mission_id = %mission.id(), from = %from, to = %target, "Mission status updated");
        }

        mission.touch(now);
        let stored = self.missions.save(&mission)?;
        Ok((&stored).into())
    }

    pub fn delete(&self, id: u64) -> ServiceResult<()> {
        let mission = self.load(id)?;
        self.missions.delete(mission.id())?;
        info!(mission_id = %mission.id(), code = %mission.code(), "Mission deleted");
        Ok(())
    }

    // ========== Crew ==========

    pub fn crew(&self, id: u64) -> ServiceResult<Vec<AstronautResponse>> {
        let mission = self.load(id)?;
        let mut crew = Vec::with_capacity(mission.crew().len());
        for astronaut_id in mission.crew() {
            match self.personnel.find_by_id(*astronaut_id)? {
                Some(employee) => crew.extend(AstronautResponse::from_employee(&employee)),
                None => warn!(
                    mission_id = %mission.id(),
                    astronaut_id = %astronaut_id,
                    "Crew member has no personnel record"
                ),
            }
        }
        Ok(crew)
    }

    pub fn add_crew_member(&self, id: u64, astronaut_id: u64) -> ServiceResult<MissionResponse> {
        let employee = load_employee(self.personnel.as_ref(), astronaut_id)?;
        let stored = self.modify(id, |mission, now| mission.add_crew_member(&employee, now))?;
        info!(mission_id = %stored.id(), astronaut_id, "Crew member added");
        Ok((&stored).into())
    }

    pub fn remove_crew_member(&self, id: u64, astronaut_id: u64) -> ServiceResult<MissionResponse> {
        let astronaut = load_astronaut(self.personnel.as_ref(), astronaut_id)?;
        let stored = self.modify(id, |mission, now| mission.remove_crew_member(&astronaut, now))?;
        info!(mission_id = %stored.id(), astronaut_id, "Crew member removed");
        Ok((&stored).into())
    }

    /// Make a crew member the commander; nobody commands two unfinished missions
    pub fn set_commander(&self, id: u64, astronaut_id: u64) -> ServiceResult<MissionResponse> {
        let astronaut = load_astronaut(self.personnel.as_ref(), astronaut_id)?;
        let commanded = self.missions.find_commanded_by(astronaut.id())?;

        let stored = self.modify(id, |mission, now| {
            self.policy
                .check_assignment(astronaut.id(), mission, &commanded)?;
            mission.set_commander(&astronaut, now)
        })?;
        info!(mission_id = %stored.id(), astronaut_id, "Commander assigned");
        Ok((&stored).into())
    }

    // ========== Lifecycle ==========

    pub fn mark_ready(&self, id: u64) -> ServiceResult<MissionResponse> {
        self.lifecycle(id, "ready", |mission, now| mission.mark_ready(now))
    }

    pub fn start(&self, id: u64) -> ServiceResult<MissionResponse> {
        self.lifecycle(id, "start", |mission, now| mission.start(now))
    }

    pub fn pause(&self, id: u64, reason: Option<String>) -> ServiceResult<MissionResponse> {
        let reason = reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PAUSE_REASON.to_string());
        self.lifecycle(id, "pause", |mission, now| mission.pause(reason, now))
    }

    pub fn resume(&self, id: u64) -> ServiceResult<MissionResponse> {
        self.lifecycle(id, "resume", |mission, now| mission.resume(now))
    }

    pub fn finish(&self, id: u64, success: bool) -> ServiceResult<MissionResponse> {
        self.lifecycle(id, "finish", |mission, now| mission.finish(success, now))
    }

    /// Declare an emergency and report which protocols fired
    pub fn declare_emergency(
        &self,
        id: u64,
        request: EmergencyRequest,
    ) -> ServiceResult<EmergencyResponse> {
        request.validate().into_result()?;
        let mut mission = self.load(id)?;
        let now = Utc::now();
        let reopened = mission.is_terminal();

        let report = mission.declare_emergency(request.description.trim(), now);
        mission.touch(now);
        let stored = self.missions.save(&mission)?;

        log_emergency(&stored, &report);
        // Emergencies are never refused, so a reopened mission can leave its
        // commander leading two unfinished missions; report it instead
        if reopened {
            if let Some(overlap) = self.command_overlap(&stored)? {
                warn!(
                    mission_id = %stored.id(),
                    error = %overlap,
                    "Commander overlap after emergency"
                );
            }
        }
        Ok(EmergencyResponse::new(&stored, &report))
    }

    // ========== Protocols & Events ==========

    pub fn add_protocol(
        &self,
        id: u64,
        request: AddProtocolRequest,
    ) -> ServiceResult<MissionResponse> {
        request.validate().into_result()?;
        let protocol = request.to_protocol();
        let name = protocol.name().to_string();

        let stored = self.modify(id, |mission, _| mission.add_emergency_protocol(protocol))?;
        info!(mission_id = %stored.id(), protocol = %name, "Emergency protocol registered");
        Ok((&stored).into())
    }

    pub fn disarm_protocol(&self, id: u64, name: &str) -> ServiceResult<MissionResponse> {
        let stored = self
            .modify(id, |mission, _| mission.disarm_protocol(name))
            .map_err(|e| match e {
                ServiceError::InvalidArgument(_) => ServiceError::not_found("Protocol", name),
                other => other,
            })?;
        info!(mission_id = %stored.id(), protocol = name, "Emergency protocol disarmed");
        Ok((&stored).into())
    }

    pub fn events(&self, id: u64) -> ServiceResult<Vec<MissionEventResponse>> {
        Ok(self.load(id)?.events().iter().map(Into::into).collect())
    }

    /// Placeholder launch simulation: validates the vehicle and reports success
    pub fn simulate(
        &self,
        id: u64,
        request: SimulationRequest,
    ) -> ServiceResult<SimulationResponse> {
        let mission = self.load(id)?;
        request.validate().into_result()?;

        let parameters = request.parameters();
        debug!(mission_id = %mission.id(), ?parameters, "Simulation requested");
        Ok(SimulationResponse {
            mission_id: mission.id().value(),
            message: SIMULATION_MESSAGE,
            outcome: SIMULATION_OUTCOME,
            parameters,
        })
    }

    // ========== Internals ==========

    /// The command rule violation `mission`'s commander is in, if any
    fn command_overlap(&self, mission: &Mission) -> ServiceResult<Option<MissionError>> {
        let Some(commander) = mission.commander().filter(|_| !mission.is_terminal()) else {
            return Ok(None);
        };
        let commanded = self.missions.find_commanded_by(commander)?;
        Ok(self
            .policy
            .check_assignment(commander, mission, &commanded)
            .err())
    }

    fn load(&self, id: u64) -> ServiceResult<Mission> {
        self.missions
            .find_by_id(MissionId::new(id))?
            .ok_or_else(|| ServiceError::not_found("Mission", id))
    }

    /// Load, apply `op`, stamp and save
    fn modify<F>(&self, id: u64, op: F) -> ServiceResult<Mission>
    where
        F: FnOnce(&mut Mission, DateTime<Utc>) -> Result<(), MissionError>,
    {
        let mut mission = self.load(id)?;
        let now = Utc::now();
        op(&mut mission, now)?;
        mission.touch(now);
        Ok(self.missions.save(&mission)?)
    }

    fn lifecycle<F>(
        &self,
        id: u64,
        operation: &'static str,
        op: F,
    ) -> ServiceResult<MissionResponse>
    where
        F: FnOnce(&mut Mission, DateTime<Utc>) -> Result<(), MissionError>,
    {
        let stored = self.modify(id, op).inspect_err(|e| {
            if matches!(e, ServiceError::InvalidStateTransition(_)) {
                warn!(mission_id = id, operation, error = %e, "Lifecycle operation rejected");
            }
        })?;
        info!(
            mission_id = %stored.id(),
            operation,
            status = %stored.status(),
            "Mission lifecycle operation"
        );
        Ok((&stored).into())
    }

    /// `{TYPE}-{YEAR}-{NNN}` with the first free sequence number
    fn generate_code(
        &self,
        mission_type: MissionType,
        now: DateTime<Utc>,
    ) -> ServiceResult<MissionCode> {
        let prefix = format!("{}-{}-", mission_type.as_str(), now.year());
        let taken = self
            .missions
            .find_all()?
            .iter()
            .filter(|m| m.code().as_str().starts_with(&prefix))
            .count();

        let mut sequence = taken + 1;
        loop {
            let raw = format!("{}{:03}", prefix, sequence);
            let code = MissionCode::parse(&raw)
                .map_err(|e| ServiceError::InvalidArgument(e.to_string()))?;
            if self.missions.find_by_code(&code)?.is_none() {
                return Ok(code);
            }
            sequence += 1;
        }
    }
}

fn check_schedule(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> ServiceResult<()> {
    let mut errors = ValidationErrors::new();
    if matches!(end, Some(end) if end < start) {
        errors.add("planned_end", "must not be before planned_start");
    }
    errors.into_result()
}

fn log_emergency(mission: &Mission, report: &EmergencyReport) {
    warn!(
        mission_id = %mission.id(),
        code = %mission.code(),
        activated = ?report.activated,
        "Emergency declared"
    );
    for failure in &report.failed {
        warn!(mission_id = %mission.id(), error = %failure, "Emergency protocol not activated");
    }
}
