//! Astronaut Service - Personnel records that hold the astronaut role

use std::sync::Arc;

use astra_domain::{
    AstronautProfile, BiometricLimits, BiometricReading, Employee, MedicalFitness,
    MissionRepository, PersonnelRepository,
};
use chrono::Utc;
use tracing::{info, warn};

use super::{ensure_not_on_crew, load_astronaut};
use crate::dto::{
    AstronautResponse, BiometricReadingResponse, BiometricUpdate, CreateAstronautRequest,
    RecordBiometricRequest, UpdateAstronautRequest,
};
use crate::error::{ServiceError, ServiceResult, ValidationErrors};

pub struct AstronautService {
    personnel: Arc<dyn PersonnelRepository>,
    missions: Arc<dyn MissionRepository>,
    limits: BiometricLimits,
}

impl AstronautService {
    pub fn new(
        personnel: Arc<dyn PersonnelRepository>,
        missions: Arc<dyn MissionRepository>,
        limits: BiometricLimits,
    ) -> Self {
        Self {
            personnel,
            missions,
            limits,
        }
    }

    pub fn create(&self, request: CreateAstronautRequest) -> ServiceResult<AstronautResponse> {
        request.validate().into_result()?;
        let fitness: MedicalFitness = request.medical_fitness.parse()?;

        let profile = AstronautProfile::new(fitness)
            .with_missions_completed(request.missions_completed.unwrap_or(0));
        let mut astronaut = Employee::astronaut(
            self.personnel.next_id()?,
            request.name.trim(),
            profile,
            Utc::now(),
        )
        .with_active(request.active.unwrap_or(true));
        if let Some(age) = request.age {
            astronaut.set_age(age);
        }

        let stored = self.personnel.save(&astronaut)?;
        info!(astronaut_id = %stored.id(), name = stored.name(), "Astronaut created");
        to_response(&stored)
    }

    pub fn list(&self) -> ServiceResult<Vec<AstronautResponse>> {
        Ok(self
            .personnel
            .find_astronauts()?
            .iter()
            .filter_map(AstronautResponse::from_employee)
            .collect())
    }

    pub fn get(&self, id: u64) -> ServiceResult<AstronautResponse> {
        to_response(&load_astronaut(self.personnel.as_ref(), id)?)
    }

    /// Overwrite only the fields present in the request
    pub fn update(
        &self,
        id: u64,
        request: UpdateAstronautRequest,
    ) -> ServiceResult<AstronautResponse> {
        request.validate().into_result()?;
        let mut astronaut = load_astronaut(self.personnel.as_ref(), id)?;

        let fitness = request
            .medical_fitness
            .as_deref()
            .map(str::parse::<MedicalFitness>)
            .transpose()?;

        if let Some(name) = &request.name {
            astronaut.rename(name.trim());
        }
        if let Some(age) = request.age {
            astronaut.set_age(age);
        }
        if let Some(active) = request.active {
            astronaut.set_active(active);
        }

        let profile = astronaut
            .astronaut_profile_mut()
            .ok_or_else(|| ServiceError::not_found("Astronaut", id))?;
        if let Some(fitness) = fitness {
            profile.set_medical_fitness(fitness);
        }
        if let Some(count) = request.missions_completed {
            profile.set_missions_completed(count);
        }
        if let Some(update) = &request.biometrics {
            merge_reading(profile, update)?;
        }

        let stored = self.personnel.save(&astronaut)?;
        info!(astronaut_id = %stored.id(), "Astronaut updated");
        to_response(&stored)
    }

    pub fn delete(&self, id: u64) -> ServiceResult<()> {
        let astronaut = load_astronaut(self.personnel.as_ref(), id)?;
        ensure_not_on_crew(self.missions.as_ref(), &astronaut)?;

        self.personnel.delete(astronaut.id())?;
        info!(astronaut_id = %astronaut.id(), "Astronaut deleted");
        Ok(())
    }

    /// Append a new reading to the astronaut's history
    pub fn record_biometric(
        &self,
        id: u64,
        request: RecordBiometricRequest,
    ) -> ServiceResult<BiometricReadingResponse> {
        request.validate().into_result()?;
        let mut astronaut = load_astronaut(self.personnel.as_ref(), id)?;

        let reading = BiometricReading::new(
            request.kind.trim(),
            request.value,
            request.unit.unwrap_or_default(),
            request.recorded_at.unwrap_or_else(Utc::now),
        );
        if self.limits.is_critical(&reading) {
            warn!(
                astronaut_id = %astronaut.id(),
                kind = reading.kind(),
                value = reading.value(),
                "Critical biometric reading"
            );
        }

        let response = BiometricReadingResponse::from(&reading);
        astronaut
            .astronaut_profile_mut()
            .ok_or_else(|| ServiceError::not_found("Astronaut", id))?
            .record_reading(reading);
        self.personnel.save(&astronaut)?;
        Ok(response)
    }

    /// Readings outside the configured band for their kind
    pub fn critical_readings(&self, id: u64) -> ServiceResult<Vec<BiometricReadingResponse>> {
        let astronaut = load_astronaut(self.personnel.as_ref(), id)?;
        let profile = astronaut
            .astronaut_profile()
            .ok_or_else(|| ServiceError::not_found("Astronaut", id))?;

        Ok(self
            .limits
            .critical(profile.biometrics())
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

fn to_response(employee: &Employee) -> ServiceResult<AstronautResponse> {
    AstronautResponse::from_employee(employee)
        .ok_or_else(|| ServiceError::not_found("Astronaut", employee.id()))
}

/// Replace the latest reading of the same kind with a merged copy,
/// or append a new one when there is nothing to merge into
///
/// A new reading needs a measured value; it is never made up.
fn merge_reading(profile: &mut AstronautProfile, update: &BiometricUpdate) -> ServiceResult<()> {
    let kind = update.kind.trim();
    let now = Utc::now();

    let merged = match profile.latest_reading(kind) {
        Some(previous) => BiometricReading::new(
            kind,
            update.value.unwrap_or(previous.value()),
            update
                .unit
                .clone()
                .unwrap_or_else(|| previous.unit().to_string()),
            now,
        ),
        None => {
            let Some(value) = update.value else {
                let mut errors = ValidationErrors::new();
                errors.add(
                    "biometrics.value",
                    format!("is required: no earlier {kind} reading to update"),
                );
                return Err(ServiceError::Validation(errors));
            };
            BiometricReading::new(kind, value, update.unit.clone().unwrap_or_default(), now)
        }
    };
    profile.replace_latest_reading(merged);
    Ok(())
}
