//! Request and response shapes for astronauts and other personnel

use astra_domain::{BiometricReading, Employee, PersonnelRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 100;
pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 100;

pub(crate) fn check_name(errors: &mut ValidationErrors, field: &str, name: &str) {
    let len = name.trim().chars().count();
    if len == 0 {
        errors.add(field, "must not be blank");
    } else if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        errors.add(
            field,
            format!("must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters"),
        );
    }
}

fn check_age(errors: &mut ValidationErrors, age: Option<u32>) {
    if let Some(age) = age {
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            errors.add("age", format!("must be between {MIN_AGE} and {MAX_AGE}"));
        }
    }
}

fn check_reading_kind(errors: &mut ValidationErrors, field: &str, kind: &str) {
    if kind.trim().is_empty() {
        errors.add(field, "must not be blank");
    }
}

fn check_reading_value(errors: &mut ValidationErrors, field: &str, value: f64) {
    if !value.is_finite() {
        errors.add(field, "must be a finite number");
    }
}

// ========== Requests ==========

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAstronautRequest {
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub active: Option<bool>,
    pub medical_fitness: String,
    #[serde(default)]
    pub missions_completed: Option<u32>,
}

impl CreateAstronautRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "name", &self.name);
        check_age(&mut errors, self.age);
        if self.medical_fitness.trim().is_empty() {
            errors.add("medical_fitness", "must not be blank");
        }
        errors
    }
}

/// Partial change to the most recent reading of one kind
#[derive(Debug, Clone, Deserialize)]
pub struct BiometricUpdate {
    pub kind: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Partial update: absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAstronautRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub medical_fitness: Option<String>,
    #[serde(default)]
    pub missions_completed: Option<u32>,
    #[serde(default)]
    pub biometrics: Option<BiometricUpdate>,
}

impl UpdateAstronautRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            check_name(&mut errors, "name", name);
        }
        check_age(&mut errors, self.age);
        if let Some(update) = &self.biometrics {
            check_reading_kind(&mut errors, "biometrics.kind", &update.kind);
            if let Some(value) = update.value {
                check_reading_value(&mut errors, "biometrics.value", value);
            }
        }
        errors
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordBiometricRequest {
    pub kind: String,
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
    /// Defaults to the time the request is handled
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl RecordBiometricRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_reading_kind(&mut errors, "kind", &self.kind);
        check_reading_value(&mut errors, "value", self.value);
        errors
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub title: Option<String>,
}

impl CreateStaffRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "name", &self.name);
        check_age(&mut errors, self.age);
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEmployeeRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub active: Option<bool>,
    /// Only meaningful for staff records
    #[serde(default)]
    pub title: Option<String>,
}

impl UpdateEmployeeRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            check_name(&mut errors, "name", name);
        }
        check_age(&mut errors, self.age);
        errors
    }
}

// ========== Responses ==========

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiometricReadingResponse {
    pub kind: String,
    pub value: f64,
    pub unit: String,
    pub recorded_at: DateTime<Utc>,
}

impl From<&BiometricReading> for BiometricReadingResponse {
    fn from(reading: &BiometricReading) -> Self {
        Self {
            kind: reading.kind().to_string(),
            value: reading.value(),
            unit: reading.unit().to_string(),
            recorded_at: reading.recorded_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AstronautResponse {
    pub id: u64,
    pub name: String,
    pub age: Option<u32>,
    pub active: bool,
    pub medical_fitness: String,
    pub missions_completed: u32,
    pub biometrics: Vec<BiometricReadingResponse>,
    pub hired_at: DateTime<Utc>,
}

impl AstronautResponse {
    /// None when `employee` is not an astronaut
    pub fn from_employee(employee: &Employee) -> Option<Self> {
        let profile = employee.astronaut_profile()?;
        Some(Self {
            id: employee.id().value(),
            name: employee.name().to_string(),
            age: employee.age(),
            active: employee.is_active(),
            medical_fitness: profile.medical_fitness().as_str().to_string(),
            missions_completed: profile.missions_completed(),
            biometrics: profile.biometrics().iter().map(Into::into).collect(),
            hired_at: employee.hired_at(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeResponse {
    pub id: u64,
    pub name: String,
    pub age: Option<u32>,
    pub active: bool,
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub hired_at: DateTime<Utc>,
}

impl From<&Employee> for EmployeeResponse {
    fn from(employee: &Employee) -> Self {
        let title = match employee.role() {
            PersonnelRole::Staff { title } => title.clone(),
            PersonnelRole::Astronaut(_) => None,
        };
        Self {
            id: employee.id().value(),
            name: employee.name().to_string(),
            age: employee.age(),
            active: employee.is_active(),
            role: employee.role().tag(),
            title,
            hired_at: employee.hired_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_astronaut_validation() {
        let request: CreateAstronautRequest = serde_json::from_str(
            r#"{"name": " ", "age": 12, "medical_fitness": ""}"#,
        )
        .unwrap();

        let errors = request.validate();
        let fields: Vec<&str> = errors.fields().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "age", "medical_fitness"]);
    }

    #[test]
    fn test_name_length_bounds() {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "name", "A");
        check_name(&mut errors, "name", &"x".repeat(101));
        check_name(&mut errors, "name", "Yuri");
        assert_eq!(errors.fields().len(), 2);
    }

    #[test]
    fn test_update_request_is_partial() {
        let request: UpdateAstronautRequest =
            serde_json::from_str(r#"{"biometrics": {"kind": "heart_rate"}}"#).unwrap();

        assert!(request.name.is_none());
        assert!(request.validate().is_empty());
        assert!(request.biometrics.unwrap().value.is_none());
    }

    #[test]
    fn test_record_biometric_rejects_blank_kind() {
        let request: RecordBiometricRequest =
            serde_json::from_str(r#"{"kind": "", "value": 72.0}"#).unwrap();
        assert_eq!(request.validate().fields()[0].field, "kind");
    }
}
