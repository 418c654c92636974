//! Employee - A person on the ASTRA payroll
//!
//! Employee is an Entity (has identity).
//! What kind of work the person does lives in a role payload instead of a
//! subtype: an astronaut is an `Employee` whose role is
//! `PersonnelRole::Astronaut`.

use chrono::{DateTime, Utc};

use super::biometric::BiometricReading;
use super::ParseEnumError;

/// Unique identifier for an Employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmployeeId(u64);

impl EmployeeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Medical fitness category of an astronaut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MedicalFitness {
    Low,
    Medium,
    High,
}

impl MedicalFitness {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicalFitness::Low => "LOW",
            MedicalFitness::Medium => "MEDIUM",
            MedicalFitness::High => "HIGH",
        }
    }

    pub fn all() -> &'static [MedicalFitness] {
        &[MedicalFitness::Low, MedicalFitness::Medium, MedicalFitness::High]
    }
}

impl core::fmt::Display for MedicalFitness {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for MedicalFitness {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("medical fitness", s))
    }
}

/// Astronaut-specific data carried by the role payload
#[derive(Debug, Clone, PartialEq)]
pub struct AstronautProfile {
    medical_fitness: MedicalFitness,
    missions_completed: u32,
    biometrics: Vec<BiometricReading>,
}

impl AstronautProfile {
    pub fn new(medical_fitness: MedicalFitness) -> Self {
        Self {
            medical_fitness,
            missions_completed: 0,
            biometrics: Vec::new(),
        }
    }

    /// Builder: set the missions-completed counter
    pub fn with_missions_completed(mut self, missions_completed: u32) -> Self {
        self.missions_completed = missions_completed;
        self
    }

    pub fn medical_fitness(&self) -> MedicalFitness {
        self.medical_fitness
    }

    pub fn missions_completed(&self) -> u32 {
        self.missions_completed
    }

    /// Readings in the order they were recorded
    pub fn biometrics(&self) -> &[BiometricReading] {
        &self.biometrics
    }

    /// Most recent reading of the given kind
    pub fn latest_reading(&self, kind: &str) -> Option<&BiometricReading> {
        self.biometrics.iter().rev().find(|r| r.kind() == kind)
    }

    pub fn set_medical_fitness(&mut self, fitness: MedicalFitness) {
        self.medical_fitness = fitness;
    }

    pub fn set_missions_completed(&mut self, missions_completed: u32) {
        self.missions_completed = missions_completed;
    }

    /// Append a new reading
    pub fn record_reading(&mut self, reading: BiometricReading) {
        self.biometrics.push(reading);
    }

    /// Put `reading` in place of the latest reading of the same kind,
    /// or append it if there is none.
    ///
    /// Readings are never edited in place; the old value is swapped out whole.
    pub fn replace_latest_reading(&mut self, reading: BiometricReading) {
        let position = self
            .biometrics
            .iter()
            .rposition(|r| r.kind() == reading.kind());

        match position {
            Some(index) => self.biometrics[index] = reading,
            None => self.biometrics.push(reading),
        }
    }
}

/// What a person does at the agency
#[derive(Debug, Clone, PartialEq)]
pub enum PersonnelRole {
    /// Flight crew
    Astronaut(AstronautProfile),
    /// Everyone else (ground control, engineering, management)
    Staff {
        /// Job title, if known
        title: Option<String>,
    },
}

impl PersonnelRole {
    /// Short tag used in listings
    pub fn tag(&self) -> &'static str {
        match self {
            PersonnelRole::Astronaut(_) => "ASTRONAUT",
            PersonnelRole::Staff { .. } => "STAFF",
        }
    }
}

/// Employee - base personnel record
#[derive(Debug, Clone)]
pub struct Employee {
    /// Unique identifier (Entity identity)
    id: EmployeeId,
    /// Full name
    name: String,
    /// Age in years, if known
    age: Option<u32>,
    /// Whether the person is currently on active duty
    active: bool,
    /// Role-specific payload
    role: PersonnelRole,
    /// When the record was created
    hired_at: DateTime<Utc>,
    /// Optimistic concurrency counter (0 = never persisted)
    version: u64,
}

impl Employee {
    /// Create a new Employee
    pub fn new(
        id: EmployeeId,
        name: impl Into<String>,
        role: PersonnelRole,
        hired_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            age: None,
            active: true,
            role,
            hired_at,
            version: 0,
        }
    }

    /// Create a new astronaut
    pub fn astronaut(
        id: EmployeeId,
        name: impl Into<String>,
        profile: AstronautProfile,
        hired_at: DateTime<Utc>,
    ) -> Self {
        Self::new(id, name, PersonnelRole::Astronaut(profile), hired_at)
    }

    /// Create a new staff member
    pub fn staff(
        id: EmployeeId,
        name: impl Into<String>,
        title: Option<String>,
        hired_at: DateTime<Utc>,
    ) -> Self {
        Self::new(id, name, PersonnelRole::Staff { title }, hired_at)
    }

    /// Builder: set age
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Builder: set active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Builder: set the persisted version (used by record stores)
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    // ========== Getters ==========

    pub fn id(&self) -> EmployeeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> Option<u32> {
        self.age
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn role(&self) -> &PersonnelRole {
        &self.role
    }

    pub fn hired_at(&self) -> DateTime<Utc> {
        self.hired_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// The astronaut payload, if this employee is an astronaut
    pub fn astronaut_profile(&self) -> Option<&AstronautProfile> {
        match &self.role {
            PersonnelRole::Astronaut(profile) => Some(profile),
            PersonnelRole::Staff { .. } => None,
        }
    }

    pub fn astronaut_profile_mut(&mut self) -> Option<&mut AstronautProfile> {
        match &mut self.role {
            PersonnelRole::Astronaut(profile) => Some(profile),
            PersonnelRole::Staff { .. } => None,
        }
    }

    pub fn is_astronaut(&self) -> bool {
        self.astronaut_profile().is_some()
    }

    // ========== Mutations ==========

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_age(&mut self, age: u32) {
        self.age = Some(age);
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Change the job title. Returns false for astronauts, who have none.
    pub fn set_title(&mut self, new_title: impl Into<String>) -> bool {
        match &mut self.role {
            PersonnelRole::Staff { title } => {
                *title = Some(new_title.into());
                true
            }
            PersonnelRole::Astronaut(_) => false,
        }
    }
}

impl PartialEq for Employee {
    fn eq(&self, other: &Self) -> bool {
        // Entity equality: same ID = same entity
        self.id == other.id
    }
}

impl Eq for Employee {}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(kind: &str, value: f64) -> BiometricReading {
        BiometricReading::new(kind, value, "bpm", Utc::now())
    }

    #[test]
    fn test_astronaut_creation() {
        let astronaut = Employee::astronaut(
            EmployeeId::new(1),
            "Marcos Pontes",
            AstronautProfile::new(MedicalFitness::High).with_missions_completed(1),
            Utc::now(),
        )
        .with_age(62);

        assert_eq!(astronaut.name(), "Marcos Pontes");
        assert_eq!(astronaut.age(), Some(62));
        assert!(astronaut.is_active());
        assert!(astronaut.is_astronaut());
        assert_eq!(astronaut.role().tag(), "ASTRONAUT");
        assert_eq!(
            astronaut.astronaut_profile().unwrap().missions_completed(),
            1
        );
    }

    #[test]
    fn test_staff_has_no_profile() {
        let mut staff = Employee::staff(
            EmployeeId::new(2),
            "Flight Director",
            Some("Director".to_string()),
            Utc::now(),
        );

        assert!(!staff.is_astronaut());
        assert!(staff.set_title("Chief Director"));
        assert_eq!(
            staff.role(),
            &PersonnelRole::Staff {
                title: Some("Chief Director".to_string())
            }
        );
    }

    #[test]
    fn test_astronaut_has_no_title() {
        let mut astronaut = Employee::astronaut(
            EmployeeId::new(3),
            "A",
            AstronautProfile::new(MedicalFitness::Low),
            Utc::now(),
        );
        assert!(!astronaut.set_title("Pilot"));
    }

    #[test]
    fn test_entity_equality() {
        let a = Employee::staff(EmployeeId::new(7), "Ana", None, Utc::now());
        let b = Employee::staff(EmployeeId::new(7), "Ana Modified", None, Utc::now());

        assert_eq!(a, b);
    }

    #[test]
    fn test_medical_fitness_parse() {
        assert_eq!("high".parse::<MedicalFitness>().unwrap(), MedicalFitness::High);
        assert_eq!(" Medium ".parse::<MedicalFitness>().unwrap(), MedicalFitness::Medium);

        let err = "EXCELLENT".parse::<MedicalFitness>().unwrap_err();
        assert_eq!(err.value(), "EXCELLENT");
    }

    #[test]
    fn test_replace_latest_reading() {
        let mut profile = AstronautProfile::new(MedicalFitness::Medium);
        profile.record_reading(reading("heart_rate", 60.0));
        profile.record_reading(reading("oxygen", 98.0));
        profile.record_reading(reading("heart_rate", 70.0));

        profile.replace_latest_reading(reading("heart_rate", 75.0));

        let rates: Vec<f64> = profile
            .biometrics()
            .iter()
            .filter(|r| r.kind() == "heart_rate")
            .map(|r| r.value())
            .collect();
        assert_eq!(rates, vec![60.0, 75.0]);

        profile.replace_latest_reading(reading("temperature", 36.6));
        assert_eq!(profile.biometrics().len(), 4);
        assert_eq!(profile.latest_reading("temperature").unwrap().value(), 36.6);
    }
}
