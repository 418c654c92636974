//! Mission - The aggregate at the center of ASTRA
//!
//! A Mission is an Entity (has identity that persists through changes).
//! It owns its crew roster (by astronaut id), its event log and its
//! emergency protocols. All lifecycle rules live here:
//!
//! ```text
//! PLANEJAMENTO ──► PRONTA ──► EM_ANDAMENTO ◄──► PAUSADA
//!                                 │
//!            (any state) ──► EMERGENCIA
//!                                 │
//!          EM_ANDAMENTO / EMERGENCIA ──► CONCLUIDA | ABORTADA
//! ```
//!
//! Every operation checks its preconditions before touching any field, so a
//! failed call leaves the mission exactly as it was.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use super::employee::{Employee, EmployeeId};
use super::event::{MissionEvent, MissionEventKind};
use super::protocol::{EmergencyProtocol, ProtocolError};
use super::ParseEnumError;

/// Unique identifier for a Mission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MissionId(u64);

impl MissionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for MissionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-facing mission code, e.g. `MARS-2025-001`
///
/// Dash-separated segments of upper-case ASCII letters and digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MissionCode(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid mission code '{0}': expected segments of A-Z/0-9 separated by '-'")]
pub struct InvalidMissionCode(pub String);

impl MissionCode {
    /// Parse a code, upper-casing it first
    pub fn parse(raw: &str) -> Result<Self, InvalidMissionCode> {
        let code = raw.trim().to_ascii_uppercase();
        let valid = !code.is_empty()
            && code.split('-').all(|segment| {
                !segment.is_empty()
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            });

        if valid {
            Ok(Self(code))
        } else {
            Err(InvalidMissionCode(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for MissionCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the mission is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissionType {
    Exploration,
    Resupply,
    Research,
    Maintenance,
    Rescue,
}

impl MissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionType::Exploration => "EXPLORATION",
            MissionType::Resupply => "RESUPPLY",
            MissionType::Research => "RESEARCH",
            MissionType::Maintenance => "MAINTENANCE",
            MissionType::Rescue => "RESCUE",
        }
    }

    pub fn all() -> &'static [MissionType] {
        &[
            MissionType::Exploration,
            MissionType::Resupply,
            MissionType::Research,
            MissionType::Maintenance,
            MissionType::Rescue,
        ]
    }
}

impl core::fmt::Display for MissionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for MissionType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("mission type", s))
    }
}

/// The current phase of a Mission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissionStatus {
    /// Being planned; crew and details can change (initial)
    Planning,
    /// Planned and cleared for launch
    Ready,
    /// Under way
    InProgress,
    /// Temporarily halted
    Paused,
    /// Emergency declared
    Emergency,
    /// Finished successfully (terminal)
    Completed,
    /// Finished unsuccessfully (terminal)
    Aborted,
}

impl MissionStatus {
    /// Wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::Planning => "PLANEJAMENTO",
            MissionStatus::Ready => "PRONTA",
            MissionStatus::InProgress => "EM_ANDAMENTO",
            MissionStatus::Paused => "PAUSADA",
            MissionStatus::Emergency => "EMERGENCIA",
            MissionStatus::Completed => "CONCLUIDA",
            MissionStatus::Aborted => "ABORTADA",
        }
    }

    pub fn all() -> &'static [MissionStatus] {
        &[
            MissionStatus::Planning,
            MissionStatus::Ready,
            MissionStatus::InProgress,
            MissionStatus::Paused,
            MissionStatus::Emergency,
            MissionStatus::Completed,
            MissionStatus::Aborted,
        ]
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MissionStatus::Completed | MissionStatus::Aborted)
    }

    /// Under way in some form (running, paused or in emergency)
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            MissionStatus::InProgress | MissionStatus::Paused | MissionStatus::Emergency
        )
    }

    /// Crew can be added and protocols registered
    pub fn is_editable(&self) -> bool {
        matches!(self, MissionStatus::Planning | MissionStatus::Ready)
    }

    /// Crew is locked in place
    pub fn locks_crew(&self) -> bool {
        matches!(self, MissionStatus::InProgress | MissionStatus::Emergency)
    }
}

impl core::fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for MissionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("mission status", s))
    }
}

/// How urgent the mission is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "BAIXA",
            Priority::Medium => "MEDIA",
            Priority::High => "ALTA",
            Priority::Critical => "CRITICA",
        }
    }

    pub fn all() -> &'static [Priority] {
        &[Priority::Low, Priority::Medium, Priority::High, Priority::Critical]
    }
}

impl core::fmt::Display for Priority {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("priority", s))
    }
}

/// Counters maintained by the lifecycle operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissionMetrics {
    pub pause_count: u32,
    pub emergency_count: u32,
    pub protocols_activated: u32,
    /// Actual end minus actual start, once the mission has finished
    pub duration: Option<Duration>,
}

/// Per-mission settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissionConfig {
    /// Upper bound on crew size (None = unlimited)
    pub max_crew_size: Option<usize>,
}

/// What happened to the emergency protocols when an emergency was declared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmergencyReport {
    /// Protocols switched to active
    pub activated: Vec<String>,
    /// Applicable protocols that could not be activated
    pub failed: Vec<ProtocolError>,
}

/// Errors that can occur during Mission operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissionError {
    #[error("Invalid state transition: cannot {operation} a mission in status {from}")]
    InvalidStateTransition {
        from: MissionStatus,
        operation: &'static str,
    },

    #[error("Employee {employee_id} is not an astronaut")]
    NotAnAstronaut { employee_id: EmployeeId },

    #[error("Commander must be part of the crew: astronaut {astronaut_id} is not")]
    NotACrewMember { astronaut_id: EmployeeId },

    #[error("Crew is full ({max} members)")]
    CrewFull { max: usize },

    #[error("Crew limit {max} is below the current crew of {crew}")]
    CrewLimitBelowCrew { max: usize, crew: usize },

    #[error("Astronaut {astronaut_id} already commands mission {mission_code}")]
    AlreadyCommanding {
        astronaut_id: EmployeeId,
        mission_code: String,
    },

    #[error("Emergency protocol '{name}' is already registered")]
    DuplicateProtocol { name: String },

    #[error("No emergency protocol named '{name}'")]
    UnknownProtocol { name: String },
}

impl MissionError {
    /// True for errors caused by the mission's status rather than the arguments
    pub fn is_state_transition(&self) -> bool {
        matches!(self, MissionError::InvalidStateTransition { .. })
    }
}

/// Mission - The central aggregate of ASTRA
#[derive(Debug, Clone)]
pub struct Mission {
    /// Unique identifier (Entity identity)
    id: MissionId,
    code: MissionCode,
    name: String,
    description: Option<String>,
    mission_type: MissionType,
    status: MissionStatus,
    priority: Priority,
    planned_start: DateTime<Utc>,
    planned_end: Option<DateTime<Utc>>,
    actual_start: Option<DateTime<Utc>>,
    actual_end: Option<DateTime<Utc>>,
    /// Astronaut ids, unique by identity
    crew: BTreeSet<EmployeeId>,
    /// Always an element of `crew` when set
    commander: Option<EmployeeId>,
    /// Append-only
    events: Vec<MissionEvent>,
    protocols: Vec<EmergencyProtocol>,
    metrics: MissionMetrics,
    config: MissionConfig,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency counter (0 = never persisted)
    version: u64,
}

impl Mission {
    /// Create a new Mission in `PLANEJAMENTO`
    pub fn new(
        id: MissionId,
        code: MissionCode,
        name: impl Into<String>,
        mission_type: MissionType,
        planned_start: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            name: name.into(),
            description: None,
            mission_type,
            status: MissionStatus::Planning,
            priority: Priority::default(),
            planned_start,
            planned_end: None,
            actual_start: None,
            actual_end: None,
            crew: BTreeSet::new(),
            commander: None,
            events: Vec::new(),
            protocols: Vec::new(),
            metrics: MissionMetrics::default(),
            config: MissionConfig::default(),
            created_at,
            updated_at: None,
            version: 0,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Builder: set planned end
    pub fn with_planned_end(mut self, planned_end: DateTime<Utc>) -> Self {
        self.planned_end = Some(planned_end);
        self
    }

    /// Builder: set config
    pub fn with_config(mut self, config: MissionConfig) -> Self {
        self.config = config;
        self
    }

    /// Builder: set the persisted version (used by record stores)
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    // ========== Getters ==========

    pub fn id(&self) -> MissionId {
        self.id
    }

    pub fn code(&self) -> &MissionCode {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn mission_type(&self) -> MissionType {
        self.mission_type
    }

    pub fn status(&self) -> MissionStatus {
        self.status
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn planned_start(&self) -> DateTime<Utc> {
        self.planned_start
    }

    pub fn planned_end(&self) -> Option<DateTime<Utc>> {
        self.planned_end
    }

    pub fn actual_start(&self) -> Option<DateTime<Utc>> {
        self.actual_start
    }

    pub fn actual_end(&self) -> Option<DateTime<Utc>> {
        self.actual_end
    }

    pub fn crew(&self) -> &BTreeSet<EmployeeId> {
        &self.crew
    }

    pub fn is_crew_member(&self, astronaut_id: EmployeeId) -> bool {
        self.crew.contains(&astronaut_id)
    }

    pub fn commander(&self) -> Option<EmployeeId> {
        self.commander
    }

    pub fn events(&self) -> &[MissionEvent] {
        &self.events
    }

    pub fn protocols(&self) -> &[EmergencyProtocol] {
        &self.protocols
    }

    pub fn metrics(&self) -> &MissionMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &MissionConfig {
        &self.config
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_editable(&self) -> bool {
        self.status.is_editable()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    // ========== State Transitions ==========

    /// Clear a planned mission for launch
    pub fn mark_ready(&mut self, at: DateTime<Utc>) -> Result<(), MissionError> {
        self.require(&[MissionStatus::Planning], "mark ready")?;
        self.status = MissionStatus::Ready;
        self.record(MissionEventKind::MissionReady, "Mission cleared for launch", at);
        Ok(())
    }

    /// Launch the mission
    pub fn start(&mut self, at: DateTime<Utc>) -> Result<(), MissionError> {
        self.require(&[MissionStatus::Ready], "start")?;
        self.status = MissionStatus::InProgress;
        self.actual_start = Some(at);
        self.record(MissionEventKind::MissionStarted, "Mission started", at);
        Ok(())
    }

    /// Halt a running mission
    pub fn pause(
        &mut self,
        reason: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<(), MissionError> {
        self.require(&[MissionStatus::InProgress], "pause")?;
        self.status = MissionStatus::Paused;
        self.metrics.pause_count += 1;
        self.record(MissionEventKind::MissionPaused, reason, at);
        Ok(())
    }

    /// Continue a paused mission
    pub fn resume(&mut self, at: DateTime<Utc>) -> Result<(), MissionError> {
        self.require(&[MissionStatus::Paused], "resume")?;
        self.status = MissionStatus::InProgress;
        self.record(MissionEventKind::MissionResumed, "Mission resumed", at);
        Ok(())
    }

    /// End the mission, successfully or not
    pub fn finish(&mut self, success: bool, at: DateTime<Utc>) -> Result<(), MissionError> {
        self.require(
            &[MissionStatus::InProgress, MissionStatus::Emergency],
            "finish",
        )?;

        self.actual_end = Some(at);
        self.metrics.duration = self.actual_start.map(|started| at - started);

        if success {
            self.status = MissionStatus::Completed;
            self.record(
                MissionEventKind::MissionCompleted,
                "Mission completed successfully",
                at,
            );
        } else {
            self.status = MissionStatus::Aborted;
            self.record(MissionEventKind::MissionAborted, "Mission aborted", at);
        }
        Ok(())
    }

    /// Enter emergency status from anywhere and fire applicable protocols
    ///
    /// Protocol activations are independent: one failing does not stop the
    /// others, and nothing already activated is undone.
    pub fn declare_emergency(
        &mut self,
        description: impl Into<String>,
        at: DateTime<Utc>,
    ) -> EmergencyReport {
        let description = description.into();

        self.status = MissionStatus::Emergency;
        self.metrics.emergency_count += 1;
        self.record(MissionEventKind::EmergencyActivated, description.as_str(), at);

        let mut report = EmergencyReport::default();
        for protocol in self
            .protocols
            .iter_mut()
            .filter(|p| p.is_applicable(&description))
        {
            match protocol.activate(at) {
                Ok(()) => {
                    self.metrics.protocols_activated += 1;
                    report.activated.push(protocol.name().to_string());
                }
                Err(e) => report.failed.push(e),
            }
        }
        report
    }

    /// Move to `target` through whichever operation gets there
    ///
    /// `reason` is used for pauses and emergencies. Asking for the current
    /// status is a no-op.
    pub fn transition_to(
        &mut self,
        target: MissionStatus,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<EmergencyReport>, MissionError> {
        if target == self.status {
            return Ok(None);
        }

        match target {
            MissionStatus::Planning => Err(MissionError::InvalidStateTransition {
                from: self.status,
                operation: "return to planning",
            }),
            MissionStatus::Ready => self.mark_ready(at).map(|_| None),
            MissionStatus::InProgress if self.status == MissionStatus::Paused => {
                self.resume(at).map(|_| None)
            }
            MissionStatus::InProgress => self.start(at).map(|_| None),
            MissionStatus::Paused => self.pause(reason, at).map(|_| None),
            MissionStatus::Completed => self.finish(true, at).map(|_| None),
            MissionStatus::Aborted => self.finish(false, at).map(|_| None),
            MissionStatus::Emergency => Ok(Some(self.declare_emergency(reason, at))),
        }
    }

    // ========== Crew ==========

    /// Put an astronaut on the crew
    ///
    /// Adding someone already aboard leaves the roster unchanged but is still logged.
    pub fn add_crew_member(
        &mut self,
        astronaut: &Employee,
        at: DateTime<Utc>,
    ) -> Result<(), MissionError> {
        self.require(&[MissionStatus::Planning, MissionStatus::Ready], "change the crew of")?;

        if !astronaut.is_astronaut() {
            return Err(MissionError::NotAnAstronaut {
                employee_id: astronaut.id(),
            });
        }

        if !self.crew.contains(&astronaut.id()) {
            if let Some(max) = self.config.max_crew_size {
                if self.crew.len() >= max {
                    return Err(MissionError::CrewFull { max });
                }
            }
        }

        self.crew.insert(astronaut.id());
        self.record(
            MissionEventKind::CrewMemberAdded,
            format!("Astronaut {} added", astronaut.name()),
            at,
        );
        Ok(())
    }

    /// Take an astronaut off the crew, clearing the commander seat if needed
    pub fn remove_crew_member(
        &mut self,
        astronaut: &Employee,
        at: DateTime<Utc>,
    ) -> Result<(), MissionError> {
        if self.status.locks_crew() {
            return Err(MissionError::InvalidStateTransition {
                from: self.status,
                operation: "remove crew from",
            });
        }

        self.crew.remove(&astronaut.id());
        if self.commander == Some(astronaut.id()) {
            self.commander = None;
        }
        self.record(
            MissionEventKind::CrewMemberRemoved,
            format!("Astronaut {} removed", astronaut.name()),
            at,
        );
        Ok(())
    }

    /// Designate a crew member as commander
    pub fn set_commander(
        &mut self,
        astronaut: &Employee,
        at: DateTime<Utc>,
    ) -> Result<(), MissionError> {
        if !self.crew.contains(&astronaut.id()) {
            return Err(MissionError::NotACrewMember {
                astronaut_id: astronaut.id(),
            });
        }

        self.commander = Some(astronaut.id());
        self.record(
            MissionEventKind::CommanderAssigned,
            format!("Astronaut {} assigned as commander", astronaut.name()),
            at,
        );
        Ok(())
    }

    // ========== Emergency Protocols ==========

    /// Register a protocol while the mission is still being prepared
    pub fn add_emergency_protocol(
        &mut self,
        protocol: EmergencyProtocol,
    ) -> Result<(), MissionError> {
        self.require(
            &[MissionStatus::Planning, MissionStatus::Ready],
            "register protocols on",
        )?;

        if self.protocols.iter().any(|p| p.name() == protocol.name()) {
            return Err(MissionError::DuplicateProtocol {
                name: protocol.name().to_string(),
            });
        }

        self.protocols.push(protocol);
        Ok(())
    }

    /// Switch a protocol off so later emergencies skip it
    pub fn disarm_protocol(&mut self, name: &str) -> Result<(), MissionError> {
        let protocol = self
            .protocols
            .iter_mut()
            .find(|p| p.name() == name)
            .ok_or_else(|| MissionError::UnknownProtocol {
                name: name.to_string(),
            })?;

        protocol.disarm();
        Ok(())
    }

    // ========== Details ==========

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn set_mission_type(&mut self, mission_type: MissionType) {
        self.mission_type = mission_type;
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn reschedule(&mut self, planned_start: DateTime<Utc>, planned_end: Option<DateTime<Utc>>) {
        self.planned_start = planned_start;
        self.planned_end = planned_end;
    }

    /// Replace the settings; a crew limit may not drop below the current crew
    pub fn set_config(&mut self, config: MissionConfig) -> Result<(), MissionError> {
        if let Some(max) = config.max_crew_size {
            if max < self.crew.len() {
                return Err(MissionError::CrewLimitBelowCrew {
                    max,
                    crew: self.crew.len(),
                });
            }
        }
        self.config = config;
        Ok(())
    }

    /// Stamp the last-updated time
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }

    // ========== Internals ==========

    fn require(
        &self,
        allowed: &[MissionStatus],
        operation: &'static str,
    ) -> Result<(), MissionError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(MissionError::InvalidStateTransition {
                from: self.status,
                operation,
            })
        }
    }

    fn record(
        &mut self,
        kind: MissionEventKind,
        description: impl Into<String>,
        at: DateTime<Utc>,
    ) {
        self.events.push(MissionEvent::new(kind, description, at));
    }
}

impl PartialEq for Mission {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Mission {}
