//! # ASTRA Domain Layer
//!
//! The heart of ASTRA - personnel, missions and the mission lifecycle.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/     - Entities & Value Objects                      ││
//! │  │  repository/- Trait definitions (not implementations)       ││
//! │  │  service/   - Domain services (CommandPolicy)               ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Golden Rule
//!
//! **No I/O in this crate.**
//!
//! Timestamps come in as arguments, persistence goes out through the
//! repository traits. Swapping the record store or the HTTP framework never
//! touches this crate.

pub mod model;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use model::{
    biometric::{BiometricBand, BiometricLimits, BiometricReading},
    employee::{AstronautProfile, Employee, EmployeeId, MedicalFitness, PersonnelRole},
    event::{MissionEvent, MissionEventKind},
    mission::{
        EmergencyReport, InvalidMissionCode, Mission, MissionCode, MissionConfig, MissionError,
        MissionId, MissionMetrics, MissionStatus, MissionType, Priority,
    },
    protocol::{EmergencyProtocol, ProtocolError, ProtocolState, ProtocolTrigger},
    ParseEnumError,
};

pub use repository::{
    mission_repository::{MissionRepository, RepositoryError},
    personnel_repository::PersonnelRepository,
};

pub use service::command_policy::CommandPolicy;
