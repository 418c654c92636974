//! # ASTRA Use Case Layer
//!
//! Application-specific business rules.
//! This layer orchestrates the flow of data between the domain and adapters:
//! requests come in as DTOs, aggregates are loaded through the repository
//! ports, mutated by domain operations and saved back.

pub mod dto;
pub mod error;
pub mod service;

pub use astra_domain;

pub use error::{FieldError, ServiceError, ServiceResult, ValidationErrors};
pub use service::{AstronautService, EmployeeService, MissionService};
