//! Request and response shapes for missions

use astra_domain::{
    EmergencyProtocol, EmergencyReport, Mission, MissionEvent, MissionMetrics, ProtocolState,
    ProtocolTrigger,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::personnel::check_name;
use crate::error::ValidationErrors;

// ========== Requests ==========

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMissionRequest {
    /// Generated as `{TYPE}-{YEAR}-{NNN}` when absent
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub mission_type: String,
    #[serde(default)]
    pub priority: Option<String>,
    /// Defaults to the time the request is handled
    #[serde(default)]
    pub planned_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub planned_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_crew_size: Option<usize>,
}

impl CreateMissionRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "name", &self.name);
        if self.mission_type.trim().is_empty() {
            errors.add("mission_type", "must not be blank");
        }
        if let (Some(start), Some(end)) = (self.planned_start, self.planned_end) {
            if end < start {
                errors.add("planned_end", "must not be before planned_start");
            }
        }
        if self.max_crew_size == Some(0) {
            errors.add("max_crew_size", "must be at least 1");
        }
        errors
    }
}

/// Partial update; `status` is reached through the lifecycle operations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMissionRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mission_type: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub planned_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub planned_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_crew_size: Option<usize>,
    #[serde(default)]
    pub status: Option<String>,
    /// Pause reason or emergency description when `status` needs one
    #[serde(default)]
    pub status_reason: Option<String>,
}

impl UpdateMissionRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            check_name(&mut errors, "name", name);
        }
        if let (Some(start), Some(end)) = (self.planned_start, self.planned_end) {
            if end < start {
                errors.add("planned_end", "must not be before planned_start");
            }
        }
        if self.max_crew_size == Some(0) {
            errors.add("max_crew_size", "must be at least 1");
        }
        errors
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CrewMemberRequest {
    pub astronaut_id: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PauseRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FinishRequest {
    pub success: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmergencyRequest {
    pub description: String,
}

impl EmergencyRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.description.trim().is_empty() {
            errors.add("description", "must not be blank");
        }
        errors
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddProtocolRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Applies to every emergency when absent
    #[serde(default)]
    pub keyword: Option<String>,
}

impl AddProtocolRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "must not be blank");
        }
        if matches!(&self.keyword, Some(k) if k.trim().is_empty()) {
            errors.add("keyword", "must not be blank when given");
        }
        errors
    }

    pub fn to_protocol(&self) -> EmergencyProtocol {
        let trigger = match &self.keyword {
            Some(keyword) => ProtocolTrigger::Keyword(keyword.trim().to_string()),
            None => ProtocolTrigger::Always,
        };
        EmergencyProtocol::new(
            self.name.trim(),
            self.description.clone().unwrap_or_default(),
            trigger,
        )
    }
}

// ========== Responses ==========

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionEventResponse {
    pub kind: &'static str,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

impl From<&MissionEvent> for MissionEventResponse {
    fn from(event: &MissionEvent) -> Self {
        Self {
            kind: event.kind().tag(),
            description: event.description().to_string(),
            occurred_at: event.occurred_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolResponse {
    pub name: String,
    pub description: String,
    /// Keyword the emergency description must contain, None = always applies
    pub keyword: Option<String>,
    pub state: &'static str,
    pub activated_at: Option<DateTime<Utc>>,
}

impl From<&EmergencyProtocol> for ProtocolResponse {
    fn from(protocol: &EmergencyProtocol) -> Self {
        let keyword = match protocol.trigger() {
            ProtocolTrigger::Always => None,
            ProtocolTrigger::Keyword(k) => Some(k.clone()),
        };
        let activated_at = match protocol.state() {
            ProtocolState::Active { activated_at } => Some(activated_at),
            _ => None,
        };
        Self {
            name: protocol.name().to_string(),
            description: protocol.description().to_string(),
            keyword,
            state: protocol.state().tag(),
            activated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsResponse {
    pub pause_count: u32,
    pub emergency_count: u32,
    pub protocols_activated: u32,
    pub duration_seconds: Option<i64>,
}

impl From<&MissionMetrics> for MetricsResponse {
    fn from(metrics: &MissionMetrics) -> Self {
        Self {
            pause_count: metrics.pause_count,
            emergency_count: metrics.emergency_count,
            protocols_activated: metrics.protocols_activated,
            duration_seconds: metrics.duration.map(|d| d.num_seconds()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionResponse {
    pub id: u64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub mission_type: &'static str,
    pub status: &'static str,
    pub priority: &'static str,
    pub planned_start: DateTime<Utc>,
    pub planned_end: Option<DateTime<Utc>>,
    pub actual_start: Option<DateTime<Utc>>,
    pub actual_end: Option<DateTime<Utc>>,
    pub crew: Vec<u64>,
    pub commander_id: Option<u64>,
    pub protocols: Vec<ProtocolResponse>,
    pub metrics: MetricsResponse,
    pub max_crew_size: Option<usize>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: u64,
}

impl From<&Mission> for MissionResponse {
    fn from(mission: &Mission) -> Self {
        Self {
            id: mission.id().value(),
            code: mission.code().to_string(),
            name: mission.name().to_string(),
            description: mission.description().map(str::to_string),
            mission_type: mission.mission_type().as_str(),
            status: mission.status().as_str(),
            priority: mission.priority().as_str(),
            planned_start: mission.planned_start(),
            planned_end: mission.planned_end(),
            actual_start: mission.actual_start(),
            actual_end: mission.actual_end(),
            crew: mission.crew().iter().map(|id| id.value()).collect(),
            commander_id: mission.commander().map(|id| id.value()),
            protocols: mission.protocols().iter().map(Into::into).collect(),
            metrics: mission.metrics().into(),
            max_crew_size: mission.config().max_crew_size,
            created_at: mission.created_at(),
            updated_at: mission.updated_at(),
            version: mission.version(),
        }
    }
}

/// Mission after an emergency, with the protocol outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyResponse {
    pub mission: MissionResponse,
    pub activated_protocols: Vec<String>,
    pub failed_protocols: Vec<String>,
}

impl EmergencyResponse {
    pub fn new(mission: &Mission, report: &EmergencyReport) -> Self {
        Self {
            mission: mission.into(),
            activated_protocols: report.activated.clone(),
            failed_protocols: report.failed.iter().map(|e| e.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateMissionRequest =
            serde_json::from_str(r#"{"name": "Ares", "mission_type": "EXPLORATION"}"#).unwrap();

        assert!(request.code.is_none());
        assert!(request.planned_start.is_none());
        assert!(request.validate().is_empty());
    }

    #[test]
    fn test_planned_end_before_start_is_rejected() {
        let start = Utc::now();
        let request = CreateMissionRequest {
            code: None,
            name: "Ares".to_string(),
            description: None,
            mission_type: "EXPLORATION".to_string(),
            priority: None,
            planned_start: Some(start),
            planned_end: Some(start - Duration::hours(1)),
            max_crew_size: Some(0),
        };

        let errors = request.validate();
        let fields: Vec<&str> = errors.fields().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["planned_end", "max_crew_size"]);
    }

    #[test]
    fn test_protocol_request_trigger() {
        let request: AddProtocolRequest =
            serde_json::from_str(r#"{"name": "SEAL", "keyword": "breach"}"#).unwrap();
        let protocol = request.to_protocol();
        assert_eq!(protocol.trigger(), &ProtocolTrigger::Keyword("breach".to_string()));

        let request: AddProtocolRequest = serde_json::from_str(r#"{"name": "EVAC"}"#).unwrap();
        assert_eq!(request.to_protocol().trigger(), &ProtocolTrigger::Always);
    }
}
