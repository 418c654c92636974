//! MissionEvent - One line of a mission's log
//!
//! Events are Value Objects: immutable, append-only, owned by the mission
//! that recorded them.

use chrono::{DateTime, Utc};

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissionEventKind {
    MissionReady,
    MissionStarted,
    MissionPaused,
    MissionResumed,
    MissionCompleted,
    MissionAborted,
    EmergencyActivated,
    CrewMemberAdded,
    CrewMemberRemoved,
    CommanderAssigned,
}

impl MissionEventKind {
    /// Tag stored in the log and exposed over the API
    pub fn tag(&self) -> &'static str {
        match self {
            MissionEventKind::MissionReady => "MISSAO_PRONTA",
            MissionEventKind::MissionStarted => "MISSAO_INICIADA",
            MissionEventKind::MissionPaused => "MISSAO_PAUSADA",
            MissionEventKind::MissionResumed => "MISSAO_RETOMADA",
            MissionEventKind::MissionCompleted => "MISSAO_CONCLUIDA",
            MissionEventKind::MissionAborted => "MISSAO_ABORTADA",
            MissionEventKind::EmergencyActivated => "EMERGENCIA_ATIVADA",
            MissionEventKind::CrewMemberAdded => "TRIPULANTE_ADICIONADO",
            MissionEventKind::CrewMemberRemoved => "TRIPULANTE_REMOVIDO",
            MissionEventKind::CommanderAssigned => "COMANDANTE_DEFINIDO",
        }
    }

    /// Whether the event records a status change (as opposed to a roster change)
    pub fn is_lifecycle(&self) -> bool {
        !matches!(
            self,
            MissionEventKind::CrewMemberAdded
                | MissionEventKind::CrewMemberRemoved
                | MissionEventKind::CommanderAssigned
        )
    }
}

impl core::fmt::Display for MissionEventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}

/// An immutable log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionEvent {
    kind: MissionEventKind,
    description: String,
    occurred_at: DateTime<Utc>,
}

impl MissionEvent {
    pub fn new(
        kind: MissionEventKind,
        description: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            occurred_at,
        }
    }

    pub fn kind(&self) -> MissionEventKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tags() {
        assert_eq!(MissionEventKind::EmergencyActivated.tag(), "EMERGENCIA_ATIVADA");
        assert_eq!(MissionEventKind::MissionStarted.to_string(), "MISSAO_INICIADA");
    }

    #[test]
    fn test_lifecycle_classification() {
        assert!(MissionEventKind::MissionPaused.is_lifecycle());
        assert!(!MissionEventKind::CrewMemberAdded.is_lifecycle());
        assert!(!MissionEventKind::CommanderAssigned.is_lifecycle());
    }
}
