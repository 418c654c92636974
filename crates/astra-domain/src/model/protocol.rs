//! EmergencyProtocol - Procedures that kick in when a mission declares an emergency

use chrono::{DateTime, Utc};
use thiserror::Error;

/// When a protocol applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolTrigger {
    /// Applies to every emergency
    Always,
    /// Applies when the emergency description mentions this keyword
    Keyword(String),
}

impl ProtocolTrigger {
    pub fn matches(&self, emergency_description: &str) -> bool {
        match self {
            ProtocolTrigger::Always => true,
            ProtocolTrigger::Keyword(keyword) => emergency_description
                .to_lowercase()
                .contains(&keyword.to_lowercase()),
        }
    }
}

/// Where a protocol is in its own lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    /// Ready to be activated
    Armed,
    /// Activated during an emergency
    Active { activated_at: DateTime<Utc> },
    /// Switched off by operators; never applicable
    Disarmed,
}

impl ProtocolState {
    pub fn tag(&self) -> &'static str {
        match self {
            ProtocolState::Armed => "ARMED",
            ProtocolState::Active { .. } => "ACTIVE",
            ProtocolState::Disarmed => "DISARMED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("protocol '{name}' is already active")]
    AlreadyActive { name: String },

    #[error("protocol '{name}' is disarmed")]
    Disarmed { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergencyProtocol {
    name: String,
    description: String,
    trigger: ProtocolTrigger,
    state: ProtocolState,
}

impl EmergencyProtocol {
    /// Create an armed protocol
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        trigger: ProtocolTrigger,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            trigger,
            state: ProtocolState::Armed,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn trigger(&self) -> &ProtocolTrigger {
        &self.trigger
    }

    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// Whether this protocol should fire for an emergency described by `emergency`
    pub fn is_applicable(&self, emergency: &str) -> bool {
        self.state != ProtocolState::Disarmed && self.trigger.matches(emergency)
    }

    pub fn activate(&mut self, at: DateTime<Utc>) -> Result<(), ProtocolError> {
        match self.state {
            ProtocolState::Armed => {
                self.state = ProtocolState::Active { activated_at: at };
                Ok(())
            }
            ProtocolState::Active { .. } => Err(ProtocolError::AlreadyActive {
                name: self.name.clone(),
            }),
            ProtocolState::Disarmed => Err(ProtocolError::Disarmed {
                name: self.name.clone(),
            }),
        }
    }

    pub fn disarm(&mut self) {
        self.state = ProtocolState::Disarmed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_trigger_is_case_insensitive() {
        let trigger = ProtocolTrigger::Keyword("Breach".to_string());
        assert!(trigger.matches("hull BREACH on deck 3"));
        assert!(!trigger.matches("fire in the galley"));
    }

    #[test]
    fn test_activation() {
        let now = Utc::now();
        let mut protocol =
            EmergencyProtocol::new("EVAC", "Evacuate to the capsule", ProtocolTrigger::Always);

        protocol.activate(now).unwrap();
        assert_eq!(protocol.state(), ProtocolState::Active { activated_at: now });

        let err = protocol.activate(now).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::AlreadyActive {
                name: "EVAC".to_string()
            }
        );
    }

    #[test]
    fn test_disarmed_is_not_applicable() {
        let mut protocol =
            EmergencyProtocol::new("SEAL", "Seal bulkheads", ProtocolTrigger::Always);
        protocol.disarm();

        assert!(!protocol.is_applicable("anything"));
        assert!(protocol.activate(Utc::now()).is_err());
    }
}
