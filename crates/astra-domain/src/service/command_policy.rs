//! Command Policy - Rules that span more than one Mission
//!
//! An astronaut may command at most one unfinished mission at a time.
//! A single Mission cannot see the others, so the check lives here and the
//! application layer feeds it the missions the astronaut already commands.
//! The rule is enforced when a commander is assigned. An emergency declared
//! on a finished mission reopens it regardless; the overlap is only logged.
//!
//! This is pure domain logic - no I/O, no async.

use crate::model::employee::EmployeeId;
use crate::model::mission::{Mission, MissionError};

/// Stateless domain service; all state lives in the missions
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandPolicy;

impl CommandPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Check that `astronaut_id` may take command of `target`
    ///
    /// `commanded` are the missions currently commanded by the astronaut.
    /// Finished missions and `target` itself are ignored.
    pub fn check_assignment(
        &self,
        astronaut_id: EmployeeId,
        target: &Mission,
        commanded: &[Mission],
    ) -> Result<(), MissionError> {
        let conflict = commanded.iter().find(|m| {
            m.id() != target.id() && !m.is_terminal() && m.commander() == Some(astronaut_id)
        });

        match conflict {
            Some(other) => Err(MissionError::AlreadyCommanding {
                astronaut_id,
                mission_code: other.code().to_string(),
            }),
            None => Ok(()),
        }
    }
}
