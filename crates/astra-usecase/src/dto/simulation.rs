//! Launch simulation parameters and result
//!
//! No trajectory is computed yet; the parameters are validated, echoed back
//! and the run always reports success.

use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;

pub const SIMULATION_MESSAGE: &str = "Simulação executada com sucesso";
pub const SIMULATION_OUTCOME: &str = "SUCESSO";

/// Vehicle parameters; absent fields fall back to a Saturn V first stage
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct SimulationRequest {
    #[serde(default)]
    pub max_time_s: Option<f64>,
    #[serde(default)]
    pub initial_mass_kg: Option<f64>,
    #[serde(default)]
    pub propellant_mass_kg: Option<f64>,
    #[serde(default)]
    pub thrust_n: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationParameters {
    pub max_time_s: f64,
    pub initial_mass_kg: f64,
    pub propellant_mass_kg: f64,
    pub thrust_n: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            max_time_s: 600.0,
            initial_mass_kg: 549_000.0,
            propellant_mass_kg: 507_000.0,
            thrust_n: 7_607_000.0,
        }
    }
}

impl SimulationRequest {
    /// Fill in defaults
    pub fn parameters(&self) -> SimulationParameters {
        let defaults = SimulationParameters::default();
        SimulationParameters {
            max_time_s: self.max_time_s.unwrap_or(defaults.max_time_s),
            initial_mass_kg: self.initial_mass_kg.unwrap_or(defaults.initial_mass_kg),
            propellant_mass_kg: self.propellant_mass_kg.unwrap_or(defaults.propellant_mass_kg),
            thrust_n: self.thrust_n.unwrap_or(defaults.thrust_n),
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let given = [
            ("max_time_s", self.max_time_s),
            ("initial_mass_kg", self.initial_mass_kg),
            ("propellant_mass_kg", self.propellant_mass_kg),
            ("thrust_n", self.thrust_n),
        ];
        for (field, value) in given {
            if matches!(value, Some(v) if !(v.is_finite() && v > 0.0)) {
                errors.add(field, "must be a positive number");
            }
        }

        let params = self.parameters();
        if errors.is_empty() && params.propellant_mass_kg >= params.initial_mass_kg {
            errors.add("propellant_mass_kg", "must be less than initial_mass_kg");
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResponse {
    pub mission_id: u64,
    pub message: &'static str,
    pub outcome: &'static str,
    pub parameters: SimulationParameters,
}
