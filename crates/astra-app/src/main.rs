//! # ASTRA - Mission Control Backend
//!
//! Entry point that wires the layers together.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  main.rs (this file) - Dependency Injection & Wiring         │
//! │    │                                                         │
//! │    ├── Loads: AstraConfig (shared)                           │
//! │    ├── Creates: InMemory*Repository (adapter)                │
//! │    ├── Creates: Mission/Astronaut/Employee services (usecase)│
//! │    └── Serves: axum router (adapter)                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use astra_adapter::controller::{router, AppState};
use astra_adapter::repository::{InMemoryMissionRepository, InMemoryPersonnelRepository};
use astra_domain::{BiometricBand, BiometricLimits, MissionConfig};
use astra_shared::AstraConfig;
use astra_usecase::{AstronautService, EmployeeService, MissionService};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "astra")]
#[command(about = "ASTRA - Mission and crew management API")]
#[command(version)]
struct Cli {
    /// Configuration file (.json, .yaml or .yml)
    #[arg(short, long, env = "ASTRA_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long, env = "ASTRA_HOST")]
    host: Option<String>,

    /// Override the listen port
    #[arg(short, long, env = "ASTRA_PORT")]
    port: Option<u16>,
}

impl Cli {
    /// Command-line values win over the file
    fn apply(&self, config: &mut AstraConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

fn biometric_limits(config: &AstraConfig) -> BiometricLimits {
    config
        .biometric_limits
        .iter()
        .fold(BiometricLimits::new(), |limits, (kind, band)| {
            limits.with_band(kind.as_str(), BiometricBand::new(band.min, band.max))
        })
}

fn build_state(config: &AstraConfig) -> AppState {
    // Adapters
    let missions = Arc::new(InMemoryMissionRepository::new());
    let personnel = Arc::new(InMemoryPersonnelRepository::new());

    // Application services
    let mission_service = MissionService::new(missions.clone(), personnel.clone())
        .with_defaults(MissionConfig {
            max_crew_size: config.missions.max_crew_size,
        });
    let astronaut_service =
        AstronautService::new(personnel.clone(), missions.clone(), biometric_limits(config));
    let employee_service = EmployeeService::new(personnel, missions);

    AppState::new(mission_service, astronaut_service, employee_service)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AstraConfig::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply(&mut config);

    // RUST_LOG takes precedence over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app = router(build_state(&config));

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "ASTRA listening");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use astra_shared::BandConfig;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["astra", "--port", "9000"]);
        let mut config = AstraConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_biometric_limits_from_config() {
        let mut config = AstraConfig::default();
        config
            .biometric_limits
            .insert("heart_rate".to_string(), BandConfig { min: 50.0, max: 120.0 });

        let limits = biometric_limits(&config);
        assert_eq!(limits.band_for("heart_rate"), Some(&BiometricBand::new(50.0, 120.0)));
        assert!(limits.band_for("oxygen_saturation").is_some());
        assert!(limits.band_for("blood_pressure").is_none());
    }

    #[test]
    fn test_state_uses_mission_defaults() {
        let mut config = AstraConfig::default();
        config.missions.max_crew_size = Some(3);

        let state = build_state(&config);
        let mission = state
            .missions
            .create(astra_usecase::dto::CreateMissionRequest {
                code: None,
                name: "Gateway".to_string(),
                description: None,
                mission_type: "RESUPPLY".to_string(),
                priority: None,
                planned_start: None,
                planned_end: None,
                max_crew_size: None,
            })
            .unwrap();
        assert_eq!(mission.max_crew_size, Some(3));
    }
}
