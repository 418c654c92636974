//! Configuration types for ASTRA

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{AstraError, InvalidBandError};

/// Where the HTTP server listens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Acceptable range for one kind of biometric reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandConfig {
    pub min: f64,
    pub max: f64,
}

/// Defaults applied to newly created missions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionDefaults {
    /// Crew size limit for new missions (None = unlimited)
    #[serde(default)]
    pub max_crew_size: Option<usize>,
}

/// Top-level configuration file (astra.json / astra.yaml)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AstraConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// tracing-subscriber filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Biometric bands keyed by reading kind
    #[serde(default = "default_biometric_limits")]
    pub biometric_limits: BTreeMap<String, BandConfig>,

    #[serde(default)]
    pub missions: MissionDefaults,
}

impl Default for AstraConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            log_filter: default_log_filter(),
            biometric_limits: default_biometric_limits(),
            missions: MissionDefaults::default(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_biometric_limits() -> BTreeMap<String, BandConfig> {
    BTreeMap::from([
        ("heart_rate".to_string(), BandConfig { min: 40.0, max: 180.0 }),
        ("oxygen_saturation".to_string(), BandConfig { min: 90.0, max: 100.0 }),
        ("body_temperature".to_string(), BandConfig { min: 35.0, max: 38.5 }),
    ])
}

impl AstraConfig {
    /// Load configuration from a JSON or YAML file (chosen by extension)
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") | None => serde_json::from_str(&content)?,
            Some(other) => {
                return Err(AstraError::Config(format!(
                    "unsupported config format '.{}' (use .json, .yaml or .yml)",
                    other
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given and present, otherwise fall back to defaults
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        match path {
            Some(path) if path.exists() => Self::from_file(path),
            Some(path) => Err(AstraError::Config(format!(
                "config file not found: {}",
                path.display()
            ))),
            None => Ok(Self::default()),
        }
    }

    /// Check internal consistency
    pub fn validate(&self) -> crate::Result<()> {
        for (kind, band) in &self.biometric_limits {
            if band.min > band.max {
                return Err(InvalidBandError {
                    kind: kind.clone(),
                    min: band.min,
                    max: band.max,
                }
                .into());
            }
        }
        Ok(())
    }

    /// `host:port` string for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
