//! Error types for ASTRA startup and configuration

use thiserror::Error;

/// Error thrown when a configured biometric band is unusable
#[derive(Debug, Error)]
#[error("Biometric band for '{kind}' is invalid: min {min} is greater than max {max}")]
pub struct InvalidBandError {
    pub kind: String,
    pub min: f64,
    pub max: f64,
}

/// General ASTRA error type
#[derive(Debug, Error)]
pub enum AstraError {
    #[error(transparent)]
    InvalidBand(#[from] InvalidBandError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, AstraError>;
