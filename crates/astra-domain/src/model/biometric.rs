//! Biometric readings and the bands that decide whether they are critical
//!
//! BiometricReading is a Value Object and is immutable once created.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// A single vital-sign measurement taken from an astronaut
#[derive(Debug, Clone, PartialEq)]
pub struct BiometricReading {
    /// What was measured (heart_rate, oxygen_saturation, ...)
    kind: String,
    /// Measured value
    value: f64,
    /// Unit of `value`
    unit: String,
    /// When the measurement was taken
    recorded_at: DateTime<Utc>,
}

impl BiometricReading {
    pub fn new(
        kind: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: kind.into(),
            value,
            unit: unit.into(),
            recorded_at,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// True when the value falls outside `band`
    pub fn is_critical(&self, band: &BiometricBand) -> bool {
        !band.contains(self.value)
    }
}

/// Inclusive range of acceptable values for one kind of reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiometricBand {
    pub min: f64,
    pub max: f64,
}

impl BiometricBand {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Configured bands, keyed by reading kind
#[derive(Debug, Clone, Default)]
pub struct BiometricLimits {
    bands: HashMap<String, BiometricBand>,
}

impl BiometricLimits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: register a band for a kind
    pub fn with_band(mut self, kind: impl Into<String>, band: BiometricBand) -> Self {
        self.bands.insert(kind.into(), band);
        self
    }

    pub fn band_for(&self, kind: &str) -> Option<&BiometricBand> {
        self.bands.get(kind)
    }

    /// A reading is critical only if a band exists for its kind and the
    /// value is outside it.
    pub fn is_critical(&self, reading: &BiometricReading) -> bool {
        self.band_for(reading.kind())
            .is_some_and(|band| reading.is_critical(band))
    }

    /// Filter `readings` down to the critical ones
    pub fn critical<'a>(&self, readings: &'a [BiometricReading]) -> Vec<&'a BiometricReading> {
        readings.iter().filter(|r| self.is_critical(r)).collect()
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}
