//! Warning/danger classification for air-quality sensors.
use crate::sensors::{Reading, SensorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Severity {
    #[default]
    Normal,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub warning: f64,
    pub danger: f64,
}

impl Thresholds {
    pub const fn new(warning: f64, danger: f64) -> Thresholds {
        Thresholds {
            warning,
            danger,
        }
    }

    /// Bounds are inclusive: a value equal to a bound takes the higher level.
    pub fn classify(&self, value: f64) -> Severity {
        if value >= self.danger {
            Severity::Danger
        } else if value >= self.warning {
            Severity::Warning
        } else {
            Severity::Normal
        }
    }
}

/// Static per-sensor bounds. Kinds without an entry are never escalated.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdConfig {
    co2: Thresholds,
    co: Thresholds,
    pm25: Thresholds,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        ThresholdConfig {
            // ppm
            co2: Thresholds::new(1000.0, 2000.0),
            // ppm
            co: Thresholds::new(10.0, 35.0),
            // µg/m³
            pm25: Thresholds::new(12.0, 35.0),
        }
    }
}

impl ThresholdConfig {
    pub fn get(&self, kind: SensorKind) -> Option<Thresholds> {
        match kind {
            SensorKind::Co2 => Some(self.co2),
            SensorKind::Co => Some(self.co),
            SensorKind::Pm25 => Some(self.pm25),
            _ => None,
        }
    }

    pub fn evaluate(&self, kind: SensorKind, reading: &Reading) -> Severity {
        match (self.get(kind), reading.as_number()) {
            (Some(thresholds), Some(value)) => thresholds.classify(value),
            _ => Severity::Normal,
        }
    }
}
