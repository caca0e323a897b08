//! Alert records produced by the alert monitor's scan pass

use serde::{Deserialize, Serialize};

/// Alert severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Warning => write!(f, "WARNING"),
            AlertSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Which reading the alert concerns
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    FuelLevel,
    Pressure,
    Temperature,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::FuelLevel => write!(f, "FUEL_LEVEL"),
            AlertKind::Pressure => write!(f, "PRESSURE"),
            AlertKind::Temperature => write!(f, "TEMPERATURE"),
        }
    }
}

/// A transient excursion record for one tank reading.
///
/// Alerts are rebuilt wholesale on every scan; they carry no identity or
/// acknowledgment state across scans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub tank_id: String,
    pub tank_name: String,
    pub severity: AlertSeverity,
    pub kind: AlertKind,
    pub message: String,
    /// The measured value at scan time (liters, PSI, or °C per `kind`)
    pub value: f64,
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.severity, self.tank_name, self.kind, self.message
        )
    }
}
