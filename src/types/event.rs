//! Event log entry vocabulary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of logged system event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    SystemInit,
    SystemStart,
    ConfigLoaded,
    TankAdded,
    FuelTransfer,
    FuelLevel,
    StatusChange,
    Alert,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventKind::SystemInit => "SYSTEM_INIT",
            EventKind::SystemStart => "SYSTEM_START",
            EventKind::ConfigLoaded => "CONFIG_LOADED",
            EventKind::TankAdded => "TANK_ADDED",
            EventKind::FuelTransfer => "FUEL_TRANSFER",
            EventKind::FuelLevel => "FUEL_LEVEL",
            EventKind::StatusChange => "STATUS_CHANGE",
            EventKind::Alert => "ALERT",
        };
        write!(f, "{s}")
    }
}

/// Severity of a logged event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogSeverity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogSeverity::Info => write!(f, "INFO"),
            LogSeverity::Warning => write!(f, "WARNING"),
            LogSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// One append-only log record. Never mutated after append.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    /// ISO-8601 timestamp at append time
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "event_type")]
    pub kind: EventKind,
    pub message: String,
    pub tank_id: Option<String>,
    pub severity: LogSeverity,
}
