//! Append-only event log with best-effort JSON persistence
//!
//! The core reports every transfer outcome and every alert here. Entries are
//! held in memory and can be flushed to a pretty-printed JSON file on demand;
//! persistence failures are surfaced as error values, never as faults, since
//! the log is a best-effort collaborator. Each append is mirrored to the
//! `tracing` subscriber at the matching level.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::types::{EventKind, LogEntry, LogSeverity};

/// Default log file location, mirroring the data layout of the desktop app
pub const DEFAULT_LOG_PATH: &str = "data/logs/system_log.json";

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Log serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Append-only sequence of system events
#[derive(Debug)]
pub struct EventLog {
    path: PathBuf,
    entries: Vec<LogEntry>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_PATH)
    }
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a system event
    pub fn log_event(
        &mut self,
        kind: EventKind,
        message: impl Into<String>,
        tank_id: Option<&str>,
        severity: LogSeverity,
    ) {
        let message = message.into();
        match severity {
            LogSeverity::Info => info!(event = %kind, tank_id = ?tank_id, "{message}"),
            LogSeverity::Warning => warn!(event = %kind, tank_id = ?tank_id, "{message}"),
            LogSeverity::Critical => error!(event = %kind, tank_id = ?tank_id, "{message}"),
        }
        self.entries.push(LogEntry {
            timestamp: Utc::now(),
            kind,
            message,
            tank_id: tank_id.map(str::to_string),
            severity,
        });
    }

    /// Record a fuel transfer outcome (both successes and failed attempts)
    pub fn log_transfer(&mut self, source_id: &str, dest_id: &str, amount: f64, success: bool) {
        let status = if success { "SUCCESS" } else { "FAILED" };
        let severity = if success {
            LogSeverity::Info
        } else {
            LogSeverity::Warning
        };
        let message = format!("Transfer {amount:.1}L from {source_id} to {dest_id} - {status}");
        self.log_event(EventKind::FuelTransfer, message, Some(source_id), severity);
    }

    /// Record an alert raised by the monitor
    pub fn log_alert(&mut self, tank_id: &str, alert_message: &str) {
        self.log_event(
            EventKind::Alert,
            alert_message,
            Some(tank_id),
            LogSeverity::Warning,
        );
    }

    /// Record a periodic fuel level reading
    pub fn log_fuel_level(&mut self, tank_id: &str, fuel_level: f64, capacity: f64, pct: f64) {
        let message = format!("Fuel level: {fuel_level:.1}L / {capacity:.1}L ({pct:.1}%)");
        self.log_event(EventKind::FuelLevel, message, Some(tank_id), LogSeverity::Info);
    }

    // === Queries ===

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn entries_by_severity(&self, severity: LogSeverity) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.severity == severity)
            .collect()
    }

    pub fn entries_for_tank(&self, tank_id: &str) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.tank_id.as_deref() == Some(tank_id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // === Persistence (best-effort) ===

    /// Write all entries to the log file as pretty-printed JSON.
    ///
    /// Creates the parent directory if needed. Callers treat failure as
    /// non-fatal.
    pub fn save_to_file(&self) -> Result<(), LogError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        info!(path = %self.path.display(), count = self.entries.len(), "Event log saved");
        Ok(())
    }

    /// Replace in-memory entries with the contents of the log file.
    /// Returns the number of entries loaded.
    pub fn load_from_file(&mut self) -> Result<usize, LogError> {
        let contents = fs::read_to_string(&self.path)?;
        self.entries = serde_json::from_str(&contents)?;
        info!(path = %self.path.display(), count = self.entries.len(), "Event log loaded");
        Ok(self.entries.len())
    }
}
