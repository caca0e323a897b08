//! Alert monitor: stateless scan over the registry for abnormal readings
//!
//! Each `scan` rebuilds the active alert list wholesale — there is no
//! acknowledgment, deduplication, or history across scans. A single tank can
//! contribute up to three alerts per scan: one fuel-level (statuses are
//! mutually exclusive), one pressure, one temperature. Every alert emitted is
//! also appended to the event log.

use crate::event_log::EventLog;
use crate::system::FuelSystem;
use crate::types::{Alert, AlertKind, AlertSeverity, TankStatus};

/// Derives transient alerts from current tank state
#[derive(Debug, Default)]
pub struct AlertMonitor {
    active: Vec<Alert>,
}

impl AlertMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan all tanks and replace the active alert list.
    ///
    /// O(n) over the registry, invoked on demand by the refresh cadence or
    /// after a successful transfer.
    pub fn scan(&mut self, system: &FuelSystem, log: &mut EventLog) -> &[Alert] {
        self.active.clear();

        for tank in system.tanks() {
            let percentage = tank.fuel_percentage();
            match tank.status() {
                TankStatus::Critical => self.active.push(Alert {
                    tank_id: tank.tank_id().to_string(),
                    tank_name: tank.name().to_string(),
                    severity: AlertSeverity::Critical,
                    kind: AlertKind::FuelLevel,
                    message: format!("CRITICAL fuel level: {percentage:.1}%"),
                    value: tank.fuel_level(),
                }),
                TankStatus::Low => self.active.push(Alert {
                    tank_id: tank.tank_id().to_string(),
                    tank_name: tank.name().to_string(),
                    severity: AlertSeverity::Warning,
                    kind: AlertKind::FuelLevel,
                    message: format!("Low fuel level: {percentage:.1}%"),
                    value: tank.fuel_level(),
                }),
                TankStatus::Normal => {}
            }

            // Pressure and temperature alert on the unscaled maximum, not the
            // setter's 1.2x tolerance band: accepted-but-dangerous readings
            // still surface here.
            if tank.pressure() > tank.max_pressure() {
                self.active.push(Alert {
                    tank_id: tank.tank_id().to_string(),
                    tank_name: tank.name().to_string(),
                    severity: AlertSeverity::Warning,
                    kind: AlertKind::Pressure,
                    message: format!(
                        "Pressure above limit: {:.1} PSI (max: {:.1})",
                        tank.pressure(),
                        tank.max_pressure()
                    ),
                    value: tank.pressure(),
                });
            }

            if tank.temperature() > tank.max_temperature() {
                self.active.push(Alert {
                    tank_id: tank.tank_id().to_string(),
                    tank_name: tank.name().to_string(),
                    severity: AlertSeverity::Warning,
                    kind: AlertKind::Temperature,
                    message: format!(
                        "Temperature above limit: {:.1}°C (max: {:.1})",
                        tank.temperature(),
                        tank.max_temperature()
                    ),
                    value: tank.temperature(),
                });
            }
        }

        for alert in &self.active {
            log.log_alert(&alert.tank_id, &alert.message);
        }

        &self.active
    }

    // === Accessors over the latest scan ===

    pub fn active_alerts(&self) -> &[Alert] {
        &self.active
    }

    pub fn critical_alerts(&self) -> Vec<&Alert> {
        self.active
            .iter()
            .filter(|a| a.severity == AlertSeverity::Critical)
            .collect()
    }

    pub fn warning_alerts(&self) -> Vec<&Alert> {
        self.active
            .iter()
            .filter(|a| a.severity == AlertSeverity::Warning)
            .collect()
    }

    pub fn alerts_for_tank(&self, tank_id: &str) -> Vec<&Alert> {
        self.active.iter().filter(|a| a.tank_id == tank_id).collect()
    }

    pub fn alerts_by_kind(&self, kind: AlertKind) -> Vec<&Alert> {
        self.active.iter().filter(|a| a.kind == kind).collect()
    }

    pub fn has_critical_alerts(&self) -> bool {
        self.active
            .iter()
            .any(|a| a.severity == AlertSeverity::Critical)
    }

    pub fn alert_count(&self) -> usize {
        self.active.len()
    }

    /// Drop all active alerts without scanning
    pub fn clear_alerts(&mut self) {
        self.active.clear();
    }
}
