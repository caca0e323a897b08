//! Integration facade: wires the registry, transfer protocol, alert monitor,
//! and event log behind one surface for the UI layer and tests

use serde::Serialize;

use crate::alerts::AlertMonitor;
use crate::event_log::{EventLog, LogError};
use crate::system::FuelSystem;
use crate::transfer::{TransferController, TransferError, TransferReceipt};
use crate::types::{Alert, EventKind, FuelTank, LogSeverity};

/// Aggregate snapshot for display surfaces
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub total_fuel: f64,
    pub total_capacity: f64,
    pub fuel_percentage: f64,
    pub tank_count: usize,
    pub alert_count: usize,
    pub critical_alerts: usize,
    pub low_fuel_tanks: usize,
}

/// Owns all collaborators and keeps their interactions in one place:
/// transfers re-scan alerts on success, tank registration is logged, and the
/// status report always reflects a fresh alert scan.
#[derive(Debug)]
pub struct Coordinator {
    system: FuelSystem,
    controller: TransferController,
    monitor: AlertMonitor,
    log: EventLog,
}

impl Coordinator {
    pub fn new(system: FuelSystem, controller: TransferController, log: EventLog) -> Self {
        let mut coordinator = Self {
            system,
            controller,
            monitor: AlertMonitor::new(),
            log,
        };
        coordinator.log.log_event(
            EventKind::SystemInit,
            "Integrated system initialized",
            None,
            LogSeverity::Info,
        );
        coordinator
    }

    pub fn system(&self) -> &FuelSystem {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut FuelSystem {
        &mut self.system
    }

    pub fn monitor(&self) -> &AlertMonitor {
        &self.monitor
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut EventLog {
        &mut self.log
    }

    /// Register a tank and log the registration
    pub fn add_tank(&mut self, tank: FuelTank) {
        let message = format!("Tank {} added to system", tank.tank_id());
        let tank_id = tank.tank_id().to_string();
        self.system.add_tank(tank);
        self.log
            .log_event(EventKind::TankAdded, message, Some(&tank_id), LogSeverity::Info);
    }

    /// Execute a transfer; on success the alert list is refreshed so the
    /// display sees post-transfer state immediately.
    pub fn transfer_fuel(
        &mut self,
        source_id: &str,
        dest_id: &str,
        amount: f64,
    ) -> Result<TransferReceipt, TransferError> {
        let result = self
            .controller
            .execute(&mut self.system, &mut self.log, source_id, dest_id, amount);
        if result.is_ok() {
            self.monitor.scan(&self.system, &mut self.log);
        }
        result
    }

    /// Side-effect-free transfer pre-check
    pub fn validate_transfer(
        &self,
        source_id: &str,
        dest_id: &str,
        amount: f64,
    ) -> Result<(), TransferError> {
        self.controller.validate(&self.system, source_id, dest_id, amount)
    }

    /// Run an alert scan over all tanks
    pub fn scan_alerts(&mut self) -> &[Alert] {
        self.monitor.scan(&self.system, &mut self.log)
    }

    /// Fresh aggregate snapshot (runs an alert scan first)
    pub fn status_report(&mut self) -> StatusReport {
        self.monitor.scan(&self.system, &mut self.log);
        StatusReport {
            total_fuel: self.system.total_fuel(),
            total_capacity: self.system.total_capacity(),
            fuel_percentage: self.system.system_fuel_percentage(),
            tank_count: self.system.len(),
            alert_count: self.monitor.alert_count(),
            critical_alerts: self.monitor.critical_alerts().len(),
            low_fuel_tanks: self.system.low_fuel_tanks().len(),
        }
    }

    /// Flush the event log to disk (best-effort; callers may ignore failure)
    pub fn save_logs(&self) -> Result<(), LogError> {
        self.log.save_to_file()
    }
}
