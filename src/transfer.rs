//! Fuel transfer protocol: validated, atomic two-party moves with rollback
//!
//! One call is one full cycle; no intermediate state persists between calls.
//!
//! 1. **Validate** — pure, mutates nothing. Resolves both tanks and checks
//!    endpoint distinctness, amount sanity, source fuel, destination space,
//!    and the reserve emergency gate. Every rejection is a distinct error.
//! 2. **Execute** — withdraw from the source, then credit the destination.
//!    The two mutations are not transactional, so a credit failure after a
//!    successful withdrawal is compensated by re-crediting the source before
//!    the error is reported.
//! 3. **Log** — every outcome, success or failure, is appended to the event
//!    log with source, destination, amount, and the success flag.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::event_log::EventLog;
use crate::system::FuelSystem;
use crate::types::{TankError, TankKind};

/// Hard ceiling on a single transfer, regardless of tank sizes (liters)
pub const DEFAULT_TRANSFER_LIMIT_L: f64 = 10_000.0;

// ============================================================================
// Errors
// ============================================================================

/// Transfer rejection and failure conditions.
///
/// Validation rejections are routine; `SourceWithdrawalFailed` and
/// `RolledBack` report the defensive execute-phase checks. Message text is
/// stable enough for callers to match on.
#[derive(Debug, Clone, Error)]
pub enum TransferError {
    #[error("Source tank {0} not found")]
    SourceNotFound(String),

    #[error("Destination tank {0} not found")]
    DestinationNotFound(String),

    #[error("Source and destination must be different")]
    SameTank,

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Amount exceeds maximum transfer limit ({0:.1}L)")]
    ExceedsTransferLimit(f64),

    #[error("Insufficient fuel in source (available: {available:.1}L)")]
    InsufficientFuel { available: f64 },

    #[error("Insufficient capacity in destination (available: {available:.1}L)")]
    InsufficientCapacity { available: f64 },

    #[error("Reserve tank requires emergency mode activation")]
    EmergencyModeRequired,

    #[error("Failed to remove fuel from source: {0}")]
    SourceWithdrawalFailed(TankError),

    #[error("Failed to add fuel to destination (rolled back): {0}")]
    RolledBack(TankError),
}

/// Record of a completed transfer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransferReceipt {
    pub source_id: String,
    pub dest_id: String,
    pub amount: f64,
}

impl std::fmt::Display for TransferReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Successfully transferred {:.1}L from {} to {}",
            self.amount, self.source_id, self.dest_id
        )
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Executes validated fuel moves between registered tanks
#[derive(Debug, Clone)]
pub struct TransferController {
    max_transfer_liters: f64,
}

impl Default for TransferController {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSFER_LIMIT_L)
    }
}

impl TransferController {
    pub fn new(max_transfer_liters: f64) -> Self {
        Self {
            max_transfer_liters,
        }
    }

    pub fn max_transfer_liters(&self) -> f64 {
        self.max_transfer_liters
    }

    /// Side-effect-free pre-check. Never changes any tank's state.
    pub fn validate(
        &self,
        system: &FuelSystem,
        source_id: &str,
        dest_id: &str,
        amount: f64,
    ) -> Result<(), TransferError> {
        let source = system
            .tank(source_id)
            .ok_or_else(|| TransferError::SourceNotFound(source_id.to_string()))?;
        let dest = system
            .tank(dest_id)
            .ok_or_else(|| TransferError::DestinationNotFound(dest_id.to_string()))?;

        if source_id == dest_id {
            return Err(TransferError::SameTank);
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(TransferError::InvalidAmount);
        }
        if amount > self.max_transfer_liters {
            return Err(TransferError::ExceedsTransferLimit(self.max_transfer_liters));
        }
        if source.fuel_level() < amount {
            return Err(TransferError::InsufficientFuel {
                available: source.fuel_level(),
            });
        }
        if dest.available_capacity() < amount {
            return Err(TransferError::InsufficientCapacity {
                available: dest.available_capacity(),
            });
        }
        if source.kind() == TankKind::Reserve && !source.is_emergency_mode() {
            return Err(TransferError::EmergencyModeRequired);
        }

        Ok(())
    }

    /// Execute a transfer. Validates first; on success both tanks are
    /// mutated and a receipt is returned. Every outcome is logged.
    pub fn execute(
        &self,
        system: &mut FuelSystem,
        log: &mut EventLog,
        source_id: &str,
        dest_id: &str,
        amount: f64,
    ) -> Result<TransferReceipt, TransferError> {
        if let Err(e) = self.validate(system, source_id, dest_id, amount) {
            log.log_transfer(source_id, dest_id, amount, false);
            return Err(e);
        }

        match Self::apply(system, source_id, dest_id, amount) {
            Ok(receipt) => {
                log.log_transfer(source_id, dest_id, amount, true);
                debug!(source = %source_id, dest = %dest_id, amount, "Transfer complete");
                Ok(receipt)
            }
            Err(e) => {
                log.log_transfer(source_id, dest_id, amount, false);
                Err(e)
            }
        }
    }

    /// Post-validation mutation phase: withdraw, credit, compensate.
    ///
    /// Validation makes the failure arms unreachable in a single-threaded
    /// call, except when the reserve gate is disarmed between validate and
    /// apply; the checks remain as the protocol's defensive layer.
    fn apply(
        system: &mut FuelSystem,
        source_id: &str,
        dest_id: &str,
        amount: f64,
    ) -> Result<TransferReceipt, TransferError> {
        {
            let source = system
                .tank_mut(source_id)
                .ok_or_else(|| TransferError::SourceNotFound(source_id.to_string()))?;
            source
                .remove_fuel(amount)
                .map_err(TransferError::SourceWithdrawalFailed)?;
        }

        let credit = system.tank_mut(dest_id).map(|dest| dest.add_fuel(amount));
        match credit {
            Some(Ok(())) => Ok(TransferReceipt {
                source_id: source_id.to_string(),
                dest_id: dest_id.to_string(),
                amount,
            }),
            Some(Err(cause)) => {
                Self::compensate(system, source_id, amount);
                Err(TransferError::RolledBack(cause))
            }
            None => {
                Self::compensate(system, source_id, amount);
                Err(TransferError::DestinationNotFound(dest_id.to_string()))
            }
        }
    }

    /// Restore the source's pre-transfer level after a failed credit.
    /// Re-crediting the exact withdrawn amount cannot overflow the source.
    fn compensate(system: &mut FuelSystem, source_id: &str, amount: f64) {
        match system.tank_mut(source_id) {
            Some(source) => {
                if let Err(e) = source.add_fuel(amount) {
                    error!(
                        source = %source_id,
                        amount,
                        error = %e,
                        "Rollback failed to restore source tank"
                    );
                }
            }
            None => error!(source = %source_id, "Rollback target disappeared"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FuelTank;

    fn demo_system() -> FuelSystem {
        let mut system = FuelSystem::new();
        system.add_tank(FuelTank::new(TankKind::Main, "SRC", "Source", 5000.0, 4000.0));
        system.add_tank(FuelTank::new(TankKind::Auxiliary, "DST", "Dest", 3000.0, 1000.0));
        system.add_tank(FuelTank::new(TankKind::Reserve, "RES", "Reserve", 1000.0, 1000.0));
        system
    }

    #[test]
    fn test_validate_accepts_good_transfer() {
        let system = demo_system();
        let controller = TransferController::default();
        assert!(controller.validate(&system, "SRC", "DST", 500.0).is_ok());
    }

    #[test]
    fn test_validate_unknown_tanks() {
        let system = demo_system();
        let controller = TransferController::default();
        let err = controller.validate(&system, "NOPE", "DST", 10.0).unwrap_err();
        assert!(err.to_string().contains("not found"));
        let err = controller.validate(&system, "SRC", "NOPE", 10.0).unwrap_err();
        assert!(matches!(err, TransferError::DestinationNotFound(_)));
    }

    #[test]
    fn test_validate_same_tank() {
        let system = demo_system();
        let controller = TransferController::default();
        let err = controller.validate(&system, "SRC", "SRC", 10.0).unwrap_err();
        assert!(err.to_string().to_lowercase().contains("different"));
    }

    #[test]
    fn test_validate_non_positive_amount() {
        let system = demo_system();
        let controller = TransferController::default();
        for bad in [0.0, -5.0, f64::NAN] {
            let err = controller.validate(&system, "SRC", "DST", bad).unwrap_err();
            assert!(err.to_string().to_lowercase().contains("positive"));
        }
    }

    #[test]
    fn test_validate_transfer_limit() {
        let mut system = demo_system();
        system.add_tank(FuelTank::new(TankKind::Main, "BIG", "Big", 40000.0, 30000.0));
        system.add_tank(FuelTank::new(TankKind::Main, "BIG2", "Big 2", 40000.0, 0.0));
        let controller = TransferController::default();
        let err = controller
            .validate(&system, "BIG", "BIG2", 15000.0)
            .unwrap_err();
        assert!(err.to_string().contains("maximum transfer limit"));
    }

    #[test]
    fn test_validate_insufficient_fuel() {
        let system = demo_system();
        let controller = TransferController::default();
        let err = controller.validate(&system, "SRC", "DST", 4500.0).unwrap_err();
        assert!(err.to_string().to_lowercase().contains("insufficient fuel"));
    }

    #[test]
    fn test_validate_insufficient_capacity() {
        let system = demo_system();
        let controller = TransferController::default();
        // DST has 2000L of space; 2500 exceeds it (and SRC holds it)
        let err = controller.validate(&system, "SRC", "DST", 2500.0).unwrap_err();
        assert!(err
            .to_string()
            .to_lowercase()
            .contains("insufficient capacity"));
    }

    #[test]
    fn test_validate_reserve_gate() {
        let mut system = demo_system();
        let controller = TransferController::default();
        let err = controller.validate(&system, "RES", "DST", 100.0).unwrap_err();
        assert!(err.to_string().to_lowercase().contains("emergency"));

        system.tank_mut("RES").unwrap().activate_emergency_mode();
        assert!(controller.validate(&system, "RES", "DST", 100.0).is_ok());
    }

    #[test]
    fn test_validate_never_mutates() {
        let system = demo_system();
        let controller = TransferController::default();
        let before: Vec<f64> = system.tanks().map(FuelTank::fuel_level).collect();

        let _ = controller.validate(&system, "SRC", "DST", 500.0);
        let _ = controller.validate(&system, "SRC", "DST", 99999.0);
        let _ = controller.validate(&system, "RES", "DST", 100.0);

        let after: Vec<f64> = system.tanks().map(FuelTank::fuel_level).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_execute_moves_fuel_and_conserves_total() {
        let mut system = demo_system();
        let mut log = EventLog::new("unused.json");
        let controller = TransferController::default();
        let total_before = system.total_fuel();

        let receipt = controller
            .execute(&mut system, &mut log, "SRC", "DST", 500.0)
            .unwrap();
        assert_eq!(receipt.amount, 500.0);
        assert_eq!(system.tank("SRC").unwrap().fuel_level(), 3500.0);
        assert_eq!(system.tank("DST").unwrap().fuel_level(), 1500.0);
        assert_eq!(system.total_fuel(), total_before);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_execute_validation_failure_logs_and_leaves_state() {
        let mut system = demo_system();
        let mut log = EventLog::new("unused.json");
        let controller = TransferController::default();

        let err = controller
            .execute(&mut system, &mut log, "SRC", "DST", 5000.0)
            .unwrap_err();
        assert!(err.to_string().to_lowercase().contains("insufficient fuel"));
        assert_eq!(system.tank("SRC").unwrap().fuel_level(), 4000.0);
        assert_eq!(system.tank("DST").unwrap().fuel_level(), 1000.0);
        // Failed attempts are logged too
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_rollback_restores_source_on_credit_failure() {
        let mut system = demo_system();
        // Fill DST after the point validation would have checked it, so the
        // credit arm of apply() fails and compensation has to run.
        system.tank_mut("DST").unwrap().add_fuel(2000.0).unwrap();

        let err = TransferController::apply(&mut system, "SRC", "DST", 500.0).unwrap_err();
        assert!(err.to_string().contains("rolled back"));
        assert_eq!(system.tank("SRC").unwrap().fuel_level(), 4000.0);
        assert_eq!(system.tank("DST").unwrap().fuel_level(), 3000.0);
    }

    #[test]
    fn test_apply_reserve_gate_is_defensive_backstop() {
        // Gate disarmed after validation would have passed: apply still fails
        // without touching fuel.
        let mut system = demo_system();
        let err = TransferController::apply(&mut system, "RES", "DST", 100.0).unwrap_err();
        assert!(matches!(err, TransferError::SourceWithdrawalFailed(_)));
        assert_eq!(system.tank("RES").unwrap().fuel_level(), 1000.0);
        assert_eq!(system.tank("DST").unwrap().fuel_level(), 1000.0);
    }

    #[test]
    fn test_receipt_display() {
        let receipt = TransferReceipt {
            source_id: "SRC".into(),
            dest_id: "DST".into(),
            amount: 500.0,
        };
        assert_eq!(
            receipt.to_string(),
            "Successfully transferred 500.0L from SRC to DST"
        );
    }
}
