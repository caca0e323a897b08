//! AFMS: Aircraft Fuel Management Simulation
//!
//! Models a fleet of typed fuel tanks with a validated transfer protocol and
//! an alert layer over abnormal readings.
//!
//! ## Architecture
//!
//! - **Tank model**: per-kind status thresholds, bounded fuel mutation, and
//!   the reserve emergency-mode withdrawal gate
//! - **Fuel system**: in-memory registry with aggregate fuel projections
//! - **Transfer protocol**: validate → execute → compensate-on-failure, every
//!   outcome logged
//! - **Alert monitor**: on-demand scan deriving fuel/pressure/temperature
//!   excursion records
//! - **Event log**: append-only record of transfers and alerts with
//!   best-effort JSON persistence
//!
//! The core is single-threaded and synchronous; the binary drives it from a
//! periodic refresh loop.

pub mod alerts;
pub mod config;
pub mod coordinator;
pub mod event_log;
pub mod sensors;
pub mod system;
pub mod transfer;
pub mod types;

// Re-export the configuration entry point
pub use config::FleetConfig;

// Re-export commonly used types
pub use types::{
    Alert, AlertKind, AlertSeverity, EventKind, FuelTank, LogEntry, LogSeverity, TankError,
    TankKind, TankStatus,
};

// Re-export the operational surface
pub use alerts::AlertMonitor;
pub use coordinator::{Coordinator, StatusReport};
pub use event_log::{EventLog, LogError};
pub use sensors::{FuelSensor, SensorKind};
pub use system::FuelSystem;
pub use transfer::{TransferController, TransferError, TransferReceipt};
