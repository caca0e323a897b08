//! Core domain types for the fuel management simulation

mod alert;
mod event;
mod tank;

pub use alert::{Alert, AlertKind, AlertSeverity};
pub use event::{EventKind, LogEntry, LogSeverity};
pub use tank::{limits, FuelTank, TankError, TankKind, TankStatus};
