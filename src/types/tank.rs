//! Fuel tank model: tank kinds, derived status, and bounded fuel mutation
//!
//! Each tank derives its own `TankStatus` from the fuel percentage through a
//! per-kind threshold policy. Status is recomputed synchronously after every
//! successful fuel mutation and at construction; it is never set by callers.
//!
//! Reserve tanks additionally carry an emergency-mode gate: fuel cannot be
//! withdrawn from a reserve tank unless the gate has been explicitly armed.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

// ============================================================================
// Safety Limits and Thresholds
// ============================================================================

/// Fixed operating limits shared by all tank kinds
pub mod limits {
    /// Fuel grade carried by every tank in this fleet
    pub const FUEL_TYPE_JET_A: &str = "Jet-A";

    /// Pressure at construction (PSI)
    pub const DEFAULT_PRESSURE_PSI: f64 = 45.0;
    /// Temperature at construction (°C)
    pub const DEFAULT_TEMPERATURE_C: f64 = 25.0;
    /// Maximum safe pressure (PSI)
    pub const MAX_PRESSURE_PSI: f64 = 50.0;
    /// Maximum safe temperature (°C)
    pub const MAX_TEMPERATURE_C: f64 = 60.0;
    /// Minimum operating temperature for Jet-A (°C)
    pub const MIN_TEMPERATURE_C: f64 = -50.0;
    /// Setters accept readings up to this multiple of the safe maximum.
    /// Readings between the maximum and this tolerance are stored and left
    /// for the alert monitor to flag.
    pub const SETTER_TOLERANCE: f64 = 1.2;
    /// A tank is considered full at or above this fraction of capacity
    pub const FULL_FRACTION: f64 = 0.99;

    // === Status thresholds (percent of capacity, exclusive boundaries) ===
    /// Main/Auxiliary: NORMAL strictly above this percentage
    pub const MAIN_NORMAL_PCT: f64 = 50.0;
    /// Main/Auxiliary: LOW strictly above this percentage, CRITICAL at or below
    pub const MAIN_LOW_PCT: f64 = 20.0;
    /// Reserve: NORMAL strictly above this percentage
    pub const RESERVE_NORMAL_PCT: f64 = 70.0;
    /// Reserve: LOW strictly above this percentage, CRITICAL at or below
    pub const RESERVE_LOW_PCT: f64 = 30.0;

    // === Critical-fuel planning thresholds (fraction of capacity) ===
    /// Main/Auxiliary critical fuel planning threshold
    pub const MAIN_CRITICAL_FRACTION: f64 = 0.10;
    /// Reserve critical fuel planning threshold
    pub const RESERVE_CRITICAL_FRACTION: f64 = 0.15;

    // === Default capacities (liters) ===
    /// Main tank default capacity
    pub const MAIN_CAPACITY_L: f64 = 5000.0;
    /// Auxiliary tank default capacity
    pub const AUXILIARY_CAPACITY_L: f64 = 3000.0;
    /// Reserve tank default capacity
    pub const RESERVE_CAPACITY_L: f64 = 1000.0;
}

// ============================================================================
// Tank Kind
// ============================================================================

/// Tank variant. Kinds differ in default capacity, status thresholds, and
/// (Reserve only) the emergency-mode withdrawal gate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TankKind {
    Main,
    Auxiliary,
    Reserve,
}

impl TankKind {
    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            TankKind::Main => "Main",
            TankKind::Auxiliary => "Auxiliary",
            TankKind::Reserve => "Reserve",
        }
    }

    /// Get gauge tag for the status line
    pub fn gauge_tag(&self) -> &'static str {
        match self {
            TankKind::Main => "MAIN",
            TankKind::Auxiliary => "AUXILIARY",
            TankKind::Reserve => "RESERVE",
        }
    }

    /// Parse from a configuration key (case-insensitive)
    pub fn from_config_key(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "main" => Some(TankKind::Main),
            "auxiliary" | "aux" => Some(TankKind::Auxiliary),
            "reserve" => Some(TankKind::Reserve),
            _ => None,
        }
    }

    /// Default capacity for this kind (liters)
    pub fn default_capacity(&self) -> f64 {
        match self {
            TankKind::Main => limits::MAIN_CAPACITY_L,
            TankKind::Auxiliary => limits::AUXILIARY_CAPACITY_L,
            TankKind::Reserve => limits::RESERVE_CAPACITY_L,
        }
    }

    /// Status threshold policy for this kind.
    ///
    /// Boundaries are exclusive: a Main tank at exactly 50% is LOW, not
    /// NORMAL. Reserve tanks classify more strictly than Main/Auxiliary
    /// (NORMAL above 70%, CRITICAL at or below 30%).
    pub fn status_for(&self, percentage: f64) -> TankStatus {
        let (normal_above, low_above) = match self {
            TankKind::Main | TankKind::Auxiliary => {
                (limits::MAIN_NORMAL_PCT, limits::MAIN_LOW_PCT)
            }
            TankKind::Reserve => (limits::RESERVE_NORMAL_PCT, limits::RESERVE_LOW_PCT),
        };

        if percentage > normal_above {
            TankStatus::Normal
        } else if percentage > low_above {
            TankStatus::Low
        } else {
            TankStatus::Critical
        }
    }

    /// Fraction of capacity at which the low-fuel warning begins
    pub fn low_fuel_fraction(&self) -> f64 {
        match self {
            TankKind::Main | TankKind::Auxiliary => limits::MAIN_LOW_PCT / 100.0,
            TankKind::Reserve => limits::RESERVE_LOW_PCT / 100.0,
        }
    }

    /// Fraction of capacity used for critical-fuel planning
    pub fn critical_fuel_fraction(&self) -> f64 {
        match self {
            TankKind::Main | TankKind::Auxiliary => limits::MAIN_CRITICAL_FRACTION,
            TankKind::Reserve => limits::RESERVE_CRITICAL_FRACTION,
        }
    }
}

impl std::fmt::Display for TankKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Tank Status
// ============================================================================

/// Derived classification of a tank's fuel level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TankStatus {
    Normal,
    Low,
    Critical,
}

impl TankStatus {
    /// Whether this status should surface on the low-fuel roster
    pub fn needs_attention(&self) -> bool {
        matches!(self, TankStatus::Low | TankStatus::Critical)
    }
}

impl std::fmt::Display for TankStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TankStatus::Normal => write!(f, "NORMAL"),
            TankStatus::Low => write!(f, "LOW"),
            TankStatus::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ============================================================================
// Tank Errors
// ============================================================================

/// Domain rule violations raised by tank mutators.
///
/// These are routine, expected rejections; the tank is left untouched in
/// every case.
#[derive(Debug, Clone, Error)]
pub enum TankError {
    #[error("Fuel amount must be a non-negative number")]
    NegativeAmount,

    #[error("Cannot add {requested:.1}L - only {available:.1}L space available")]
    Overflow { requested: f64, available: f64 },

    #[error("Insufficient fuel - only {available:.1}L available")]
    InsufficientFuel { requested: f64, available: f64 },

    #[error("Cannot access reserve fuel - emergency mode not activated")]
    EmergencyModeRequired,

    #[error("Pressure {0:.1} PSI outside safe operating range")]
    PressureOutOfRange(f64),

    #[error("Temperature {0:.1}°C outside safe operating range")]
    TemperatureOutOfRange(f64),
}

// ============================================================================
// Fuel Tank
// ============================================================================

/// A single fuel tank with bounded mutable state.
///
/// Invariant: `0 <= fuel_level <= capacity` at all times. Construction clamps
/// the initial fill into range; every mutator rejects inputs that would break
/// the bound and leaves state unchanged on failure.
#[derive(Debug, Clone, Serialize)]
pub struct FuelTank {
    tank_id: String,
    name: String,
    kind: TankKind,
    capacity: f64,
    fuel_type: String,
    fuel_level: f64,
    pressure: f64,
    temperature: f64,
    status: TankStatus,
    emergency_mode: bool,
    max_pressure: f64,
    max_temperature: f64,
}

impl FuelTank {
    /// Create a tank. Initial fuel is clamped into `[0, capacity]`; status is
    /// derived immediately from the clamped fill.
    pub fn new(
        kind: TankKind,
        tank_id: impl Into<String>,
        name: impl Into<String>,
        capacity: f64,
        initial_fuel: f64,
    ) -> Self {
        let capacity = capacity.max(0.0);
        let fuel_level = initial_fuel.clamp(0.0, capacity);
        let mut tank = Self {
            tank_id: tank_id.into(),
            name: name.into(),
            kind,
            capacity,
            fuel_type: limits::FUEL_TYPE_JET_A.to_string(),
            fuel_level,
            pressure: limits::DEFAULT_PRESSURE_PSI,
            temperature: limits::DEFAULT_TEMPERATURE_C,
            status: TankStatus::Normal,
            emergency_mode: false,
            max_pressure: limits::MAX_PRESSURE_PSI,
            max_temperature: limits::MAX_TEMPERATURE_C,
        };
        tank.update_status();
        tank
    }

    /// Create a tank with the kind's default capacity
    pub fn with_default_capacity(
        kind: TankKind,
        tank_id: impl Into<String>,
        name: impl Into<String>,
        initial_fuel: f64,
    ) -> Self {
        Self::new(kind, tank_id, name, kind.default_capacity(), initial_fuel)
    }

    // === Read accessors ===

    pub fn tank_id(&self) -> &str {
        &self.tank_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TankKind {
        self.kind
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn fuel_type(&self) -> &str {
        &self.fuel_type
    }

    pub fn fuel_level(&self) -> f64 {
        self.fuel_level
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn status(&self) -> TankStatus {
        self.status
    }

    pub fn max_pressure(&self) -> f64 {
        self.max_pressure
    }

    pub fn max_temperature(&self) -> f64 {
        self.max_temperature
    }

    pub fn is_emergency_mode(&self) -> bool {
        self.emergency_mode
    }

    /// Fuel level as a percentage of capacity (0 when capacity is 0)
    pub fn fuel_percentage(&self) -> f64 {
        if self.capacity == 0.0 {
            return 0.0;
        }
        (self.fuel_level / self.capacity) * 100.0
    }

    /// Remaining space in the tank (liters)
    pub fn available_capacity(&self) -> f64 {
        self.capacity - self.fuel_level
    }

    pub fn is_empty(&self) -> bool {
        self.fuel_level <= 0.0
    }

    /// Full at 99% of capacity or above
    pub fn is_full(&self) -> bool {
        self.fuel_level >= self.capacity * limits::FULL_FRACTION
    }

    /// Fuel level (liters) at which the low-fuel warning begins
    pub fn low_fuel_threshold(&self) -> f64 {
        self.capacity * self.kind.low_fuel_fraction()
    }

    /// Fuel level (liters) used for critical-fuel planning
    pub fn critical_fuel_threshold(&self) -> f64 {
        self.capacity * self.kind.critical_fuel_fraction()
    }

    // === Fuel mutation ===

    /// Add fuel with overflow protection. Recomputes status on success.
    pub fn add_fuel(&mut self, amount: f64) -> Result<(), TankError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(TankError::NegativeAmount);
        }
        if self.fuel_level + amount > self.capacity {
            return Err(TankError::Overflow {
                requested: amount,
                available: self.available_capacity(),
            });
        }
        self.fuel_level += amount;
        self.update_status();
        Ok(())
    }

    /// Remove fuel with validation. Recomputes status on success.
    ///
    /// Reserve tanks refuse withdrawal entirely — before any amount checks —
    /// unless emergency mode has been armed.
    pub fn remove_fuel(&mut self, amount: f64) -> Result<(), TankError> {
        if self.kind == TankKind::Reserve && !self.emergency_mode {
            return Err(TankError::EmergencyModeRequired);
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(TankError::NegativeAmount);
        }
        if self.fuel_level < amount {
            return Err(TankError::InsufficientFuel {
                requested: amount,
                available: self.fuel_level,
            });
        }
        self.fuel_level -= amount;
        self.update_status();
        Ok(())
    }

    // === Sensor-fed readings ===

    /// Store a pressure reading. Rejects negative values and values beyond
    /// 1.2x the safe maximum; readings between the maximum and the tolerance
    /// band are stored (the alert monitor flags them).
    pub fn set_pressure(&mut self, pressure: f64) -> Result<(), TankError> {
        if !(0.0..=self.max_pressure * limits::SETTER_TOLERANCE).contains(&pressure) {
            return Err(TankError::PressureOutOfRange(pressure));
        }
        self.pressure = pressure;
        Ok(())
    }

    /// Store a temperature reading. Rejects values below -50°C and values
    /// beyond 1.2x the safe maximum; the band between maximum and tolerance
    /// is stored (the alert monitor flags it).
    pub fn set_temperature(&mut self, temperature: f64) -> Result<(), TankError> {
        if !(limits::MIN_TEMPERATURE_C..=self.max_temperature * limits::SETTER_TOLERANCE)
            .contains(&temperature)
        {
            return Err(TankError::TemperatureOutOfRange(temperature));
        }
        self.temperature = temperature;
        Ok(())
    }

    // === Emergency mode (Reserve gate) ===

    /// Arm the reserve withdrawal gate. No precondition; only affects
    /// withdrawal on Reserve tanks.
    pub fn activate_emergency_mode(&mut self) {
        self.emergency_mode = true;
        warn!(tank_id = %self.tank_id, name = %self.name, "Emergency mode ACTIVATED");
    }

    /// Disarm the reserve withdrawal gate
    pub fn deactivate_emergency_mode(&mut self) {
        self.emergency_mode = false;
        tracing::info!(tank_id = %self.tank_id, name = %self.name, "Emergency mode deactivated");
    }

    fn update_status(&mut self) {
        self.status = self.kind.status_for(self.fuel_percentage());
    }
}

impl std::fmt::Display for FuelTank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let emergency = if self.emergency_mode {
            " [EMERGENCY MODE]"
        } else {
            ""
        };
        write!(
            f,
            "[{}] {} ({}): {:.1}L / {:.1}L ({:.1}%) - {}{}",
            self.kind.gauge_tag(),
            self.name,
            self.tank_id,
            self.fuel_level,
            self.capacity,
            self.fuel_percentage(),
            self.status,
            emergency
        )
    }
}
