//! Fleet configuration: tank roster and system settings from TOML
//!
//! ## Loading Order
//!
//! 1. `AFMS_CONFIG` environment variable (path to TOML file)
//! 2. `fuel_config.toml` in the current working directory
//! 3. Built-in default roster (two main, one auxiliary, one reserve tank)
//!
//! Tank descriptors with an unrecognized `kind` are skipped during roster
//! construction; a warning is traced for each.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::system::FuelSystem;
use crate::transfer::DEFAULT_TRANSFER_LIMIT_L;
use crate::types::{limits, FuelTank, TankKind};

/// Config file picked up from the working directory when `AFMS_CONFIG` is unset
pub const LOCAL_CONFIG_FILE: &str = "fuel_config.toml";

/// Roster validation ceiling for a single tank (liters)
pub const MAX_TANK_CAPACITY_L: f64 = 50_000.0;
/// Roster validation ceiling for tank id length
pub const MAX_TANK_ID_LEN: usize = 50;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({0}): {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({0}): {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Config Shape
// ============================================================================

/// System-wide settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSettings {
    /// Display name for the fleet
    #[serde(default = "default_fleet_name")]
    pub name: String,

    /// Where the event log is persisted
    #[serde(default = "default_log_path")]
    pub log_path: String,

    /// Hard ceiling on a single transfer (liters)
    #[serde(default = "default_transfer_limit")]
    pub max_transfer_liters: f64,
}

fn default_fleet_name() -> String {
    "Demo Fleet".to_string()
}

fn default_log_path() -> String {
    crate::event_log::DEFAULT_LOG_PATH.to_string()
}

fn default_transfer_limit() -> f64 {
    DEFAULT_TRANSFER_LIMIT_L
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            name: default_fleet_name(),
            log_path: default_log_path(),
            max_transfer_liters: default_transfer_limit(),
        }
    }
}

/// One tank descriptor from the roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankSpec {
    /// Tank kind key: `main`, `auxiliary`, or `reserve`.
    /// Unknown values are skipped at roster construction.
    pub kind: String,
    pub tank_id: String,
    pub name: String,
    pub capacity: f64,
    #[serde(default)]
    pub initial_fuel: f64,
}

/// Root configuration for one simulated fleet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetConfig {
    #[serde(default)]
    pub system: SystemSettings,

    #[serde(default)]
    pub tanks: Vec<TankSpec>,
}

impl FleetConfig {
    /// Load configuration using the standard search order:
    /// 1. `$AFMS_CONFIG` environment variable
    /// 2. `./fuel_config.toml`
    /// 3. Built-in default roster
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("AFMS_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), fleet = %config.system.name, "Loaded fleet config from AFMS_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from AFMS_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "AFMS_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(fleet = %config.system.name, "Loaded fleet config from ./fuel_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./fuel_config.toml, using defaults");
                }
            }
        }

        info!("No fuel_config.toml found — using built-in default roster");
        Self::default_roster()
    }

    /// Load and validate a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// The built-in roster used when no config file is present: two main
    /// wing tanks, a center auxiliary, and an emergency reserve.
    pub fn default_roster() -> Self {
        let tank = |kind: &str, id: &str, name: &str, capacity: f64, fuel: f64| TankSpec {
            kind: kind.to_string(),
            tank_id: id.to_string(),
            name: name.to_string(),
            capacity,
            initial_fuel: fuel,
        };
        Self {
            system: SystemSettings::default(),
            tanks: vec![
                tank("main", "LEFT_MAIN", "Left Wing Main Tank", limits::MAIN_CAPACITY_L, 4000.0),
                tank("main", "RIGHT_MAIN", "Right Wing Main Tank", limits::MAIN_CAPACITY_L, 3500.0),
                tank(
                    "auxiliary",
                    "CENTER_AUX",
                    "Center Auxiliary Tank",
                    limits::AUXILIARY_CAPACITY_L,
                    1800.0,
                ),
                tank(
                    "reserve",
                    "RESERVE",
                    "Emergency Reserve Tank",
                    limits::RESERVE_CAPACITY_L,
                    1000.0,
                ),
            ],
        }
    }

    /// Validate roster and settings, collecting every violation before
    /// reporting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.system.max_transfer_liters <= 0.0 {
            errors.push("system.max_transfer_liters must be positive".to_string());
        }

        for spec in &self.tanks {
            if spec.tank_id.is_empty() {
                errors.push("tank_id cannot be empty".to_string());
            } else if spec.tank_id.len() > MAX_TANK_ID_LEN {
                errors.push(format!(
                    "tank_id '{}' too long (max {MAX_TANK_ID_LEN} characters)",
                    spec.tank_id
                ));
            }
            if spec.capacity <= 0.0 {
                errors.push(format!(
                    "tank '{}': capacity must be positive",
                    spec.tank_id
                ));
            } else if spec.capacity > MAX_TANK_CAPACITY_L {
                errors.push(format!(
                    "tank '{}': capacity exceeds maximum ({MAX_TANK_CAPACITY_L:.0}L)",
                    spec.tank_id
                ));
            }
            if spec.initial_fuel < 0.0 {
                errors.push(format!(
                    "tank '{}': initial_fuel cannot be negative",
                    spec.tank_id
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Construct the tank registry from the roster. Descriptors with an
    /// unknown kind are skipped.
    pub fn build_system(&self) -> FuelSystem {
        let mut system = FuelSystem::new();
        for spec in &self.tanks {
            let Some(kind) = TankKind::from_config_key(&spec.kind) else {
                warn!(tank_id = %spec.tank_id, kind = %spec.kind, "Skipping tank with unknown kind");
                continue;
            };
            system.add_tank(FuelTank::new(
                kind,
                spec.tank_id.clone(),
                spec.name.clone(),
                spec.capacity,
                spec.initial_fuel,
            ));
        }
        system
    }
}
