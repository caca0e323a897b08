//! AFMS - Aircraft Fuel Management Simulation
//!
//! Drives the fuel management core from a periodic refresh loop: sensor
//! readings are jittered each tick, fed through the validated tank setters,
//! and an alert scan runs over the whole roster. A short scripted transfer
//! demo exercises the protocol surface before the loop starts.
//!
//! # Usage
//!
//! ```bash
//! # Run with the built-in roster until Ctrl-C
//! cargo run --release
//!
//! # Run a bounded simulation with a custom roster
//! AFMS_CONFIG=fleet.toml cargo run --release -- --ticks 30
//! ```
//!
//! # Environment Variables
//!
//! - `AFMS_CONFIG`: Path to a fleet TOML file (default: ./fuel_config.toml)
//! - `RUST_LOG`: Logging level (default: info)

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use rand::Rng;
use tracing::{debug, info};

use afms::config::FleetConfig;
use afms::coordinator::Coordinator;
use afms::event_log::EventLog;
use afms::sensors::{FuelSensor, SensorKind};
use afms::transfer::TransferController;
use afms::types::{EventKind, LogSeverity, TankKind};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "afms")]
#[command(about = "Aircraft Fuel Management Simulation")]
#[command(version)]
struct CliArgs {
    /// Path to a fleet TOML config (overrides AFMS_CONFIG and the local file)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Stop after this many refresh ticks (default: run until Ctrl-C)
    #[arg(long)]
    ticks: Option<u64>,

    /// Seconds between refresh ticks
    #[arg(long, default_value_t = 1)]
    refresh_secs: u64,

    /// Override the event log path from the config
    #[arg(long)]
    log_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  AFMS - Aircraft Fuel Management Simulation");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Load fleet configuration
    let config = match &args.config {
        Some(path) => FleetConfig::load_from_file(path)?,
        None => FleetConfig::load(),
    };
    config.validate()?;

    let log_path = args
        .log_path
        .clone()
        .unwrap_or_else(|| config.system.log_path.clone());

    let system = config.build_system();
    info!(
        fleet = %config.system.name,
        tanks = system.len(),
        total_fuel_l = system.total_fuel(),
        "Fleet ready"
    );

    let controller = TransferController::new(config.system.max_transfer_liters);
    let mut coordinator = Coordinator::new(system, controller, EventLog::new(&log_path));
    coordinator.log_mut().log_event(
        EventKind::SystemStart,
        "Fuel Management Simulation started",
        None,
        LogSeverity::Info,
    );
    let tank_count = coordinator.system().len();
    coordinator.log_mut().log_event(
        EventKind::ConfigLoaded,
        format!("Loaded {tank_count} tanks from configuration"),
        None,
        LogSeverity::Info,
    );

    run_transfer_demo(&mut coordinator);
    run_refresh_loop(&mut coordinator, args.refresh_secs.max(1), args.ticks).await;

    let report = coordinator.status_report();
    info!(
        total_fuel_l = report.total_fuel,
        fuel_pct = report.fuel_percentage,
        alerts = report.alert_count,
        "Final system state"
    );

    // Best-effort flush; a failed save must not take the simulation down
    if let Err(e) = coordinator.save_logs() {
        tracing::warn!(error = %e, "Failed to persist event log");
    }

    Ok(())
}

// ============================================================================
// Scripted Transfer Demo
// ============================================================================

/// Exercise the transfer protocol once at startup: a valid move, an oversized
/// rejection, and the reserve emergency-mode cycle.
fn run_transfer_demo(coordinator: &mut Coordinator) {
    let source = coordinator
        .system()
        .tanks()
        .filter(|t| t.kind() != TankKind::Reserve)
        .max_by(|a, b| a.fuel_level().total_cmp(&b.fuel_level()))
        .map(|t| t.tank_id().to_string());
    let dest = coordinator
        .system()
        .tanks()
        .filter(|t| t.kind() != TankKind::Reserve)
        .max_by(|a, b| a.available_capacity().total_cmp(&b.available_capacity()))
        .map(|t| t.tank_id().to_string());

    if let (Some(source), Some(dest)) = (source, dest) {
        if source != dest {
            match coordinator.transfer_fuel(&source, &dest, 250.0) {
                Ok(receipt) => info!("{receipt}"),
                Err(e) => info!(error = %e, "Demo transfer rejected"),
            }
            // Oversized request: rejected and logged, state untouched
            if let Err(e) = coordinator.transfer_fuel(&source, &dest, 1e7) {
                info!(error = %e, "Oversized transfer rejected as expected");
            }
        }
    }

    let reserve = coordinator
        .system()
        .tanks()
        .find(|t| t.kind() == TankKind::Reserve)
        .map(|t| t.tank_id().to_string());
    let dest = coordinator
        .system()
        .tanks()
        .find(|t| t.kind() != TankKind::Reserve && t.available_capacity() > 100.0)
        .map(|t| t.tank_id().to_string());

    if let (Some(reserve), Some(dest)) = (reserve, dest) {
        // Gate check first: reserve withdrawal requires emergency mode
        if let Err(e) = coordinator.validate_transfer(&reserve, &dest, 100.0) {
            info!(error = %e, "Reserve transfer blocked while disarmed");
        }
        if let Some(tank) = coordinator.system_mut().tank_mut(&reserve) {
            tank.activate_emergency_mode();
        }
        match coordinator.transfer_fuel(&reserve, &dest, 100.0) {
            Ok(receipt) => info!("{receipt}"),
            Err(e) => info!(error = %e, "Armed reserve transfer rejected"),
        }
        if let Some(tank) = coordinator.system_mut().tank_mut(&reserve) {
            tank.deactivate_emergency_mode();
        }
    }
}

// ============================================================================
// Refresh Loop
// ============================================================================

/// Periodic cadence: jitter sensor readings, feed them through the validated
/// setters, scan for alerts, and print the gauge lines.
async fn run_refresh_loop(coordinator: &mut Coordinator, refresh_secs: u64, max_ticks: Option<u64>) {
    let tank_ids = coordinator.system().tank_ids().to_vec();
    let mut sensors: Vec<FuelSensor> = Vec::new();
    for (i, id) in tank_ids.iter().enumerate() {
        sensors.push(FuelSensor::new(
            format!("PRESS_{:03}", i + 1),
            SensorKind::Pressure,
            id.clone(),
        ));
        sensors.push(FuelSensor::new(
            format!("TEMP_{:03}", i + 1),
            SensorKind::Temperature,
            id.clone(),
        ));
    }

    let mut interval = tokio::time::interval(Duration::from_secs(refresh_secs));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut tick: u64 = 0;
    loop {
        if let Some(max) = max_ticks {
            if tick >= max {
                break;
            }
        }

        tokio::select! {
            _ = interval.tick() => {
                tick += 1;
                refresh_sensors(coordinator, &mut sensors);
                let alerts = coordinator.scan_alerts().len();
                for tank in coordinator.system().tanks() {
                    debug!("{tank}");
                }
                info!(
                    tick,
                    total_fuel_l = coordinator.system().total_fuel(),
                    system_pct = coordinator.system().system_fuel_percentage(),
                    alerts,
                    "Refresh"
                );
            }
            _ = &mut ctrl_c => {
                info!("Shutdown requested");
                break;
            }
        }
    }
}

/// Apply one round of jittered sensor readings to the tanks. Readings that
/// fail the sensor self-test or the tank's own setter bounds are dropped.
fn refresh_sensors(coordinator: &mut Coordinator, sensors: &mut [FuelSensor]) {
    let mut rng = rand::thread_rng();
    for sensor in sensors.iter_mut() {
        let tank_id = sensor.tank_id().to_string();
        let Some(base) = coordinator.system().tank(&tank_id).map(|t| match sensor.kind() {
            SensorKind::Pressure => t.pressure(),
            SensorKind::Temperature => t.temperature(),
            SensorKind::Level => t.fuel_level(),
        }) else {
            continue;
        };

        sensor.set_reading(base + rng.gen_range(-0.5..0.5));
        if !sensor.self_test() {
            continue;
        }
        let Some(reading) = sensor.reading() else {
            continue;
        };

        if let Some(tank) = coordinator.system_mut().tank_mut(&tank_id) {
            let applied = match sensor.kind() {
                SensorKind::Pressure => tank.set_pressure(reading),
                SensorKind::Temperature => tank.set_temperature(reading),
                SensorKind::Level => Ok(()),
            };
            if let Err(e) = applied {
                debug!(tank_id = %tank_id, error = %e, "Sensor reading rejected by tank");
            }
        }
    }
}
