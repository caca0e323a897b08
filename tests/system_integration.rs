//! Coordinator-level integration: transfers, alert scans, status reports,
//! and event-log persistence working together over a configured roster

use afms::config::FleetConfig;
use afms::coordinator::Coordinator;
use afms::event_log::EventLog;
use afms::transfer::TransferController;
use afms::types::{AlertKind, AlertSeverity, EventKind, TankStatus};

fn coordinator_from_default_roster(log_path: &std::path::Path) -> Coordinator {
    let config = FleetConfig::default_roster();
    config.validate().expect("default roster must validate");
    Coordinator::new(
        config.build_system(),
        TransferController::new(config.system.max_transfer_liters),
        EventLog::new(log_path),
    )
}

#[test]
fn default_roster_boots_healthy() {
    let dir = tempfile::tempdir().unwrap();
    let mut coordinator = coordinator_from_default_roster(&dir.path().join("log.json"));

    let report = coordinator.status_report();
    assert_eq!(report.tank_count, 4);
    assert_eq!(report.total_fuel, 10_300.0);
    assert_eq!(report.total_capacity, 14_000.0);
    assert_eq!(report.alert_count, 0);
    assert_eq!(report.critical_alerts, 0);
}

#[test]
fn transfer_then_alerts_then_report_reflect_each_other() {
    let dir = tempfile::tempdir().unwrap();
    let mut coordinator = coordinator_from_default_roster(&dir.path().join("log.json"));

    // Drain the right main tank into LOW territory: 3500 -> 2300 (46%)
    coordinator
        .transfer_fuel("RIGHT_MAIN", "CENTER_AUX", 1200.0)
        .unwrap();
    assert_eq!(
        coordinator.system().tank("RIGHT_MAIN").unwrap().status(),
        TankStatus::Low
    );

    // The post-transfer rescan already flagged it
    let for_tank = coordinator.monitor().alerts_for_tank("RIGHT_MAIN");
    assert_eq!(for_tank.len(), 1);
    assert_eq!(for_tank[0].severity, AlertSeverity::Warning);
    assert_eq!(for_tank[0].kind, AlertKind::FuelLevel);

    let report = coordinator.status_report();
    assert_eq!(report.alert_count, 1);
    assert_eq!(report.low_fuel_tanks, 1);
}

#[test]
fn alert_accessors_partition_the_scan() {
    let dir = tempfile::tempdir().unwrap();
    let mut coordinator = coordinator_from_default_roster(&dir.path().join("log.json"));

    // Push one tank into the accepted pressure danger band and one into
    // critical fuel
    coordinator
        .system_mut()
        .tank_mut("LEFT_MAIN")
        .unwrap()
        .set_pressure(55.0)
        .unwrap();
    {
        let aux = coordinator.system_mut().tank_mut("CENTER_AUX").unwrap();
        aux.remove_fuel(1400.0).unwrap(); // 100 / 3000 ≈ 3.3% -> CRITICAL
    }

    coordinator.scan_alerts();
    let monitor = coordinator.monitor();
    assert!(monitor.has_critical_alerts());
    assert_eq!(monitor.alerts_by_kind(AlertKind::Pressure).len(), 1);
    assert_eq!(monitor.alerts_by_kind(AlertKind::FuelLevel).len(), 1);
    assert_eq!(monitor.critical_alerts().len(), 1);
    assert_eq!(monitor.critical_alerts()[0].tank_id, "CENTER_AUX");
}

#[test]
fn repeated_scans_replace_rather_than_accumulate() {
    let dir = tempfile::tempdir().unwrap();
    let mut coordinator = coordinator_from_default_roster(&dir.path().join("log.json"));

    coordinator
        .system_mut()
        .tank_mut("CENTER_AUX")
        .unwrap()
        .remove_fuel(1400.0)
        .unwrap();

    let first = coordinator.scan_alerts().to_vec();
    let second = coordinator.scan_alerts().to_vec();
    assert_eq!(first, second);
    assert_eq!(coordinator.monitor().alert_count(), first.len());
}

#[test]
fn event_log_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("logs/system_log.json");
    let mut coordinator = coordinator_from_default_roster(&log_path);

    coordinator.transfer_fuel("LEFT_MAIN", "CENTER_AUX", 500.0).unwrap();
    let _ = coordinator.transfer_fuel("LEFT_MAIN", "LEFT_MAIN", 1.0);
    coordinator.save_logs().unwrap();

    let mut reloaded = EventLog::new(&log_path);
    let count = reloaded.load_from_file().unwrap();
    assert_eq!(count, coordinator.log().len());
    assert!(reloaded
        .entries()
        .iter()
        .any(|e| e.kind == EventKind::FuelTransfer && e.message.contains("SUCCESS")));
    assert!(reloaded
        .entries()
        .iter()
        .any(|e| e.kind == EventKind::FuelTransfer && e.message.contains("FAILED")));
}

#[test]
fn reserve_and_main_classify_the_same_percentage_differently() {
    let dir = tempfile::tempdir().unwrap();
    let mut coordinator = coordinator_from_default_roster(&dir.path().join("log.json"));

    // Bring both LEFT_MAIN and RESERVE to exactly 30%
    {
        let main = coordinator.system_mut().tank_mut("LEFT_MAIN").unwrap();
        let excess = main.fuel_level() - main.capacity() * 0.30;
        main.remove_fuel(excess).unwrap();
    }
    {
        let reserve = coordinator.system_mut().tank_mut("RESERVE").unwrap();
        reserve.activate_emergency_mode();
        let excess = reserve.fuel_level() - reserve.capacity() * 0.30;
        reserve.remove_fuel(excess).unwrap();
    }

    assert_eq!(
        coordinator.system().tank("LEFT_MAIN").unwrap().status(),
        TankStatus::Low
    );
    assert_eq!(
        coordinator.system().tank("RESERVE").unwrap().status(),
        TankStatus::Critical
    );

    coordinator.scan_alerts();
    assert_eq!(coordinator.monitor().critical_alerts().len(), 1);
    assert_eq!(coordinator.monitor().warning_alerts().len(), 1);
}
