//! Passive fuel sensor model with self-test bounds
//!
//! Sensors here are value holders fed by the simulation loop; there is no
//! sampling pipeline or hardware integration. A sensor that fails its
//! self-test is marked non-operational and stops reporting readings until
//! cleared.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Plausibility bounds used by `FuelSensor::self_test`
pub mod self_test_bounds {
    /// Level readings accepted between 0 and this many liters
    pub const LEVEL_MAX_L: f64 = 10_000.0;
    /// Pressure readings accepted between 0 and this many PSI
    pub const PRESSURE_MAX_PSI: f64 = 100.0;
    /// Temperature readings accepted from this floor (°C)
    pub const TEMPERATURE_MIN_C: f64 = -50.0;
    /// Temperature readings accepted up to this ceiling (°C)
    pub const TEMPERATURE_MAX_C: f64 = 100.0;
}

/// What the sensor measures
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorKind {
    Level,
    Pressure,
    Temperature,
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorKind::Level => write!(f, "LEVEL"),
            SensorKind::Pressure => write!(f, "PRESSURE"),
            SensorKind::Temperature => write!(f, "TEMPERATURE"),
        }
    }
}

/// A single passive sensor attached to one tank
#[derive(Debug, Clone, Serialize)]
pub struct FuelSensor {
    sensor_id: String,
    kind: SensorKind,
    tank_id: String,
    raw_reading: f64,
    calibration_offset: f64,
    operational: bool,
}

impl FuelSensor {
    pub fn new(sensor_id: impl Into<String>, kind: SensorKind, tank_id: impl Into<String>) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            kind,
            tank_id: tank_id.into(),
            raw_reading: 0.0,
            calibration_offset: 0.0,
            operational: true,
        }
    }

    pub fn sensor_id(&self) -> &str {
        &self.sensor_id
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn tank_id(&self) -> &str {
        &self.tank_id
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    /// Calibrated reading; `None` while the sensor is non-operational
    pub fn reading(&self) -> Option<f64> {
        if !self.operational {
            return None;
        }
        Some(self.raw_reading + self.calibration_offset)
    }

    pub fn set_reading(&mut self, value: f64) {
        self.raw_reading = value;
    }

    /// Apply a calibration offset to subsequent readings
    pub fn calibrate(&mut self, offset: f64) {
        self.calibration_offset = offset;
        info!(sensor_id = %self.sensor_id, offset, "Sensor calibrated");
    }

    pub fn set_operational(&mut self, operational: bool) {
        self.operational = operational;
        if !operational {
            warn!(sensor_id = %self.sensor_id, "Sensor marked non-operational");
        }
    }

    /// Check the raw reading against per-kind plausibility bounds and update
    /// the operational flag accordingly. Returns the verdict.
    pub fn self_test(&mut self) -> bool {
        let valid = match self.kind {
            SensorKind::Level => (0.0..=self_test_bounds::LEVEL_MAX_L).contains(&self.raw_reading),
            SensorKind::Pressure => {
                (0.0..=self_test_bounds::PRESSURE_MAX_PSI).contains(&self.raw_reading)
            }
            SensorKind::Temperature => (self_test_bounds::TEMPERATURE_MIN_C
                ..=self_test_bounds::TEMPERATURE_MAX_C)
                .contains(&self.raw_reading),
        };
        if !valid {
            warn!(
                sensor_id = %self.sensor_id,
                kind = %self.kind,
                reading = self.raw_reading,
                "Sensor self-test failed"
            );
        }
        self.operational = valid;
        valid
    }
}

impl std::fmt::Display for FuelSensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.operational {
            "OPERATIONAL"
        } else {
            "FAULT"
        };
        match self.reading() {
            Some(r) => write!(
                f,
                "Sensor {} ({}) - Tank: {} - Reading: {:.2} [{}]",
                self.sensor_id, self.kind, self.tank_id, r, status
            ),
            None => write!(
                f,
                "Sensor {} ({}) - Tank: {} - Reading: n/a [{}]",
                self.sensor_id, self.kind, self.tank_id, status
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_includes_calibration() {
        let mut sensor = FuelSensor::new("S1", SensorKind::Level, "T1");
        sensor.set_reading(100.0);
        sensor.calibrate(2.5);
        assert_eq!(sensor.reading(), Some(102.5));
    }

    #[test]
    fn test_non_operational_sensor_reports_none() {
        let mut sensor = FuelSensor::new("S1", SensorKind::Pressure, "T1");
        sensor.set_reading(45.0);
        sensor.set_operational(false);
        assert_eq!(sensor.reading(), None);
    }

    #[test]
    fn test_self_test_bounds_per_kind() {
        let mut level = FuelSensor::new("S1", SensorKind::Level, "T1");
        level.set_reading(5000.0);
        assert!(level.self_test());
        level.set_reading(20_000.0);
        assert!(!level.self_test());
        assert!(!level.is_operational());

        let mut pressure = FuelSensor::new("S2", SensorKind::Pressure, "T1");
        pressure.set_reading(101.0);
        assert!(!pressure.self_test());

        let mut temp = FuelSensor::new("S3", SensorKind::Temperature, "T1");
        temp.set_reading(-50.0);
        assert!(temp.self_test());
        temp.set_reading(-51.0);
        assert!(!temp.self_test());
    }

    #[test]
    fn test_self_test_recovers_operational_flag() {
        let mut sensor = FuelSensor::new("S1", SensorKind::Pressure, "T1");
        sensor.set_reading(150.0);
        assert!(!sensor.self_test());
        sensor.set_reading(45.0);
        assert!(sensor.self_test());
        assert!(sensor.is_operational());
    }
}
