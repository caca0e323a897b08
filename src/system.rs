//! Fuel system registry: holds the tank roster and aggregate projections
//!
//! All aggregate queries are pure read-side projections recomputed on every
//! call; nothing is cached between calls.

use std::collections::HashMap;

use tracing::warn;

use crate::types::{FuelTank, TankStatus};

/// In-memory tank registry keyed by tank id.
///
/// Iteration follows insertion order for stable display; lookups go through
/// the id index. Inserting a duplicate id replaces the previous registration
/// (last write wins) and keeps the original display position.
#[derive(Debug, Default)]
pub struct FuelSystem {
    tanks: HashMap<String, FuelTank>,
    order: Vec<String>,
}

impl FuelSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tank. A duplicate id silently replaces the previous tank
    /// (a warning is traced so the conflict is observable).
    pub fn add_tank(&mut self, tank: FuelTank) {
        let id = tank.tank_id().to_string();
        if self.tanks.insert(id.clone(), tank).is_some() {
            warn!(tank_id = %id, "Replacing existing tank registration");
        } else {
            self.order.push(id);
        }
    }

    pub fn tank(&self, tank_id: &str) -> Option<&FuelTank> {
        self.tanks.get(tank_id)
    }

    pub fn tank_mut(&mut self, tank_id: &str) -> Option<&mut FuelTank> {
        self.tanks.get_mut(tank_id)
    }

    /// Iterate tanks in insertion order
    pub fn tanks(&self) -> impl Iterator<Item = &FuelTank> {
        self.order.iter().filter_map(|id| self.tanks.get(id))
    }

    /// All registered tank ids in insertion order
    pub fn tank_ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.tanks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty()
    }

    // === Aggregates ===

    /// Total fuel across all tanks (liters)
    pub fn total_fuel(&self) -> f64 {
        self.tanks.values().map(FuelTank::fuel_level).sum()
    }

    /// Total capacity across all tanks (liters)
    pub fn total_capacity(&self) -> f64 {
        self.tanks.values().map(FuelTank::capacity).sum()
    }

    /// Overall system fuel percentage (0 when total capacity is 0)
    pub fn system_fuel_percentage(&self) -> f64 {
        let total_capacity = self.total_capacity();
        if total_capacity == 0.0 {
            return 0.0;
        }
        (self.total_fuel() / total_capacity) * 100.0
    }

    /// Tanks currently classified at the given status, in display order
    pub fn tanks_by_status(&self, status: TankStatus) -> Vec<&FuelTank> {
        self.tanks().filter(|t| t.status() == status).collect()
    }

    /// Tanks needing attention (LOW or CRITICAL), in display order
    pub fn low_fuel_tanks(&self) -> Vec<&FuelTank> {
        self.tanks()
            .filter(|t| t.status().needs_attention())
            .collect()
    }

    /// Status summary for every tank
    pub fn check_all_tanks(&self) -> HashMap<String, TankStatus> {
        self.tanks
            .iter()
            .map(|(id, tank)| (id.clone(), tank.status()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TankKind;

    fn sample_system() -> FuelSystem {
        let mut system = FuelSystem::new();
        system.add_tank(FuelTank::new(TankKind::Main, "T1", "Main 1", 5000.0, 4000.0));
        system.add_tank(FuelTank::new(TankKind::Auxiliary, "T2", "Aux", 3000.0, 2000.0));
        system
    }

    #[test]
    fn test_add_and_get_tank() {
        let system = sample_system();
        assert_eq!(system.len(), 2);
        assert_eq!(system.tank("T1").unwrap().tank_id(), "T1");
        assert!(system.tank("MISSING").is_none());
    }

    #[test]
    fn test_tank_ids_preserve_insertion_order() {
        let system = sample_system();
        assert_eq!(system.tank_ids(), ["T1".to_string(), "T2".to_string()]);
    }

    #[test]
    fn test_duplicate_id_last_write_wins() {
        let mut system = sample_system();
        system.add_tank(FuelTank::new(TankKind::Main, "T1", "Replacement", 6000.0, 0.0));
        assert_eq!(system.len(), 2);
        assert_eq!(system.tank("T1").unwrap().name(), "Replacement");
        // Display position is kept
        assert_eq!(system.tank_ids()[0], "T1");
    }

    #[test]
    fn test_totals() {
        let system = sample_system();
        assert_eq!(system.total_fuel(), 6000.0);
        assert_eq!(system.total_capacity(), 8000.0);
        assert!((system.system_fuel_percentage() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_system_percentage_empty_registry() {
        let system = FuelSystem::new();
        assert_eq!(system.system_fuel_percentage(), 0.0);
    }

    #[test]
    fn test_tanks_by_status() {
        let system = sample_system();
        assert_eq!(system.tanks_by_status(TankStatus::Normal).len(), 2);
        assert!(system.tanks_by_status(TankStatus::Critical).is_empty());
    }

    #[test]
    fn test_low_fuel_tanks() {
        let mut system = sample_system();
        system
            .tank_mut("T1")
            .unwrap()
            .remove_fuel(3500.0) // 500 / 5000 = 10% -> CRITICAL
            .unwrap();
        let low = system.low_fuel_tanks();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].tank_id(), "T1");
    }

    #[test]
    fn test_check_all_tanks() {
        let system = sample_system();
        let statuses = system.check_all_tanks();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses["T1"], TankStatus::Normal);
    }
}
