//! Device source models
//!
//! Walls, openings and airflow devices exist only as grid mutations once
//! setup is done. [`apply_config`] walks a [`SimulationConfig`] in a fixed
//! order and returns a [`DeviceRegistry`] that records what was placed, for
//! logging and diagnostics; the grid remains the single source of truth.
//!
//! Setup order: walls, inlets, outlets, AC units, ventilators, purifiers,
//! sterilizers. Sterilizers go last because they overwrite every non-Wall tag
//! in their core.

pub mod placement;

pub use placement::{
    ac_speed, disk_speed, place_ac_unit, place_inlet, place_obstacle, place_outlet,
    place_purifier, place_sterilizer, place_ventilator, ventilator_speed,
};

use crate::config::SimulationConfig;
use crate::core_types::CubicMetersPerHour;
use crate::grid::LatticeGrid;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Empirical scale factors of the device models
pub mod constants {
    /// Effective outlet area factor of an AC unit: `v = cmh / (3600 · spread · AC_AREA_FACTOR)`
    pub const AC_AREA_FACTOR: f32 = 0.01;

    /// Fraction of the AC discharge speed injected into each ray cell
    pub const AC_RAY_SCALE: f32 = 0.25;

    /// Number of cells in a ventilator jet
    pub const VENTILATOR_LENGTH: usize = 5;

    /// Effective area factor of disk devices: `v = cmh / (3600 · π r² · DISK_AREA_FACTOR)`
    pub const DISK_AREA_FACTOR: f32 = 0.01;

    /// Fraction of the disk speed used for the purifier swirl
    pub const PURIFIER_SWIRL_SCALE: f32 = 0.3;

    /// Sterilizer core radius as a fraction of its influence radius
    pub const STERILIZER_CORE_RATIO: f32 = 0.5;

    /// Default AC unit airflow (CMH)
    pub const DEFAULT_AC_CMH: f32 = 300.0;

    /// Default ventilator airflow (CMH)
    pub const DEFAULT_VENTILATOR_CMH: f32 = 200.0;

    /// Default purifier / sterilizer airflow (CMH)
    pub const DEFAULT_AIR_CLEANER_CMH: f32 = 150.0;
}

/// Kind of a placed element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    Wall,
    Inlet,
    Outlet,
    AcUnit,
    Ventilator,
    Purifier,
    Sterilizer,
}

impl DeviceKind {
    /// Default airflow for powered devices, zero for walls and openings
    #[must_use]
    pub const fn default_cmh(self) -> CubicMetersPerHour {
        match self {
            DeviceKind::AcUnit => CubicMetersPerHour::new(constants::DEFAULT_AC_CMH),
            DeviceKind::Ventilator => CubicMetersPerHour::new(constants::DEFAULT_VENTILATOR_CMH),
            DeviceKind::Purifier | DeviceKind::Sterilizer => {
                CubicMetersPerHour::new(constants::DEFAULT_AIR_CLEANER_CMH)
            }
            DeviceKind::Wall | DeviceKind::Inlet | DeviceKind::Outlet => CubicMetersPerHour::ZERO,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceKind::Wall => "wall",
            DeviceKind::Inlet => "inlet",
            DeviceKind::Outlet => "outlet",
            DeviceKind::AcUnit => "ac unit",
            DeviceKind::Ventilator => "ventilator",
            DeviceKind::Purifier => "purifier",
            DeviceKind::Sterilizer => "sterilizer",
        };
        f.write_str(name)
    }
}

/// One placement applied during setup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedDevice {
    pub kind: DeviceKind,
    /// Anchor cell as configured (may lie outside the grid)
    pub x: i64,
    pub y: i64,
    /// Number of cells the placement tagged
    pub cells: usize,
}

/// Read-only record of everything placed on a grid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceRegistry {
    devices: Vec<PlacedDevice>,
}

impl DeviceRegistry {
    fn record(&mut self, kind: DeviceKind, x: i64, y: i64, cells: usize) {
        debug!("Placed {} at ({}, {}) covering {} cells", kind, x, y, cells);
        self.devices.push(PlacedDevice { kind, x, y, cells });
    }

    /// Every placement in setup order
    pub fn devices(&self) -> &[PlacedDevice] {
        &self.devices
    }

    /// Number of placements
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether nothing was placed
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Number of placements per kind
    pub fn counts_by_kind(&self) -> FxHashMap<DeviceKind, usize> {
        let mut counts = FxHashMap::default();
        for d in &self.devices {
            *counts.entry(d.kind).or_insert(0) += 1;
        }
        counts
    }
}

/// Apply every wall, opening and device of `config` to `grid`.
///
/// The config should already be validated; zero-radius disks are skipped here
/// rather than divided by.
pub fn apply_config(grid: &mut LatticeGrid, config: &SimulationConfig) -> DeviceRegistry {
    let mut registry = DeviceRegistry::default();

    for o in &config.obstacles {
        let cells = place_obstacle(grid, o);
        registry.record(DeviceKind::Wall, o.x, o.y, cells);
    }
    for inlet in &config.inlets {
        let cells = place_inlet(grid, inlet);
        registry.record(DeviceKind::Inlet, inlet.x, inlet.y, cells);
    }
    for outlet in &config.outlets {
        let cells = place_outlet(grid, outlet);
        registry.record(DeviceKind::Outlet, outlet.x, outlet.y, cells);
    }
    for ac in &config.ac_units {
        let cells = place_ac_unit(grid, ac);
        registry.record(DeviceKind::AcUnit, ac.x, ac.y, cells);
    }
    for vent in &config.ventilators {
        let cells = place_ventilator(grid, vent);
        registry.record(DeviceKind::Ventilator, vent.x, vent.y, cells);
    }
    for purifier in &config.purifiers {
        let cells = place_purifier(grid, purifier);
        registry.record(DeviceKind::Purifier, purifier.x, purifier.y, cells);
    }
    for sterilizer in &config.sterilizers {
        let cells = place_sterilizer(grid, sterilizer);
        registry.record(DeviceKind::Sterilizer, sterilizer.x, sterilizer.y, cells);
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::CellType;

    #[test]
    fn test_default_cmh() {
        assert_eq!(*DeviceKind::AcUnit.default_cmh(), 300.0);
        assert_eq!(*DeviceKind::Ventilator.default_cmh(), 200.0);
        assert_eq!(*DeviceKind::Purifier.default_cmh(), 150.0);
        assert_eq!(*DeviceKind::Sterilizer.default_cmh(), 150.0);
        assert_eq!(*DeviceKind::Inlet.default_cmh(), 0.0);
    }

    #[test]
    fn test_apply_config_records_everything() {
        let config = SimulationConfig::new(20, 20)
            .with_boundary_ring()
            .with_inlet(0, 10, 0.1, 0.0)
            .with_outlet(19, 10)
            .with_ac_unit(5, 5, 300.0, 3)
            .with_ventilator(10, 15, 200.0, 0.0, -1.0)
            .with_purifier(14, 5, 150.0, 2.0)
            .with_sterilizer(10, 10, 150.0, 3.0);
        let mut grid = LatticeGrid::new(20, 20, 1.0);
        let registry = apply_config(&mut grid, &config);

        assert_eq!(registry.len(), 10);
        let counts = registry.counts_by_kind();
        assert_eq!(counts[&DeviceKind::Wall], 4);
        assert_eq!(counts[&DeviceKind::Sterilizer], 1);
        assert_eq!(counts[&DeviceKind::AcUnit], 1);

        assert_eq!(grid.cell_type(grid.index(0, 10)), CellType::Inlet);
        assert_eq!(grid.cell_type(grid.index(19, 10)), CellType::Outlet);
        assert_eq!(grid.cell_type(grid.index(10, 10)), CellType::Sterilizer);
        assert_eq!(grid.cell_type(grid.index(0, 0)), CellType::Wall);
    }

    #[test]
    fn test_placement_is_idempotent() {
        let config = SimulationConfig::new(16, 16)
            .with_ac_unit(8, 8, 300.0, 4)
            .with_sterilizer(4, 4, 150.0, 3.0);
        let mut once = LatticeGrid::new(16, 16, 1.0);
        apply_config(&mut once, &config);
        let mut twice = once.clone();
        apply_config(&mut twice, &config);

        assert_eq!(once.cell_types(), twice.cell_types());
        assert_eq!(once.sterilization(), twice.sterilization());
        for i in 0..once.cell_count() {
            assert_eq!(once.pinned_velocity(i), twice.pinned_velocity(i));
        }
    }
}
