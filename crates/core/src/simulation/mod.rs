//! Simulation driver
//!
//! [`VentilationSimulation`] owns one grid, applies a [`SimulationConfig`] to
//! it and runs the solver for a fixed number of steps. A run either completes
//! every requested step or returns a [`SimulationError`]; after an error the
//! grid is left as-is and the caller should discard it.

mod compare;
mod result;

pub use compare::{compare_configurations, ConfigurationComparison};
pub use result::{SimulationResult, VelocityField};

use crate::config::SimulationConfig;
use crate::devices::{apply_config, DeviceKind, DeviceRegistry};
use crate::error::{ConfigError, SimulationError};
use crate::grid::LatticeGrid;
use crate::solver::{self, SimulationParams};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Step count used when the caller does not choose one
pub const DEFAULT_STEPS: u64 = 500;

/// A configured lattice plus its run state
#[derive(Debug, Clone)]
pub struct VentilationSimulation {
    config: SimulationConfig,
    grid: LatticeGrid,
    registry: DeviceRegistry,
    steps_run: u64,
}

impl VentilationSimulation {
    /// Validate `config` and build a grid at rest with every device applied.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found by
    /// [`SimulationConfig::validate`].
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut grid = LatticeGrid::new(
            config.grid_width,
            config.grid_height,
            config.params.initial_concentration,
        );
        let registry = apply_config(&mut grid, &config);

        let counts = registry.counts_by_kind();
        let count = |kind: DeviceKind| counts.get(&kind).copied().unwrap_or(0);
        info!(
            "Initialized {}x{} ventilation grid: {} walls, {} inlets, {} outlets, {} AC, {} ventilators, {} purifiers, {} sterilizers",
            config.grid_width,
            config.grid_height,
            count(DeviceKind::Wall),
            count(DeviceKind::Inlet),
            count(DeviceKind::Outlet),
            count(DeviceKind::AcUnit),
            count(DeviceKind::Ventilator),
            count(DeviceKind::Purifier),
            count(DeviceKind::Sterilizer),
        );

        Ok(Self {
            config,
            grid,
            registry,
            steps_run: 0,
        })
    }

    /// Parse, validate and initialize from a JSON config
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON, or any validation error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(SimulationConfig::from_json(json)?)
    }

    /// Discard all state and start over from `config`
    ///
    /// # Errors
    ///
    /// On a validation error the current simulation is left untouched.
    pub fn initialize(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        *self = Self::new(config)?;
        Ok(())
    }

    /// Advance exactly one timestep
    pub fn step(&mut self) {
        solver::step(&mut self.grid, &self.config.params);
        self.steps_run += 1;
    }

    /// Run `steps` timesteps.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Unstable`] if the stability scan finds a
    /// non-finite density or velocity.
    pub fn simulate(&mut self, steps: u64) -> Result<(), SimulationError> {
        let never = AtomicBool::new(false);
        self.simulate_with_cancel(steps, &never)
    }

    /// Run `steps` timesteps, checking `cancel` before each one.
    ///
    /// The flag is only read between timesteps, so no step is ever partially
    /// applied. Stability is scanned every `stability_check_interval` steps
    /// (0 disables periodic scans) and once more at the end.
    ///
    /// # Errors
    ///
    /// [`SimulationError::Cancelled`] with the number of steps completed in
    /// this call, or [`SimulationError::Unstable`].
    pub fn simulate_with_cancel(
        &mut self,
        steps: u64,
        cancel: &AtomicBool,
    ) -> Result<(), SimulationError> {
        let interval = u64::from(self.config.params.stability_check_interval);

        for completed in 0..steps {
            if cancel.load(Ordering::Relaxed) {
                warn!(
                    "Simulation cancelled after {} of {} steps",
                    completed, steps
                );
                return Err(SimulationError::Cancelled {
                    completed_steps: completed,
                });
            }

            self.step();

            if interval > 0 && self.steps_run % interval == 0 {
                self.check_stability()?;
                debug!("Step {}/{}", completed + 1, steps);
            }
        }

        self.check_stability()?;

        let result = self.results();
        info!(
            "Simulation complete: {} steps, avg velocity {:.4}, max velocity {:.4}, dead zone {:.1}%, avg concentration {:.3}",
            self.steps_run,
            result.avg_velocity,
            result.max_velocity,
            result.dead_zone_percentage,
            result.avg_concentration
        );
        Ok(())
    }

    /// Scan density and velocity for NaN/Inf.
    ///
    /// # Errors
    ///
    /// [`SimulationError::Unstable`] naming the first bad cell.
    pub fn check_stability(&self) -> Result<(), SimulationError> {
        match self.grid.first_non_finite() {
            Some(cell) => {
                warn!(
                    "Numerical instability at step {} in cell {} ({}, {})",
                    self.steps_run,
                    cell,
                    cell % self.grid.width(),
                    cell / self.grid.width()
                );
                Err(SimulationError::Unstable {
                    step: self.steps_run,
                    cell,
                })
            }
            None => Ok(()),
        }
    }

    /// Snapshot of the current fields and summary metrics
    pub fn results(&self) -> SimulationResult {
        SimulationResult::from_grid(&self.grid, self.config.params.dead_zone_threshold)
    }

    pub fn grid(&self) -> &LatticeGrid {
        &self.grid
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn params(&self) -> &SimulationParams {
        &self.config.params
    }

    /// Devices applied at setup
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Total timesteps since initialization
    pub fn steps_run(&self) -> u64 {
        self.steps_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::CellType;

    #[test]
    fn test_rejects_invalid_config() {
        let err = VentilationSimulation::new(SimulationConfig::new(0, 10)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGridDimensions { .. }));
    }

    #[test]
    fn test_initialize_resets() {
        let mut sim = VentilationSimulation::new(SimulationConfig::new(8, 8)).unwrap();
        sim.simulate(3).unwrap();
        assert_eq!(sim.steps_run(), 3);

        sim.initialize(SimulationConfig::new(4, 6).with_outlet(1, 1))
            .unwrap();
        assert_eq!(sim.steps_run(), 0);
        assert_eq!(sim.grid().width(), 4);
        assert_eq!(sim.grid().cell_type(sim.grid().index(1, 1)), CellType::Outlet);
        assert_eq!(sim.registry().len(), 1);
    }

    #[test]
    fn test_failed_initialize_keeps_state() {
        let mut sim = VentilationSimulation::new(SimulationConfig::new(8, 8)).unwrap();
        sim.step();
        assert!(sim.initialize(SimulationConfig::new(8, 0)).is_err());
        assert_eq!(sim.steps_run(), 1);
        assert_eq!(sim.grid().width(), 8);
    }

    #[test]
    fn test_cancel_before_first_step() {
        let mut sim = VentilationSimulation::new(SimulationConfig::new(8, 8)).unwrap();
        let cancel = AtomicBool::new(true);
        let err = sim.simulate_with_cancel(10, &cancel).unwrap_err();
        assert_eq!(err, SimulationError::Cancelled { completed_steps: 0 });
        assert_eq!(sim.steps_run(), 0);
    }

    #[test]
    fn test_divergence_is_reported() {
        // A purifier far beyond any stable Mach number
        let config = SimulationConfig::new(16, 16).with_purifier(8, 8, 1.0e9, 3.0);
        let mut sim = VentilationSimulation::new(config).unwrap();
        let err = sim.simulate(200).unwrap_err();
        assert!(matches!(err, SimulationError::Unstable { .. }));
        for &c in sim.grid().concentration().as_slice() {
            assert!((0.0..=1.0).contains(&c));
        }
    }

    #[test]
    fn test_from_json() {
        let sim = VentilationSimulation::from_json(
            r#"{"gridWidth": 12, "gridHeight": 6, "acUnits": [{"x": 6, "y": 3, "cmh": 300, "spreadRadius": 2}]}"#,
        )
        .unwrap();
        assert_eq!(sim.registry().counts_by_kind()[&DeviceKind::AcUnit], 1);
        assert_eq!(sim.grid().cell_type(sim.grid().index(7, 3)), CellType::Ac);
    }
}
