//! Tunable constants of the lattice and transport model
//!
//! The defaults reproduce the empirical values of the ventilation model. They
//! are exposed as a serde struct so a config file may override them, but a
//! config that omits `params` runs the reference model unchanged.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Parameters controlling a single simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationParams {
    /// BGK relaxation time τ (ω = 1/τ)
    pub tau: f32,

    /// Implicit time scale K of the concentration back-trace (`src = x − u·K`)
    pub advection_scale: f32,

    /// Global per-step concentration decay factor
    pub global_decay: f32,

    /// Per-step concentration sink per unit sterilization effect
    pub sterilization_rate: f32,

    /// Additional per-step concentration factor on outlet cells
    pub outlet_decay: f32,

    /// Concentration every cell starts with
    pub initial_concentration: f32,

    /// Velocity magnitude below which a cell counts as a dead zone
    pub dead_zone_threshold: f32,

    /// Steps between numerical stability scans (0 = only at the end of a run)
    pub stability_check_interval: u32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            tau: 0.6,
            advection_scale: 10.0,
            global_decay: 0.999,
            sterilization_rate: 0.05,
            outlet_decay: 0.9,
            initial_concentration: 1.0,
            dead_zone_threshold: 0.005,
            stability_check_interval: 50,
        }
    }
}

impl SimulationParams {
    /// Collision frequency ω = 1/τ
    #[inline]
    #[must_use]
    pub fn omega(&self) -> f32 {
        1.0 / self.tau
    }

    /// Validate parameter ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRelaxationTime`] if τ ≤ 0.5,
    /// [`ConfigError::InvalidInitialConcentration`] outside [0, 1] and
    /// [`ConfigError::NonFinite`] for any NaN/Inf field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("params.tau", self.tau),
            ("params.advectionScale", self.advection_scale),
            ("params.globalDecay", self.global_decay),
            ("params.sterilizationRate", self.sterilization_rate),
            ("params.outletDecay", self.outlet_decay),
            ("params.initialConcentration", self.initial_concentration),
            ("params.deadZoneThreshold", self.dead_zone_threshold),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite {
                    field: field.to_string(),
                    value,
                });
            }
        }
        if self.tau <= 0.5 {
            return Err(ConfigError::InvalidRelaxationTime(self.tau));
        }
        // Walls never run transport, so a seed outside [0, 1] would persist there
        if !(0.0..=1.0).contains(&self.initial_concentration) {
            return Err(ConfigError::InvalidInitialConcentration(
                self.initial_concentration,
            ));
        }
        Ok(())
    }
}
