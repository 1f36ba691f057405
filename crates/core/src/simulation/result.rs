//! Run results in the shape downstream consumers expect
//!
//! Field names serialize exactly as `velocityField`, `avgVelocity`,
//! `maxVelocity`, `gridWidth`, `gridHeight`, `deadZones`,
//! `deadZonePercentage`, `concentration` and `avgConcentration`.

use crate::diagnostics::{ventilation_score, DeadZoneMap, FlowStats};
use crate::error::ConfigError;
use crate::grid::LatticeGrid;
use serde::{Deserialize, Serialize};

/// Row-major macroscopic fields, `gridWidth × gridHeight` each
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityField {
    pub ux: Vec<f32>,
    pub uy: Vec<f32>,
    pub density: Vec<f32>,
}

/// Snapshot of a simulation for diagnostics and visualization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub velocity_field: VelocityField,
    pub avg_velocity: f32,
    pub max_velocity: f32,
    pub grid_width: usize,
    pub grid_height: usize,
    pub dead_zones: DeadZoneMap,
    pub dead_zone_percentage: f32,
    pub concentration: Vec<f32>,
    pub avg_concentration: f32,
}

impl SimulationResult {
    /// Copy the current grid state and derive the summary metrics
    pub fn from_grid(grid: &LatticeGrid, dead_zone_threshold: f32) -> Self {
        let stats = FlowStats::compute(grid);
        let dead_zones = DeadZoneMap::detect(grid, dead_zone_threshold);

        Self {
            velocity_field: VelocityField {
                ux: grid.ux().as_slice().to_vec(),
                uy: grid.uy().as_slice().to_vec(),
                density: grid.density().as_slice().to_vec(),
            },
            avg_velocity: stats.avg_velocity,
            max_velocity: stats.max_velocity,
            grid_width: grid.width(),
            grid_height: grid.height(),
            dead_zone_percentage: dead_zones.percentage,
            dead_zones,
            concentration: grid.concentration().as_slice().to_vec(),
            avg_concentration: stats.avg_concentration,
        }
    }

    /// Ventilation score of this snapshot
    pub fn ventilation_score(&self) -> u32 {
        ventilation_score(self.avg_velocity, self.dead_zone_percentage)
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if serialization fails. Non-finite
    /// values from an unstable run are written as `null`.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a result previously produced by [`SimulationResult::to_json`]
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed input.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names() {
        let grid = LatticeGrid::new(3, 2, 1.0);
        let result = SimulationResult::from_grid(&grid, 0.005);
        let json = result.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        for key in [
            "velocityField",
            "avgVelocity",
            "maxVelocity",
            "gridWidth",
            "gridHeight",
            "deadZones",
            "deadZonePercentage",
            "concentration",
            "avgConcentration",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["velocityField"]["ux"].as_array().unwrap().len(), 6);
        assert_eq!(value["velocityField"]["density"][0], 1.0);
        assert_eq!(value["deadZones"]["count"], 6);
        assert_eq!(value["deadZones"]["map"][5], 1);
        assert_eq!(value["gridWidth"], 3);
    }

    #[test]
    fn test_json_parses_back() {
        let grid = LatticeGrid::new(4, 4, 0.25);
        let result = SimulationResult::from_grid(&grid, 0.005);
        let parsed = SimulationResult::from_json(&result.to_json().unwrap()).unwrap();
        assert_eq!(parsed, result);
        assert_eq!(parsed.ventilation_score(), 0);
    }
}
