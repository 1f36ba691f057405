//! Simulation setup input
//!
//! [`SimulationConfig`] is the structured configuration a caller hands to the
//! simulator: grid dimensions plus lists of walls, openings and devices, all
//! in grid coordinates. It round-trips through JSON with the field names the
//! host application uses (`gridWidth`, `acUnits`, `spreadRadius`, ...).
//!
//! Coordinates are signed so a caller can describe placements partly outside
//! the grid; out-of-range cells are clipped silently at setup.

use crate::error::ConfigError;
use crate::solver::SimulationParams;
use serde::{Deserialize, Serialize};
use std::ops::Range;

fn one() -> u32 {
    1
}

/// Axis-aligned rectangle of grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub x: i64,
    pub y: i64,
    pub w: u32,
    pub h: u32,
}

impl GridRect {
    /// Covered `(x, y)` inside a `width × height` grid, row by row.
    ///
    /// The rectangle is intersected with the grid first, so the walk never
    /// exceeds the grid's cell count however large or distant the rectangle.
    pub fn cells_within(&self, width: usize, height: usize) -> impl Iterator<Item = (i64, i64)> {
        let xs = clip_span(self.x, self.w, width);
        let ys = clip_span(self.y, self.h, height);
        ys.flat_map(move |y| xs.clone().map(move |x| (x, y)))
    }
}

/// `[start, start + len) ∩ [0, limit)`
fn clip_span(start: i64, len: u32, limit: usize) -> Range<i64> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    start.max(0)..start.saturating_add(i64::from(len)).min(limit)
}

/// Wall rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: i64,
    pub y: i64,
    #[serde(default = "one", alias = "width")]
    pub w: u32,
    #[serde(default = "one", alias = "height")]
    pub h: u32,
}

impl Obstacle {
    /// Covered cells
    pub fn rect(&self) -> GridRect {
        GridRect {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

/// Fresh-air opening with a prescribed velocity (lattice units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InletSpec {
    pub x: i64,
    pub y: i64,
    #[serde(default = "one", alias = "width")]
    pub w: u32,
    #[serde(default = "one", alias = "height")]
    pub h: u32,
    #[serde(alias = "velocityX")]
    pub vx: f32,
    #[serde(alias = "velocityY")]
    pub vy: f32,
}

impl InletSpec {
    /// Covered cells
    pub fn rect(&self) -> GridRect {
        GridRect {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

/// Passive exhaust opening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutletSpec {
    pub x: i64,
    pub y: i64,
    #[serde(default = "one", alias = "width")]
    pub w: u32,
    #[serde(default = "one", alias = "height")]
    pub h: u32,
}

impl OutletSpec {
    /// Covered cells
    pub fn rect(&self) -> GridRect {
        GridRect {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

/// Air conditioner discharging along the four cardinal rays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcUnitSpec {
    pub x: i64,
    pub y: i64,
    pub cmh: f32,
    pub spread_radius: u32,
}

/// Disk-shaped device (purifier or sterilizer)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialDeviceSpec {
    pub x: i64,
    pub y: i64,
    pub cmh: f32,
    pub radius: f32,
}

/// Directional ventilator jet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VentilatorSpec {
    pub x: i64,
    pub y: i64,
    pub cmh: f32,
    pub dir_x: f32,
    pub dir_y: f32,
}

/// Complete setup input for one simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    pub grid_width: usize,
    pub grid_height: usize,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub inlets: Vec<InletSpec>,
    #[serde(default)]
    pub outlets: Vec<OutletSpec>,
    #[serde(default)]
    pub ac_units: Vec<AcUnitSpec>,
    #[serde(default)]
    pub sterilizers: Vec<RadialDeviceSpec>,
    #[serde(default)]
    pub purifiers: Vec<RadialDeviceSpec>,
    #[serde(default)]
    pub ventilators: Vec<VentilatorSpec>,
    #[serde(default)]
    pub params: SimulationParams,
}

impl SimulationConfig {
    /// Empty grid of the given size with default parameters
    pub fn new(grid_width: usize, grid_height: usize) -> Self {
        Self {
            grid_width,
            grid_height,
            obstacles: Vec::new(),
            inlets: Vec::new(),
            outlets: Vec::new(),
            ac_units: Vec::new(),
            sterilizers: Vec::new(),
            purifiers: Vec::new(),
            ventilators: Vec::new(),
            params: SimulationParams::default(),
        }
    }

    /// Add a one-cell Wall ring around the domain (suppresses periodic wrap)
    pub fn with_boundary_ring(mut self) -> Self {
        let (w, h) = (self.grid_width as u32, self.grid_height as u32);
        let bottom = self.grid_height as i64 - 1;
        let right = self.grid_width as i64 - 1;
        self.obstacles.extend([
            Obstacle { x: 0, y: 0, w, h: 1 },
            Obstacle { x: 0, y: bottom, w, h: 1 },
            Obstacle { x: 0, y: 0, w: 1, h },
            Obstacle { x: right, y: 0, w: 1, h },
        ]);
        self
    }

    /// Add a wall rectangle
    pub fn with_obstacle(mut self, x: i64, y: i64, w: u32, h: u32) -> Self {
        self.obstacles.push(Obstacle { x, y, w, h });
        self
    }

    /// Add a single-cell inlet
    pub fn with_inlet(mut self, x: i64, y: i64, vx: f32, vy: f32) -> Self {
        self.inlets.push(InletSpec {
            x,
            y,
            w: 1,
            h: 1,
            vx,
            vy,
        });
        self
    }

    /// Add a single-cell outlet
    pub fn with_outlet(mut self, x: i64, y: i64) -> Self {
        self.outlets.push(OutletSpec { x, y, w: 1, h: 1 });
        self
    }

    /// Add an air conditioner
    pub fn with_ac_unit(mut self, x: i64, y: i64, cmh: f32, spread_radius: u32) -> Self {
        self.ac_units.push(AcUnitSpec {
            x,
            y,
            cmh,
            spread_radius,
        });
        self
    }

    /// Add a ventilator
    pub fn with_ventilator(mut self, x: i64, y: i64, cmh: f32, dir_x: f32, dir_y: f32) -> Self {
        self.ventilators.push(VentilatorSpec {
            x,
            y,
            cmh,
            dir_x,
            dir_y,
        });
        self
    }

    /// Add an air purifier
    pub fn with_purifier(mut self, x: i64, y: i64, cmh: f32, radius: f32) -> Self {
        self.purifiers.push(RadialDeviceSpec { x, y, cmh, radius });
        self
    }

    /// Add an air sterilizer
    pub fn with_sterilizer(mut self, x: i64, y: i64, cmh: f32, radius: f32) -> Self {
        self.sterilizers.push(RadialDeviceSpec { x, y, cmh, radius });
        self
    }

    /// Replace the run parameters
    pub fn with_params(mut self, params: SimulationParams) -> Self {
        self.params = params;
        self
    }

    /// Parse a config from JSON
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed input, or any validation
    /// error from [`SimulationConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check the configuration before any cell is touched
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidGridDimensions`] for a zero-sized grid
    /// - [`ConfigError::InvalidRadius`] for a sterilizer/purifier radius ≤ 0
    /// - [`ConfigError::InvalidSpreadRadius`] for an AC spread radius of 0
    /// - [`ConfigError::ZeroDirection`] for a ventilator without direction
    /// - [`ConfigError::NonFinite`] for NaN/Inf velocities or flow rates
    /// - parameter errors from [`SimulationParams::validate`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::InvalidGridDimensions {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        for (i, inlet) in self.inlets.iter().enumerate() {
            check_finite(&format!("inlets[{i}].vx"), inlet.vx)?;
            check_finite(&format!("inlets[{i}].vy"), inlet.vy)?;
        }

        for (i, ac) in self.ac_units.iter().enumerate() {
            check_finite(&format!("acUnits[{i}].cmh"), ac.cmh)?;
            if ac.spread_radius == 0 {
                return Err(ConfigError::InvalidSpreadRadius { index: i });
            }
        }

        for (i, vent) in self.ventilators.iter().enumerate() {
            check_finite(&format!("ventilators[{i}].cmh"), vent.cmh)?;
            let len = vent.dir_x.hypot(vent.dir_y);
            if !len.is_finite() || len == 0.0 {
                return Err(ConfigError::ZeroDirection { index: i });
            }
        }

        for (device, list) in [("purifier", &self.purifiers), ("sterilizer", &self.sterilizers)] {
            for (i, spec) in list.iter().enumerate() {
                check_finite(&format!("{device}s[{i}].cmh"), spec.cmh)?;
                if !spec.radius.is_finite() || spec.radius <= 0.0 {
                    return Err(ConfigError::InvalidRadius {
                        device,
                        index: i,
                        radius: spec.radius,
                    });
                }
            }
        }

        self.params.validate()
    }
}

fn check_finite(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite {
            field: field.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_cells_clip_to_grid() {
        let rect = GridRect {
            x: -1,
            y: 2,
            w: 3,
            h: 2,
        };
        let cells: Vec<_> = rect.cells_within(8, 3).collect();
        assert_eq!(cells, vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn test_rect_cells_with_extreme_extents() {
        let far = GridRect {
            x: i64::MAX,
            y: 0,
            w: 2,
            h: 1,
        };
        assert_eq!(far.cells_within(4, 4).count(), 0);

        let below = GridRect {
            x: i64::MIN,
            y: i64::MIN,
            w: u32::MAX,
            h: u32::MAX,
        };
        assert_eq!(below.cells_within(4, 4).count(), 0);

        let huge = GridRect {
            x: -5000,
            y: -5000,
            w: u32::MAX,
            h: u32::MAX,
        };
        let cells: Vec<_> = huge.cells_within(4, 4).collect();
        assert_eq!(cells.len(), 16);
        assert_eq!(cells.first(), Some(&(0, 0)));
        assert_eq!(cells.last(), Some(&(3, 3)));
    }

    #[test]
    fn test_boundary_ring_covers_edges() {
        let config = SimulationConfig::new(5, 4).with_boundary_ring();
        let mut walls = std::collections::HashSet::new();
        for o in &config.obstacles {
            walls.extend(o.rect().cells_within(5, 4));
        }
        assert_eq!(walls.len(), 2 * 5 + 2 * 4 - 4);
        assert!(walls.contains(&(4, 3)));
        assert!(!walls.contains(&(2, 2)));
    }

    #[test]
    fn test_json_field_names() {
        let json = r#"{
            "gridWidth": 20,
            "gridHeight": 10,
            "obstacles": [{"x": 0, "y": 0, "width": 20, "height": 1}],
            "inlets": [{"x": 0, "y": 5, "w": 1, "h": 1, "velocityX": 0.1, "velocityY": 0.0}],
            "acUnits": [{"x": 4, "y": 4, "cmh": 300, "spreadRadius": 3}],
            "ventilators": [{"x": 2, "y": 2, "cmh": 200, "dirX": 1, "dirY": 0}]
        }"#;
        let config = SimulationConfig::from_json(json).unwrap();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.obstacles[0].w, 20);
        assert_eq!(config.inlets[0].vx, 0.1);
        assert_eq!(config.ac_units[0].spread_radius, 3);
        assert_eq!(config.ventilators[0].dir_x, 1.0);
        assert!(config.outlets.is_empty());
        assert_eq!(config.params, SimulationParams::default());

        let out = config.to_json().unwrap();
        assert!(out.contains("\"gridWidth\":20"));
        assert!(out.contains("\"spreadRadius\":3"));
    }

    #[test]
    fn test_zero_radius_rejected() {
        let config = SimulationConfig::new(10, 10).with_sterilizer(5, 5, 150.0, 0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRadius {
                device: "sterilizer",
                index: 0,
                ..
            })
        ));

        let config = SimulationConfig::new(10, 10).with_purifier(5, 5, 150.0, -2.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRadius {
                device: "purifier",
                ..
            })
        ));
    }

    #[test]
    fn test_other_validation_errors() {
        assert!(matches!(
            SimulationConfig::new(0, 10).validate(),
            Err(ConfigError::InvalidGridDimensions { .. })
        ));
        assert!(matches!(
            SimulationConfig::new(10, 10)
                .with_ac_unit(1, 1, 300.0, 0)
                .validate(),
            Err(ConfigError::InvalidSpreadRadius { index: 0 })
        ));
        assert!(matches!(
            SimulationConfig::new(10, 10)
                .with_ventilator(1, 1, 200.0, 0.0, 0.0)
                .validate(),
            Err(ConfigError::ZeroDirection { index: 0 })
        ));
        assert!(matches!(
            SimulationConfig::new(10, 10)
                .with_inlet(1, 1, f32::NAN, 0.0)
                .validate(),
            Err(ConfigError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SimulationConfig::from_json("{\"gridWidth\": 3"),
            Err(ConfigError::Json(_))
        ));
    }
}
