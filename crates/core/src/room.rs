//! Room geometry to grid configuration
//!
//! A scanned room is described top-down in metres: `x` across the width and
//! `z` across the depth, with openings and devices placed on that plane.
//! [`RoomLayout::to_config`] rasterizes it onto a lattice whose longer side
//! has `resolution` cells, wraps it in a wall ring, and returns an ordinary
//! [`SimulationConfig`].

use crate::config::{
    AcUnitSpec, InletSpec, OutletSpec, RadialDeviceSpec, SimulationConfig, VentilatorSpec,
};
use crate::core_types::{CubicMetersPerHour, Meters};
use crate::devices::DeviceKind;
use crate::diagnostics::PlacementSuggestion;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Cells along the longer room dimension unless the caller asks otherwise
pub const DEFAULT_RESOLUTION: usize = 128;

/// Physical opening velocity (m/s) to lattice velocity
pub const INLET_VELOCITY_SCALE: f32 = 0.1;

/// Airflow through an opening when none was measured (m/s)
pub const DEFAULT_OPENING_VELOCITY: f32 = 0.5;

/// Device radius used when none is given
pub const DEFAULT_DEVICE_RADIUS: Meters = Meters::new(1.0);

fn default_velocity() -> f32 {
    DEFAULT_OPENING_VELOCITY
}

fn default_true() -> bool {
    true
}

/// Top-down footprint of a room
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomBounds {
    pub min_x: f32,
    pub min_z: f32,
    pub width: f32,
    pub depth: f32,
}

impl RoomBounds {
    /// Footprint anchored at the origin
    pub fn new(width: f32, depth: f32) -> Self {
        Self {
            min_x: 0.0,
            min_z: 0.0,
            width,
            depth,
        }
    }

    /// Floor area in m²
    pub fn area(&self) -> f32 {
        self.width * self.depth
    }

    /// # Errors
    ///
    /// [`ConfigError::InvalidRoomDimensions`] unless both extents are finite
    /// and positive, [`ConfigError::NonFinite`] for a non-finite origin.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !(valid(self.width) && valid(self.depth)) {
            return Err(ConfigError::InvalidRoomDimensions {
                width: self.width,
                depth: self.depth,
            });
        }
        for (field, value) in [("room.minX", self.min_x), ("room.minZ", self.min_z)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite {
                    field: field.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Grid size giving the longer dimension `resolution` cells
    pub fn grid_size(&self, resolution: usize) -> (usize, usize) {
        let scaled = |num: f32, den: f32| ((resolution as f32 * num / den) as usize).max(1);
        if self.width >= self.depth {
            (resolution, scaled(self.depth, self.width))
        } else {
            (scaled(self.width, self.depth), resolution)
        }
    }
}

/// What an entry of a room layout is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpeningKind {
    Door,
    Window,
    Vent,
    AcUnit,
    Ventilator,
    AirPurifier,
    AirSterilizer,
}

impl OpeningKind {
    /// Passive opening in the room shell
    pub fn is_opening(self) -> bool {
        matches!(self, Self::Door | Self::Window | Self::Vent)
    }

    /// Powered device with an airflow rating
    pub fn is_device(self) -> bool {
        !self.is_opening()
    }

    /// Matching device kind for powered entries
    pub fn device_kind(self) -> Option<DeviceKind> {
        match self {
            Self::AcUnit => Some(DeviceKind::AcUnit),
            Self::Ventilator => Some(DeviceKind::Ventilator),
            Self::AirPurifier => Some(DeviceKind::Purifier),
            Self::AirSterilizer => Some(DeviceKind::Sterilizer),
            Self::Door | Self::Window | Self::Vent => None,
        }
    }

    /// Rated airflow assumed when the entry has none
    pub fn default_cmh(self) -> CubicMetersPerHour {
        self.device_kind()
            .map_or(CubicMetersPerHour::ZERO, DeviceKind::default_cmh)
    }
}

/// One opening or device, in room coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOpening {
    pub kind: OpeningKind,
    pub x: f32,
    pub z: f32,
    /// Extent along x (m)
    #[serde(default)]
    pub width: f32,
    /// Extent along z in the top-down projection (m)
    #[serde(default)]
    pub height: f32,
    /// Measured airflow through an opening (m/s)
    #[serde(default = "default_velocity")]
    pub velocity: f32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Device airflow; the kind's default when absent
    #[serde(default)]
    pub cmh: Option<f32>,
    /// Device reach: AC spread, purifier/sterilizer radius (m)
    #[serde(default)]
    pub radius: Option<f32>,
    /// Ventilator jet direction on the floor plane
    #[serde(default)]
    pub direction: Option<[f32; 2]>,
}

impl RoomOpening {
    /// Active opening of the given kind and rectangle
    pub fn opening(kind: OpeningKind, x: f32, z: f32, width: f32, height: f32) -> Self {
        Self {
            kind,
            x,
            z,
            width,
            height,
            velocity: DEFAULT_OPENING_VELOCITY,
            is_active: true,
            cmh: None,
            radius: None,
            direction: None,
        }
    }

    /// Active device at a point with default rating
    pub fn device(kind: OpeningKind, x: f32, z: f32) -> Self {
        Self::opening(kind, x, z, 0.0, 0.0)
    }

    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_cmh(mut self, cmh: f32) -> Self {
        self.cmh = Some(cmh);
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_direction(mut self, dx: f32, dz: f32) -> Self {
        self.direction = Some([dx, dz]);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    fn cmh(&self) -> f32 {
        self.cmh.unwrap_or_else(|| self.kind.default_cmh().value())
    }
}

/// A room with its openings and devices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomLayout {
    pub bounds: RoomBounds,
    #[serde(default)]
    pub inlets: Vec<RoomOpening>,
    #[serde(default)]
    pub outlets: Vec<RoomOpening>,
    #[serde(default)]
    pub devices: Vec<RoomOpening>,
}

/// Room-to-grid scale for one rasterization
struct Raster {
    bounds: RoomBounds,
    grid_width: usize,
    grid_height: usize,
}

impl Raster {
    fn cell_x(&self, x: f32) -> i64 {
        ((x - self.bounds.min_x) / self.bounds.width * self.grid_width as f32).floor() as i64
    }

    fn cell_y(&self, z: f32) -> i64 {
        ((z - self.bounds.min_z) / self.bounds.depth * self.grid_height as f32).floor() as i64
    }

    fn span_x(&self, w: f32) -> u32 {
        ((w / self.bounds.width * self.grid_width as f32) as u32).max(1)
    }

    fn span_y(&self, h: f32) -> u32 {
        ((h / self.bounds.depth * self.grid_height as f32) as u32).max(1)
    }

    /// Metres to cells along x, at least one
    fn cells(&self, length: f32) -> f32 {
        (length / self.bounds.width * self.grid_width as f32)
            .round()
            .max(1.0)
    }
}

impl RoomLayout {
    pub fn new(bounds: RoomBounds) -> Self {
        Self {
            bounds,
            inlets: Vec::new(),
            outlets: Vec::new(),
            devices: Vec::new(),
        }
    }

    pub fn with_inlet(mut self, opening: RoomOpening) -> Self {
        self.inlets.push(opening);
        self
    }

    pub fn with_outlet(mut self, opening: RoomOpening) -> Self {
        self.outlets.push(opening);
        self
    }

    pub fn with_device(mut self, device: RoomOpening) -> Self {
        self.devices.push(device);
        self
    }

    /// Add one sterilizer per suggestion, at default rating
    pub fn with_suggested_sterilizers(mut self, placements: &[PlacementSuggestion]) -> Self {
        let (min_x, min_z) = (self.bounds.min_x, self.bounds.min_z);
        self.devices.extend(placements.iter().map(|p| {
            RoomOpening::device(OpeningKind::AirSterilizer, min_x + p.x, min_z + p.z)
        }));
        self
    }

    /// Rasterize onto a grid whose longer side has `resolution` cells.
    ///
    /// # Errors
    ///
    /// Invalid room bounds, a zero resolution, or anything
    /// [`SimulationConfig::validate`] rejects in the produced config.
    pub fn to_config(&self, resolution: usize) -> Result<SimulationConfig, ConfigError> {
        self.bounds.validate()?;
        if resolution == 0 {
            return Err(ConfigError::InvalidGridDimensions {
                width: 0,
                height: 0,
            });
        }

        let (grid_width, grid_height) = self.bounds.grid_size(resolution);
        let raster = Raster {
            bounds: self.bounds,
            grid_width,
            grid_height,
        };
        let mut config = SimulationConfig::new(grid_width, grid_height).with_boundary_ring();

        for o in self.inlets.iter().filter(|o| o.is_active) {
            config.inlets.push(InletSpec {
                x: raster.cell_x(o.x),
                y: raster.cell_y(o.z),
                w: raster.span_x(o.width),
                h: raster.span_y(o.height),
                vx: o.velocity * INLET_VELOCITY_SCALE,
                vy: 0.0,
            });
        }
        for o in self.outlets.iter().filter(|o| o.is_active) {
            config.outlets.push(OutletSpec {
                x: raster.cell_x(o.x),
                y: raster.cell_y(o.z),
                w: raster.span_x(o.width),
                h: raster.span_y(o.height),
            });
        }

        for d in self.devices.iter().filter(|d| d.is_active) {
            let x = raster.cell_x(d.x);
            let y = raster.cell_y(d.z);
            let cmh = d.cmh();
            let reach = raster.cells(d.radius.unwrap_or(DEFAULT_DEVICE_RADIUS.value()));

            match d.kind.device_kind() {
                Some(DeviceKind::AcUnit) => config.ac_units.push(AcUnitSpec {
                    x,
                    y,
                    cmh,
                    spread_radius: reach as u32,
                }),
                Some(DeviceKind::Ventilator) => {
                    let [dir_x, dir_y] = d.direction.unwrap_or([1.0, 0.0]);
                    config.ventilators.push(VentilatorSpec {
                        x,
                        y,
                        cmh,
                        dir_x,
                        dir_y,
                    });
                }
                Some(DeviceKind::Purifier) => config.purifiers.push(RadialDeviceSpec {
                    x,
                    y,
                    cmh,
                    radius: reach,
                }),
                Some(DeviceKind::Sterilizer) => config.sterilizers.push(RadialDeviceSpec {
                    x,
                    y,
                    cmh,
                    radius: reach,
                }),
                _ => {
                    warn!("Ignoring {:?} in device list: not a powered device", d.kind);
                }
            }
        }

        debug!(
            "Rasterized {:.2}x{:.2} m room to {}x{} grid",
            self.bounds.width, self.bounds.depth, grid_width, grid_height
        );

        config.validate()?;
        Ok(config)
    }
}
