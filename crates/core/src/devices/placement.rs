//! Setup-time placement of walls, openings and devices onto the grid
//!
//! Placement writes cell tags, pinned velocities and sterilization effect
//! directly into the [`LatticeGrid`]. Target cells outside the grid are
//! skipped silently. Every function returns the number of cells it tagged.

use super::constants::{
    AC_AREA_FACTOR, AC_RAY_SCALE, DISK_AREA_FACTOR, PURIFIER_SWIRL_SCALE, STERILIZER_CORE_RATIO,
    VENTILATOR_LENGTH,
};
use crate::config::{AcUnitSpec, InletSpec, Obstacle, OutletSpec, RadialDeviceSpec, VentilatorSpec};
use crate::core_types::{CellType, CubicMetersPerHour, Vec2};
use crate::grid::LatticeGrid;
use std::f32::consts::{FRAC_PI_2, PI};
use std::ops::RangeInclusive;

/// Discharge speed of an AC unit: `cmh / (3600 · spreadRadius · 0.01)`
#[must_use]
pub fn ac_speed(cmh: f32, spread_radius: u32) -> f32 {
    CubicMetersPerHour::new(cmh).per_second() / (spread_radius as f32 * AC_AREA_FACTOR)
}

/// Jet speed of a ventilator: `cmh / 3600`
#[must_use]
pub fn ventilator_speed(cmh: f32) -> f32 {
    CubicMetersPerHour::new(cmh).per_second()
}

/// Characteristic speed of a disk device: `cmh / (3600 · π r² · 0.01)`
#[must_use]
pub fn disk_speed(cmh: f32, radius: f32) -> f32 {
    CubicMetersPerHour::new(cmh).per_second() / (PI * radius * radius * DISK_AREA_FACTOR)
}

/// `[center − reach, center + reach] ∩ [0, limit)`
fn clip_reach(center: i64, reach: i64, limit: usize) -> RangeInclusive<i64> {
    let last = i64::try_from(limit).unwrap_or(i64::MAX) - 1;
    center.saturating_sub(reach).max(0)..=center.saturating_add(reach).min(last)
}

/// In-grid cells of a disk around `(cx, cy)` with offset and distance (`dist ≤ radius`).
///
/// Only the part of the bounding box inside `width × height` is visited.
fn disk_cells(
    (width, height): (usize, usize),
    cx: i64,
    cy: i64,
    radius: f32,
) -> impl Iterator<Item = (i64, i64, Vec2, f32)> {
    let reach = radius.ceil() as i64;
    let xs = clip_reach(cx, reach, width);
    let ys = clip_reach(cy, reach, height);
    ys.flat_map(move |y| {
        xs.clone().filter_map(move |x| {
            let offset = Vec2::new((x - cx) as f32, (y - cy) as f32);
            let dist = offset.norm();
            (dist <= radius).then_some((x, y, offset, dist))
        })
    })
}

/// Ray distances `1..=reach` that keep `origin + sign·d` inside `[0, limit)`
fn ray_distances(origin: i64, sign: i64, reach: u32, limit: usize) -> RangeInclusive<i64> {
    let last = i64::try_from(limit).unwrap_or(i64::MAX) - 1;
    let (lo, hi) = if sign > 0 {
        (origin.saturating_neg(), last.saturating_sub(origin))
    } else {
        (origin.saturating_sub(last), origin)
    };
    lo.max(1)..=hi.min(i64::from(reach))
}

/// Mark every cell of an obstacle rectangle as Wall
pub fn place_obstacle(grid: &mut LatticeGrid, obstacle: &Obstacle) -> usize {
    let mut placed = 0;
    for (x, y) in obstacle.rect().cells_within(grid.width(), grid.height()) {
        if let Some(idx) = grid.checked_index(x, y) {
            grid.set_passive(idx, CellType::Wall);
            placed += 1;
        }
    }
    placed
}

/// Tag an inlet rectangle with its prescribed velocity.
///
/// Inlets are explicit placements and overwrite whatever tag the cell had.
pub fn place_inlet(grid: &mut LatticeGrid, inlet: &InletSpec) -> usize {
    let velocity = Vec2::new(inlet.vx, inlet.vy);
    let mut placed = 0;
    for (x, y) in inlet.rect().cells_within(grid.width(), grid.height()) {
        if let Some(idx) = grid.checked_index(x, y) {
            grid.set_source(idx, CellType::Inlet, velocity);
            placed += 1;
        }
    }
    placed
}

/// Tag an outlet rectangle (passive, no velocity)
pub fn place_outlet(grid: &mut LatticeGrid, outlet: &OutletSpec) -> usize {
    let mut placed = 0;
    for (x, y) in outlet.rect().cells_within(grid.width(), grid.height()) {
        if let Some(idx) = grid.checked_index(x, y) {
            grid.set_passive(idx, CellType::Outlet);
            placed += 1;
        }
    }
    placed
}

/// Spread an AC unit along the four cardinal rays.
///
/// Cells at distance `1..=spreadRadius` along ±x and ±y are tagged if they are
/// still Empty; each gets `ray direction × speed × 0.25`.
pub fn place_ac_unit(grid: &mut LatticeGrid, ac: &AcUnitSpec) -> usize {
    const RAYS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

    let speed = ac_speed(ac.cmh, ac.spread_radius);
    let mut placed = 0;
    for (dx, dy) in RAYS {
        let velocity = Vec2::new(dx as f32, dy as f32) * speed * AC_RAY_SCALE;
        let distances = if dx == 0 {
            ray_distances(ac.y, dy, ac.spread_radius, grid.height())
        } else {
            ray_distances(ac.x, dx, ac.spread_radius, grid.width())
        };
        for d in distances {
            let Some(idx) = grid.checked_index(ac.x + dx * d, ac.y + dy * d) else {
                continue;
            };
            if grid.cell_type(idx).is_empty() {
                grid.set_source(idx, CellType::Ac, velocity);
                placed += 1;
            }
        }
    }
    placed
}

/// Lay a ventilator jet of five cells along its normalized direction.
///
/// Cells are `origin + round(d̂ · i)` for `i = 0..5`, Empty cells only; each
/// gets `d̂ × cmh / 3600`. A zero direction places nothing.
pub fn place_ventilator(grid: &mut LatticeGrid, vent: &VentilatorSpec) -> usize {
    let direction = Vec2::new(vent.dir_x, vent.dir_y);
    let Some(unit) = direction.try_normalize(f32::EPSILON) else {
        return 0;
    };
    let velocity = unit * ventilator_speed(vent.cmh);

    let mut placed = 0;
    for i in 0..VENTILATOR_LENGTH {
        let step = unit * i as f32;
        let (Some(x), Some(y)) = (
            vent.x.checked_add(step.x.round() as i64),
            vent.y.checked_add(step.y.round() as i64),
        ) else {
            continue;
        };
        let Some(idx) = grid.checked_index(x, y) else {
            continue;
        };
        if grid.cell_type(idx).is_empty() {
            grid.set_source(idx, CellType::Ventilator, velocity);
            placed += 1;
        }
    }
    placed
}

/// Fill a purifier disk (center excluded) with a tangential swirl.
///
/// Each Empty cell within `radius` gets velocity at the local radial angle
/// plus 90°, magnitude `disk_speed × 0.3`.
pub fn place_purifier(grid: &mut LatticeGrid, purifier: &RadialDeviceSpec) -> usize {
    if purifier.radius <= 0.0 {
        return 0;
    }
    let speed = disk_speed(purifier.cmh, purifier.radius) * PURIFIER_SWIRL_SCALE;

    let mut placed = 0;
    let bounds = (grid.width(), grid.height());
    for (x, y, offset, dist) in disk_cells(bounds, purifier.x, purifier.y, purifier.radius) {
        if dist == 0.0 {
            continue;
        }
        let Some(idx) = grid.checked_index(x, y) else {
            continue;
        };
        if !grid.cell_type(idx).is_empty() {
            continue;
        }
        let angle = offset.y.atan2(offset.x) + FRAC_PI_2;
        grid.set_source(
            idx,
            CellType::Purifier,
            Vec2::new(angle.cos(), angle.sin()) * speed,
        );
        placed += 1;
    }
    placed
}

/// Place a sterilizer disk.
///
/// Over the whole disk the sterilization effect is raised to
/// `1 − dist/radius`, whatever the cell's tag. Inside half the radius every
/// non-Wall cell becomes a Sterilizer pushing radially outward at
/// `disk_speed`; the center cell gets zero velocity.
pub fn place_sterilizer(grid: &mut LatticeGrid, sterilizer: &RadialDeviceSpec) -> usize {
    if sterilizer.radius <= 0.0 {
        return 0;
    }
    let speed = disk_speed(sterilizer.cmh, sterilizer.radius);
    let core_radius = sterilizer.radius * STERILIZER_CORE_RATIO;

    let mut placed = 0;
    let bounds = (grid.width(), grid.height());
    for (x, y, offset, dist) in disk_cells(bounds, sterilizer.x, sterilizer.y, sterilizer.radius) {
        let Some(idx) = grid.checked_index(x, y) else {
            continue;
        };
        grid.raise_sterilization(idx, 1.0 - dist / sterilizer.radius);

        if dist < core_radius && !grid.cell_type(idx).is_wall() {
            let direction = if dist > 0.0 {
                offset / dist
            } else {
                Vec2::zeros()
            };
            grid.set_source(idx, CellType::Sterilizer, direction * speed);
            placed += 1;
        }
    }
    placed
}
