//! Contaminant concentration transport
//!
//! A semi-Lagrangian scheme: every open cell traces backwards along its
//! local velocity, samples the previous concentration field bilinearly at the
//! source point, then applies decay and sterilization sinks. The update reads
//! only the previous field and writes a fresh buffer.

use super::params::SimulationParams;
use crate::core_types::{CellType, Vec2};
use crate::grid::LatticeGrid;
use rayon::prelude::*;

/// Bilinear sample of a row-major field at a point already clamped to the grid
#[inline]
fn bilinear(field: &[f32], width: usize, height: usize, px: f32, py: f32) -> f32 {
    let x0 = (px.floor() as usize).min(width - 1);
    let y0 = (py.floor() as usize).min(height - 1);
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let sx = px - x0 as f32;
    let sy = py - y0 as f32;

    let c00 = field[y0 * width + x0];
    let c10 = field[y0 * width + x1];
    let c01 = field[y1 * width + x0];
    let c11 = field[y1 * width + x1];

    (1.0 - sx) * (1.0 - sy) * c00 + sx * (1.0 - sy) * c10 + (1.0 - sx) * sy * c01 + sx * sy * c11
}

/// Advance the concentration field by one step.
///
/// Wall cells keep their previous value. For every other cell:
/// 1. back-trace `src = (x, y) − u·K`, clamped to the grid
/// 2. bilinear sample of the previous field at `src`
/// 3. global decay, then the local sterilization sink
/// 4. inlets reset to zero, outlets decay further
/// 5. clamp to `[0, 1]`
///
/// A non-finite velocity (diverged lattice) is treated as zero displacement so
/// the field stays bounded; the instability itself is reported by the
/// simulation's stability scan.
pub fn transport_concentration(grid: &mut LatticeGrid, params: &SimulationParams) {
    let width = grid.width;
    let height = grid.height;
    let max_x = (width - 1) as f32;
    let max_y = (height - 1) as f32;

    let prev: &[f32] = grid.concentration.as_slice();
    let ux: &[f32] = grid.ux.as_slice();
    let uy: &[f32] = grid.uy.as_slice();
    let sterilization: &[f32] = grid.sterilization.as_slice();
    let cell_type: &[CellType] = &grid.cell_type;

    grid.concentration_next
        .data
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, out)| {
            let kind = cell_type[i];
            if kind.is_wall() {
                *out = prev[i];
                return;
            }

            let here = Vec2::new((i % width) as f32, (i / width) as f32);
            let velocity = Vec2::new(ux[i], uy[i]);
            let mut src = here - velocity * params.advection_scale;
            if !(src.x.is_finite() && src.y.is_finite()) {
                src = here;
            }
            let px = src.x.clamp(0.0, max_x);
            let py = src.y.clamp(0.0, max_y);

            let mut c = bilinear(prev, width, height, px, py);
            c *= params.global_decay;
            c *= 1.0 - sterilization[i] * params.sterilization_rate;

            match kind {
                CellType::Inlet => c = 0.0,
                CellType::Outlet => c *= params.outlet_decay,
                _ => {}
            }

            *out = c.clamp(0.0, 1.0);
        });

    grid.swap_concentration();
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bilinear_interpolation() {
        // 2x2 field: [0, 1; 2, 3]
        let field = [0.0, 1.0, 2.0, 3.0];
        assert_abs_diff_eq!(bilinear(&field, 2, 2, 0.0, 0.0), 0.0);
        assert_abs_diff_eq!(bilinear(&field, 2, 2, 1.0, 1.0), 3.0);
        assert_abs_diff_eq!(bilinear(&field, 2, 2, 0.5, 0.5), 1.5);
        assert_abs_diff_eq!(bilinear(&field, 2, 2, 0.5, 0.0), 0.5);
    }

    #[test]
    fn test_still_air_only_decays() {
        let mut grid = LatticeGrid::new(4, 4, 1.0);
        let params = SimulationParams::default();
        transport_concentration(&mut grid, &params);
        for &c in grid.concentration().as_slice() {
            assert_abs_diff_eq!(c, 0.999, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_cell_type_overrides() {
        let mut grid = LatticeGrid::new(4, 4, 1.0);
        let inlet = grid.index(1, 1);
        let outlet = grid.index(2, 2);
        let wall = grid.index(0, 0);
        grid.set_source(inlet, CellType::Inlet, Vec2::zeros());
        grid.set_passive(outlet, CellType::Outlet);
        grid.set_passive(wall, CellType::Wall);

        transport_concentration(&mut grid, &SimulationParams::default());

        let c = grid.concentration().as_slice();
        assert_eq!(c[inlet], 0.0);
        assert_abs_diff_eq!(c[outlet], 0.999 * 0.9, epsilon = 1e-6);
        assert_eq!(c[wall], 1.0);
    }

    #[test]
    fn test_sterilization_sink() {
        let mut grid = LatticeGrid::new(3, 3, 1.0);
        let idx = grid.index(1, 1);
        grid.raise_sterilization(idx, 1.0);
        transport_concentration(&mut grid, &SimulationParams::default());
        assert_abs_diff_eq!(
            grid.concentration().as_slice()[idx],
            0.999 * 0.95,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_back_trace_samples_upstream() {
        // Concentration only in column 0; uniform +x flow of 0.1 traces one cell upstream
        let mut grid = LatticeGrid::new(5, 3, 0.0);
        for y in 0..3 {
            grid.concentration.set(0, y, 1.0);
        }
        grid.ux.fill(0.1);
        let params = SimulationParams {
            global_decay: 1.0,
            ..Default::default()
        };
        transport_concentration(&mut grid, &params);
        let c = grid.concentration();
        assert_abs_diff_eq!(c.get(1, 1), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c.get(2, 1), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_non_finite_velocity_stays_bounded() {
        let mut grid = LatticeGrid::new(3, 3, 0.5);
        grid.ux.fill(f32::NAN);
        grid.uy.fill(f32::INFINITY);
        transport_concentration(&mut grid, &SimulationParams::default());
        for &c in grid.concentration().as_slice() {
            assert!((0.0..=1.0).contains(&c));
        }
    }
}
