use crate::grid::LatticeGrid;
use serde::{Deserialize, Serialize};

/// Summary statistics of the flow and contaminant fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowStats {
    /// Mean velocity magnitude over non-Wall cells
    pub avg_velocity: f32,
    /// Largest velocity magnitude over all cells
    pub max_velocity: f32,
    /// Mean concentration over non-Wall cells
    pub avg_concentration: f32,
    /// Number of non-Wall cells
    pub open_cells: usize,
}

impl FlowStats {
    /// Reduce the grid sequentially so sums do not depend on thread count
    pub fn compute(grid: &LatticeGrid) -> Self {
        let ux = grid.ux().as_slice();
        let uy = grid.uy().as_slice();
        let concentration = grid.concentration().as_slice();

        let mut velocity_sum = 0.0_f64;
        let mut concentration_sum = 0.0_f64;
        let mut max_velocity = 0.0_f32;
        let mut open_cells = 0_usize;

        for (i, kind) in grid.cell_types().iter().enumerate() {
            let speed = (ux[i] * ux[i] + uy[i] * uy[i]).sqrt();
            max_velocity = max_velocity.max(speed);
            if kind.is_wall() {
                continue;
            }
            open_cells += 1;
            velocity_sum += f64::from(speed);
            concentration_sum += f64::from(concentration[i]);
        }

        if open_cells == 0 {
            return Self {
                max_velocity,
                ..Self::default()
            };
        }

        let n = open_cells as f64;
        Self {
            avg_velocity: (velocity_sum / n) as f32,
            max_velocity,
            avg_concentration: (concentration_sum / n) as f32,
            open_cells,
        }
    }
}
