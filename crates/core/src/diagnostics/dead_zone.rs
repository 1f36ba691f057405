//! Stagnant-air detection

use crate::grid::LatticeGrid;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Cells whose velocity magnitude falls below the stagnation threshold.
///
/// Wall cells are never dead and are excluded from the percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadZoneMap {
    /// Row-major 0/1 flags, one per cell
    pub map: Vec<u8>,
    /// Number of dead cells
    pub count: usize,
    /// `count / non-Wall cells × 100`, zero when the grid is all walls
    pub percentage: f32,
}

impl DeadZoneMap {
    /// Classify every non-Wall cell of `grid`
    pub fn detect(grid: &LatticeGrid, threshold: f32) -> Self {
        let ux = grid.ux().as_slice();
        let uy = grid.uy().as_slice();
        let cell_types = grid.cell_types();

        let map: Vec<u8> = (0..grid.cell_count())
            .into_par_iter()
            .map(|i| {
                if cell_types[i].is_wall() {
                    return 0;
                }
                let speed = (ux[i] * ux[i] + uy[i] * uy[i]).sqrt();
                u8::from(speed < threshold)
            })
            .collect();

        let count = map.iter().filter(|&&d| d == 1).count();
        let open = grid.open_cell_count();
        let percentage = if open == 0 {
            0.0
        } else {
            count as f32 / open as f32 * 100.0
        };

        Self {
            map,
            count,
            percentage,
        }
    }

    /// Whether cell `idx` is dead
    pub fn is_dead(&self, idx: usize) -> bool {
        self.map[idx] == 1
    }

    /// Dead fraction in `[0, 1]`
    pub fn ratio(&self) -> f32 {
        self.percentage / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{CellType, Vec2};

    #[test]
    fn test_still_grid_is_all_dead() {
        let grid = LatticeGrid::new(6, 4, 1.0);
        let dz = DeadZoneMap::detect(&grid, 0.005);
        assert_eq!(dz.count, 24);
        assert_eq!(dz.percentage, 100.0);
        assert!(dz.is_dead(0));
    }

    #[test]
    fn test_walls_are_excluded() {
        let mut grid = LatticeGrid::new(4, 1, 1.0);
        grid.set_passive(0, CellType::Wall);
        grid.set_source(1, CellType::Inlet, Vec2::new(0.1, 0.0));
        let dz = DeadZoneMap::detect(&grid, 0.005);
        assert_eq!(dz.map, vec![0, 0, 1, 1]);
        assert_eq!(dz.count, 2);
        assert!((dz.percentage - 200.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_all_walls_reports_zero() {
        let mut grid = LatticeGrid::new(2, 2, 1.0);
        for i in 0..4 {
            grid.set_passive(i, CellType::Wall);
        }
        let dz = DeadZoneMap::detect(&grid, 0.005);
        assert_eq!(dz.count, 0);
        assert_eq!(dz.percentage, 0.0);
    }
}
