//! Pull-scheme streaming with periodic wraparound, and wall bounce-back

use super::d2q9::{EX, EY, OPPOSITE, Q};
use crate::core_types::CellType;
use crate::grid::LatticeGrid;
use rayon::prelude::*;

/// Wrap `coord + offset` onto `[0, len)`
#[inline]
fn wrap(coord: usize, offset: i32, len: usize) -> usize {
    (coord as i64 + i64::from(offset)).rem_euclid(len as i64) as usize
}

/// Stream every distribution one cell along its velocity.
///
/// The value arriving at `(x, y)` in direction `k` is read from
/// `(x − e_x(k), y − e_y(k))` of the front buffer, wrapping at the domain
/// edges. All reads come from the front buffer and all writes go to the back
/// buffer; the buffers are swapped once every cell is done.
pub fn stream(grid: &mut LatticeGrid) {
    let width = grid.width;
    let height = grid.height;
    let src: &[f32] = &grid.f;

    grid.f_next
        .par_chunks_mut(Q)
        .enumerate()
        .for_each(|(i, out)| {
            let x = i % width;
            let y = i / width;
            for k in 0..Q {
                let sx = wrap(x, -EX[k], width);
                let sy = wrap(y, -EY[k], height);
                out[k] = src[(sy * width + sx) * Q + k];
            }
        });

    grid.swap_distributions();
}

/// Reverse the distributions of every Wall cell (no-slip boundary).
///
/// Each `f_k` is exchanged with `f_opp(k)`; the rest population is unchanged.
pub fn bounce_back(grid: &mut LatticeGrid) {
    let cell_type: &[CellType] = &grid.cell_type;

    grid.f
        .par_chunks_mut(Q)
        .zip(cell_type.par_iter())
        .filter(|(_, kind)| kind.is_wall())
        .for_each(|(fi, _)| {
            let original: [f32; Q] = std::array::from_fn(|k| fi[k]);
            for k in 1..Q {
                fi[k] = original[OPPOSITE[k]];
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(0, -1, 5), 4);
        assert_eq!(wrap(4, 1, 5), 0);
        assert_eq!(wrap(2, 0, 5), 2);
    }

    #[test]
    fn test_stream_moves_population_along_velocity() {
        let mut grid = LatticeGrid::new(5, 4, 0.0);
        let idx = grid.index(2, 1);
        grid.distributions_mut(idx)[1] = 0.9; // east
        grid.distributions_mut(idx)[5] = 0.8; // north-east
        stream(&mut grid);

        let east = grid.index(3, 1);
        let north_east = grid.index(3, 2);
        assert_eq!(grid.distributions(east)[1], 0.9);
        assert_eq!(grid.distributions(north_east)[5], 0.8);
        // Origin now holds what its west neighbour had in direction 1
        assert_abs_diff_eq!(grid.distributions(idx)[1], 1.0 / 9.0);
    }

    #[test]
    fn test_stream_wraps_periodically() {
        let mut grid = LatticeGrid::new(4, 3, 0.0);
        let idx = grid.index(3, 2);
        grid.distributions_mut(idx)[5] = 0.5; // north-east, exits the corner
        stream(&mut grid);
        let wrapped = grid.index(0, 0);
        assert_eq!(grid.distributions(wrapped)[5], 0.5);
    }

    #[test]
    fn test_stream_conserves_total_mass() {
        let mut grid = LatticeGrid::new(6, 5, 0.0);
        for i in 0..grid.cell_count() {
            let v = 0.01 * (i % 7) as f32;
            grid.distributions_mut(i)[i % Q] += v;
        }
        let before = grid.total_mass();
        stream(&mut grid);
        assert_abs_diff_eq!(grid.total_mass(), before, epsilon = 1e-9);
    }

    #[test]
    fn test_bounce_back_swaps_exactly() {
        let mut grid = LatticeGrid::new(3, 3, 0.0);
        let wall = grid.index(1, 1);
        grid.set_passive(wall, CellType::Wall);
        let values = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
        grid.distributions_mut(wall).copy_from_slice(&values);
        let open = grid.index(0, 0);
        grid.distributions_mut(open).copy_from_slice(&values);

        bounce_back(&mut grid);

        let fi = grid.distributions(wall);
        for k in 0..Q {
            assert_eq!(fi[k], values[OPPOSITE[k]]);
        }
        // Non-wall cells untouched
        assert_eq!(grid.distributions(open), &values[..]);

        // A second application restores the original ordering
        bounce_back(&mut grid);
        assert_eq!(grid.distributions(wall), &values[..]);
    }
}
