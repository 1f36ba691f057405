//! BGK collision with Dirichlet velocity forcing on source cells

use super::d2q9::{equilibrium, moments, Q};
use crate::core_types::CellType;
use crate::grid::LatticeGrid;
use rayon::prelude::*;

/// Relax every non-Wall cell toward its local equilibrium.
///
/// Density and velocity are taken from the moments of `f`; source cells
/// (inlets and devices) replace the velocity with their pinned value before
/// relaxing. The resulting ρ and u are written back to the macroscopic fields.
/// Wall cells are left untouched.
pub fn collide(grid: &mut LatticeGrid, omega: f32) {
    let LatticeGrid {
        f,
        density,
        ux,
        uy,
        cell_type,
        pinned_ux,
        pinned_uy,
        ..
    } = grid;
    let cell_type: &[CellType] = cell_type;
    let pinned_ux: &[f32] = pinned_ux.as_slice();
    let pinned_uy: &[f32] = pinned_uy.as_slice();

    f.par_chunks_mut(Q)
        .zip(density.data.par_iter_mut())
        .zip(ux.data.par_iter_mut())
        .zip(uy.data.par_iter_mut())
        .enumerate()
        .for_each(|(i, (((fi, rho_out), ux_out), uy_out))| {
            let kind = cell_type[i];
            if kind.is_wall() {
                return;
            }

            let (rho, mut u, mut v) = moments(fi);
            if kind.is_source() {
                u = pinned_ux[i];
                v = pinned_uy[i];
            }

            *rho_out = rho;
            *ux_out = u;
            *uy_out = v;

            for (k, fk) in fi.iter_mut().enumerate() {
                let feq = equilibrium(k, rho, u, v);
                *fk = *fk * (1.0 - omega) + feq * omega;
            }
        });
}
