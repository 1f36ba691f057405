//! D2Q9 velocity stencil and BGK equilibrium.
//!
//! Nine velocity directions on the 2D square lattice:
//! ```text
//!   6   2   5
//!    \  |  /
//!   3 - 0 - 1
//!    /  |  \
//!   7   4   8
//! ```

/// Number of discrete velocities per cell
pub const Q: usize = 9;

/// X components of the discrete velocities
pub const EX: [i32; Q] = [0, 1, 0, -1, 0, 1, -1, -1, 1];

/// Y components of the discrete velocities
pub const EY: [i32; Q] = [0, 0, 1, 0, -1, 1, 1, -1, -1];

/// Stencil weights
pub const WEIGHTS: [f32; Q] = [
    4.0 / 9.0, // 0: rest
    1.0 / 9.0, // 1-4: axis-aligned
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0, // 5-8: diagonal
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

/// Opposite direction indices for bounce-back
pub const OPPOSITE: [usize; Q] = [0, 3, 4, 1, 2, 7, 8, 5, 6];

/// Equilibrium distribution for direction `k`.
///
/// `feq_k = w_k ρ [1 + 3(e_k·u) + 4.5(e_k·u)² − 1.5|u|²]`
#[inline]
#[must_use]
pub fn equilibrium(k: usize, rho: f32, ux: f32, uy: f32) -> f32 {
    let eu = EX[k] as f32 * ux + EY[k] as f32 * uy;
    let u_sq = ux * ux + uy * uy;
    WEIGHTS[k] * rho * (1.0 + 3.0 * eu + 4.5 * eu * eu - 1.5 * u_sq)
}

/// Density and raw velocity moments of one cell's distributions.
///
/// Returns `(ρ, ux, uy)` with `u = Σ e_k f_k / ρ`. A cell with zero density
/// reports zero velocity.
#[inline]
#[must_use]
pub fn moments(f: &[f32]) -> (f32, f32, f32) {
    let mut rho = 0.0;
    let mut mx = 0.0;
    let mut my = 0.0;
    for k in 0..Q {
        rho += f[k];
        mx += EX[k] as f32 * f[k];
        my += EY[k] as f32 * f[k];
    }
    if rho == 0.0 {
        return (rho, 0.0, 0.0);
    }
    (rho, mx / rho, my / rho)
}
