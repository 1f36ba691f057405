//! Lattice-Boltzmann flow solver and scalar transport
//!
//! One timestep always runs in the same order:
//!
//! 1. [`collide`]: BGK relaxation, source cells pinned to device velocity
//! 2. [`stream`]: pull-scheme propagation into the back buffer, then swap
//! 3. [`bounce_back`]: reverse distributions on Wall cells
//! 4. [`transport_concentration`]: semi-Lagrangian contaminant update
//!
//! Bounce-back must follow streaming so that wall cells reflect what was just
//! streamed into them before the next collision reads their neighbours.
//!
//! # Example
//!
//! ```rust
//! use ventsim_core::grid::LatticeGrid;
//! use ventsim_core::solver::{step, SimulationParams};
//!
//! let mut grid = LatticeGrid::new(16, 8, 1.0);
//! let params = SimulationParams::default();
//! for _ in 0..10 {
//!     step(&mut grid, &params);
//! }
//! ```

mod collision;
pub mod d2q9;
mod params;
mod streaming;
mod transport;

pub use collision::collide;
pub use params::SimulationParams;
pub use streaming::{bounce_back, stream};
pub use transport::transport_concentration;

use crate::grid::LatticeGrid;

/// Advance the grid by exactly one timestep
pub fn step(grid: &mut LatticeGrid, params: &SimulationParams) {
    collide(grid, params.omega());
    stream(grid);
    bounce_back(grid);
    transport_concentration(grid, params);
}
