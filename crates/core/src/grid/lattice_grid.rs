//! Grid state store
//!
//! [`LatticeGrid`] owns every per-cell array of one simulation: the D2Q9
//! distributions (double-buffered), macroscopic density and velocity, cell
//! tags, pinned device velocities, the contaminant concentration (also
//! double-buffered) and the accumulated sterilization effect.
//!
//! Distributions are stored cell-major (`f[i * 9 + k]`) so every cell's nine
//! values form one contiguous chunk that parallel iterators can hand out.

use super::fields::FieldData;
use crate::core_types::{CellType, Vec2};
use crate::solver::d2q9::{Q, WEIGHTS};

/// Lattice state for one simulation run
#[derive(Debug, Clone)]
pub struct LatticeGrid {
    pub(crate) width: usize,
    pub(crate) height: usize,

    // Front/back distribution buffers, swapped after streaming
    pub(crate) f: Vec<f32>,
    pub(crate) f_next: Vec<f32>,

    pub(crate) density: FieldData,
    pub(crate) ux: FieldData,
    pub(crate) uy: FieldData,

    pub(crate) cell_type: Vec<CellType>,

    // Device-assigned velocity, read by collision for source cells only
    pub(crate) pinned_ux: FieldData,
    pub(crate) pinned_uy: FieldData,

    pub(crate) concentration: FieldData,
    pub(crate) concentration_next: FieldData,
    pub(crate) sterilization: FieldData,
}

impl LatticeGrid {
    /// Create a grid at rest: ρ = 1, u = 0, `f_k = w_k`, all cells Empty.
    ///
    /// # Arguments
    ///
    /// * `width` - Grid width in cells
    /// * `height` - Grid height in cells
    /// * `initial_concentration` - Starting contaminant level for every cell
    #[must_use]
    pub fn new(width: usize, height: usize, initial_concentration: f32) -> Self {
        let cells = width * height;
        let f: Vec<f32> = (0..cells).flat_map(|_| WEIGHTS).collect();
        let concentration = FieldData::with_value(width, height, initial_concentration);

        Self {
            width,
            height,
            f_next: f.clone(),
            f,
            density: FieldData::with_value(width, height, 1.0),
            ux: FieldData::new(width, height),
            uy: FieldData::new(width, height),
            cell_type: vec![CellType::Empty; cells],
            pinned_ux: FieldData::new(width, height),
            pinned_uy: FieldData::new(width, height),
            concentration_next: concentration.clone(),
            concentration,
            sterilization: FieldData::new(width, height),
        }
    }

    /// Grid width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Flat row-major index of `(x, y)`
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Flat index of a possibly out-of-range coordinate, `None` if clipped
    #[inline]
    pub fn checked_index(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then(|| self.index(x, y))
    }

    /// Cell tag at a flat index
    #[inline]
    pub fn cell_type(&self, idx: usize) -> CellType {
        self.cell_type[idx]
    }

    /// All cell tags in row-major order
    pub fn cell_types(&self) -> &[CellType] {
        &self.cell_type
    }

    /// Tag a cell as a passive type (Empty, Wall, Outlet), clearing any pinned velocity
    pub(crate) fn set_passive(&mut self, idx: usize, cell_type: CellType) {
        debug_assert!(!cell_type.is_source());
        self.cell_type[idx] = cell_type;
        self.pinned_ux.data[idx] = 0.0;
        self.pinned_uy.data[idx] = 0.0;
    }

    /// Tag a cell as a velocity source with its pinned velocity.
    ///
    /// The macroscopic velocity is written too, so the cell reports its device
    /// velocity even before the first collision.
    pub(crate) fn set_source(&mut self, idx: usize, cell_type: CellType, velocity: Vec2) {
        debug_assert!(cell_type.is_source());
        self.cell_type[idx] = cell_type;
        self.pinned_ux.data[idx] = velocity.x;
        self.pinned_uy.data[idx] = velocity.y;
        self.ux.data[idx] = velocity.x;
        self.uy.data[idx] = velocity.y;
    }

    /// Raise a cell's sterilization effect to at least `effect`
    pub(crate) fn raise_sterilization(&mut self, idx: usize, effect: f32) {
        let current = &mut self.sterilization.data[idx];
        *current = current.max(effect);
    }

    /// The nine distributions of one cell (front buffer)
    #[inline]
    pub fn distributions(&self, idx: usize) -> &[f32] {
        &self.f[idx * Q..(idx + 1) * Q]
    }

    /// Mutable access to the nine distributions of one cell (front buffer)
    #[inline]
    pub fn distributions_mut(&mut self, idx: usize) -> &mut [f32] {
        &mut self.f[idx * Q..(idx + 1) * Q]
    }

    /// Swap front and back distribution buffers
    #[inline]
    pub(crate) fn swap_distributions(&mut self) {
        std::mem::swap(&mut self.f, &mut self.f_next);
    }

    /// Swap front and back concentration buffers
    #[inline]
    pub(crate) fn swap_concentration(&mut self) {
        std::mem::swap(&mut self.concentration, &mut self.concentration_next);
    }

    /// Sum of every distribution over the whole grid
    pub fn total_mass(&self) -> f64 {
        self.f.iter().map(|&v| f64::from(v)).sum()
    }

    /// Density field
    pub fn density(&self) -> &FieldData {
        &self.density
    }

    /// X velocity field
    pub fn ux(&self) -> &FieldData {
        &self.ux
    }

    /// Y velocity field
    pub fn uy(&self) -> &FieldData {
        &self.uy
    }

    /// Velocity at a flat index
    #[inline]
    pub fn velocity(&self, idx: usize) -> Vec2 {
        Vec2::new(self.ux.data[idx], self.uy.data[idx])
    }

    /// Device-assigned velocity at a flat index (zero for non-source cells)
    #[inline]
    pub fn pinned_velocity(&self, idx: usize) -> Vec2 {
        Vec2::new(self.pinned_ux.data[idx], self.pinned_uy.data[idx])
    }

    /// Concentration field
    pub fn concentration(&self) -> &FieldData {
        &self.concentration
    }

    /// Sterilization effect field
    pub fn sterilization(&self) -> &FieldData {
        &self.sterilization
    }

    /// Number of non-Wall cells
    pub fn open_cell_count(&self) -> usize {
        self.cell_type.iter().filter(|t| !t.is_wall()).count()
    }

    /// First cell whose density or velocity is NaN/Inf, if any
    pub fn first_non_finite(&self) -> Option<usize> {
        (0..self.cell_count()).find(|&i| {
            !(self.density.data[i].is_finite()
                && self.ux.data[i].is_finite()
                && self.uy.data[i].is_finite())
        })
    }
}
