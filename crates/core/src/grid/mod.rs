//! Grid-based state storage

pub mod fields;
pub mod lattice_grid;

pub use fields::FieldData;
pub use lattice_grid::LatticeGrid;
