//! Core types and utilities

pub mod cell;
pub mod units;
pub mod vec2;

pub use cell::CellType;
pub use units::{CubicMetersPerHour, Meters};
pub use vec2::Vec2;
