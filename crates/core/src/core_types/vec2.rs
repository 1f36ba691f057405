//! Vector type alias for 2D lattice velocities and directions.

use nalgebra::Vector2;

/// 2D vector type for velocities and directions in lattice units.
///
/// This is a simple alias for `nalgebra::Vector2<f32>`, used for device
/// injection velocities and the concentration back-trace.
pub type Vec2 = Vector2<f32>;
