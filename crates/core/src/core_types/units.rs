//! Semantic unit types for room geometry and airflow rates
//!
//! Newtype wrappers keep metres (room space) apart from lattice cells (grid
//! space) and volumetric flow rates apart from lattice velocities.
//!
//! # Usage
//! ```
//! use ventsim_core::core_types::units::{CubicMetersPerHour, Meters};
//!
//! let flow = CubicMetersPerHour::new(360.0);
//! assert!((flow.per_second() - 0.1).abs() < 1e-6);
//!
//! let w = Meters::new(6.0);
//! assert_eq!(*w, 6.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Seconds in one hour, used to convert CMH into per-second flow
const SECONDS_PER_HOUR: f32 = 3600.0;

/// Length in metres (room space)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(f32);

impl Deref for Meters {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl Meters {
    /// Create a new length in metres
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Meters(value)
    }

    /// Raw value
    #[inline]
    #[must_use]
    pub const fn value(self) -> f32 {
        self.0
    }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} m", self.0)
    }
}

/// Volumetric airflow rate in cubic metres per hour (CMH)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CubicMetersPerHour(f32);

impl Deref for CubicMetersPerHour {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl CubicMetersPerHour {
    /// No airflow
    pub const ZERO: CubicMetersPerHour = CubicMetersPerHour(0.0);

    /// Create a new flow rate
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        CubicMetersPerHour(value)
    }

    /// Raw CMH value
    #[inline]
    #[must_use]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Flow in cubic metres per second (`cmh / 3600`)
    #[inline]
    #[must_use]
    pub fn per_second(self) -> f32 {
        self.0 / SECONDS_PER_HOUR
    }
}

impl fmt::Display for CubicMetersPerHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0} CMH", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmh_per_second() {
        assert_eq!(CubicMetersPerHour::new(3600.0).per_second(), 1.0);
        assert_eq!(CubicMetersPerHour::ZERO.per_second(), 0.0);
    }

    #[test]
    fn test_display_suffixes() {
        assert_eq!(Meters::new(2.0).to_string(), "2.00 m");
        assert_eq!(CubicMetersPerHour::new(150.0).to_string(), "150 CMH");
    }
}
