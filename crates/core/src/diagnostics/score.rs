use serde::{Deserialize, Serialize};
use std::fmt;

/// Score at or above which a room grades as excellent
pub const EXCELLENT_SCORE: u32 = 80;
/// Score at or above which a room grades as good
pub const GOOD_SCORE: u32 = 60;
/// Score at or above which a room grades as fair
pub const FAIR_SCORE: u32 = 40;

/// Combine average velocity and dead-zone coverage into a `0..=100` score.
///
/// Each half contributes at most 50 points:
/// `clamp(avg·100, 0, 50) + clamp((100 − deadZone%)/2, 0, 50)`, truncated.
///
/// # Example
///
/// ```rust
/// use ventsim_core::diagnostics::ventilation_score;
///
/// assert_eq!(ventilation_score(0.2, 40.0), 50);
/// assert_eq!(ventilation_score(1.0, 0.0), 100);
/// ```
pub fn ventilation_score(avg_velocity: f32, dead_zone_percentage: f32) -> u32 {
    let velocity_part = (avg_velocity * 100.0).clamp(0.0, 50.0);
    let coverage_part = ((100.0 - dead_zone_percentage) / 2.0).clamp(0.0, 50.0);
    // NaN inputs saturate to 0 through the cast
    (velocity_part + coverage_part) as u32
}

/// Qualitative band of a ventilation score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= EXCELLENT_SCORE => Grade::Excellent,
            s if s >= GOOD_SCORE => Grade::Good,
            s if s >= FAIR_SCORE => Grade::Fair,
            _ => Grade::Poor,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Grade::Excellent => "excellent",
            Grade::Good => "good",
            Grade::Fair => "fair",
            Grade::Poor => "poor",
        };
        f.write_str(name)
    }
}
