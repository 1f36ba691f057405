use super::params::DiagnosticParams;
use serde::{Deserialize, Serialize};

/// Score and dead-zone coverage before and after adding sterilizers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeforeAfterComparison {
    pub before_score: u32,
    pub after_score: u32,
    pub before_dead_zone: f32,
    pub after_dead_zone: f32,
    /// `(after − before) / before × 100`, or 100 when `before` is zero
    pub improvement_percentage: f32,
}

impl BeforeAfterComparison {
    /// Build from two measured outcomes
    pub fn from_scores(
        before_score: u32,
        after_score: u32,
        before_dead_zone: f32,
        after_dead_zone: f32,
    ) -> Self {
        let improvement_percentage = if before_score == 0 {
            100.0
        } else {
            (after_score as f32 - before_score as f32) / before_score as f32 * 100.0
        };
        Self {
            before_score,
            after_score,
            before_dead_zone,
            after_dead_zone,
            improvement_percentage,
        }
    }
}

/// Heuristic "after" estimate for when no second simulation is run
pub fn estimate_after_improvement(
    before_score: u32,
    before_dead_zone: f32,
    sterilizer_count: u32,
    params: &DiagnosticParams,
) -> BeforeAfterComparison {
    let n = sterilizer_count as f32;
    let after_score =
        (before_score as f32 * (1.0 + params.improvement_factor * n)).clamp(0.0, 100.0) as u32;
    let after_dead_zone =
        (before_dead_zone * (1.0 - params.dead_zone_reduction_factor * n)).max(0.0);

    BeforeAfterComparison::from_scores(before_score, after_score, before_dead_zone, after_dead_zone)
}
