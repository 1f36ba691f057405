use super::comparison::{estimate_after_improvement, BeforeAfterComparison};
use super::params::DiagnosticParams;
use super::recommendations::{
    generate_recommendations, recommend_sterilizer_count, suggest_placements,
    PlacementSuggestion, Recommendation,
};
use super::score::Grade;
use crate::simulation::SimulationResult;
use serde::{Deserialize, Serialize};

/// Everything the diagnostics layer derives from one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub score: u32,
    pub grade: Grade,
    pub recommendations: Vec<Recommendation>,
    pub sterilizer_count: u32,
    pub placements: Vec<PlacementSuggestion>,
    /// Heuristic estimate; replace with a measured comparison when a second
    /// run is available
    pub comparison: BeforeAfterComparison,
}

impl DiagnosticReport {
    /// Diagnose a run for a room of the given floor area and extent (metres)
    pub fn from_result(
        result: &SimulationResult,
        room_area: f32,
        room_width: f32,
        room_depth: f32,
        params: &DiagnosticParams,
    ) -> Self {
        let score = result.ventilation_score();
        let dead_zone = result.dead_zone_percentage;
        let sterilizer_count =
            recommend_sterilizer_count(score, dead_zone / 100.0, room_area, params);

        Self {
            score,
            grade: Grade::from_score(score),
            recommendations: generate_recommendations(
                result.avg_velocity,
                dead_zone,
                score,
                params,
            ),
            sterilizer_count,
            placements: suggest_placements(
                sterilizer_count,
                room_width,
                room_depth,
                dead_zone,
                params,
            ),
            comparison: estimate_after_improvement(score, dead_zone, sterilizer_count, params),
        }
    }
}
