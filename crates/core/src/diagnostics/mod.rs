//! Post-run diagnostics
//!
//! Turns a grid or a [`SimulationResult`](crate::simulation::SimulationResult)
//! into stagnation maps, summary statistics, a ventilation score and
//! sterilizer recommendations.

mod comparison;
mod dead_zone;
mod params;
mod recommendations;
mod report;
mod score;
mod stats;

pub use comparison::{estimate_after_improvement, BeforeAfterComparison};
pub use dead_zone::DeadZoneMap;
pub use params::DiagnosticParams;
pub use recommendations::{
    generate_recommendations, recommend_sterilizer_count, suggest_placements, PlacementReason,
    PlacementSuggestion, Recommendation, RecommendationKind, RecommendationTopic,
};
pub use report::DiagnosticReport;
pub use score::{ventilation_score, Grade, EXCELLENT_SCORE, FAIR_SCORE, GOOD_SCORE};
pub use stats::FlowStats;
