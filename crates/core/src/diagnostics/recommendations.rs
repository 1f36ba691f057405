//! Recommendation engine
//!
//! Everything here is structured data; turning a [`Recommendation`] into
//! user-facing text is left to the caller.

use super::params::DiagnosticParams;
use super::score::{EXCELLENT_SCORE, GOOD_SCORE};
use serde::{Deserialize, Serialize};

/// Severity of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationKind {
    Success,
    Warning,
    Suggestion,
}

/// What a recommendation is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationTopic {
    /// Too much of the room is stagnant; `value` is the dead-zone percentage
    HighDeadZone,
    /// Mean airflow is weak; `value` is the average velocity
    LowAirVelocity,
    /// Score is low enough to warrant sterilizers; `value` is the score
    AddSterilizers,
    /// Nothing fired; `value` is the score
    VentilationAdequate,
}

/// One structured recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub topic: RecommendationTopic,
    /// The metric that triggered it
    pub value: f32,
}

/// Check the three warning rules, falling back to a single success entry
pub fn generate_recommendations(
    avg_velocity: f32,
    dead_zone_percentage: f32,
    score: u32,
    params: &DiagnosticParams,
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if dead_zone_percentage > params.high_dead_zone_percentage {
        out.push(Recommendation {
            kind: RecommendationKind::Warning,
            topic: RecommendationTopic::HighDeadZone,
            value: dead_zone_percentage,
        });
    }
    if avg_velocity < params.low_velocity_threshold {
        out.push(Recommendation {
            kind: RecommendationKind::Warning,
            topic: RecommendationTopic::LowAirVelocity,
            value: avg_velocity,
        });
    }
    if score < params.add_sterilizer_score {
        out.push(Recommendation {
            kind: RecommendationKind::Suggestion,
            topic: RecommendationTopic::AddSterilizers,
            value: score as f32,
        });
    }

    if out.is_empty() {
        out.push(Recommendation {
            kind: RecommendationKind::Success,
            topic: RecommendationTopic::VentilationAdequate,
            value: score as f32,
        });
    }
    out
}

/// Number of sterilizers to suggest for a room.
///
/// The score/dead-zone heuristic gives a base count which is raised to one
/// unit per `area_per_sterilizer` of floor, then capped at `max_sterilizers`.
/// A non-finite `room_area` falls back to `default_room_area`.
///
/// # Example
///
/// ```rust
/// use ventsim_core::diagnostics::{recommend_sterilizer_count, DiagnosticParams};
///
/// let params = DiagnosticParams::default();
/// // Poor room, 35 % dead, 30 m² -> max(3, 3)
/// assert_eq!(recommend_sterilizer_count(30, 0.35, 30.0, &params), 3);
/// ```
pub fn recommend_sterilizer_count(
    score: u32,
    dead_zone_ratio: f32,
    room_area: f32,
    params: &DiagnosticParams,
) -> u32 {
    let base = if score >= EXCELLENT_SCORE {
        0
    } else if score >= GOOD_SCORE {
        1
    } else if dead_zone_ratio > params.severe_dead_zone_ratio {
        3
    } else if dead_zone_ratio > params.moderate_dead_zone_ratio {
        2
    } else {
        1
    };

    let area = if room_area.is_finite() {
        room_area.max(0.0)
    } else {
        params.default_room_area
    };
    let by_area = (area / params.area_per_sterilizer).ceil() as u32;

    base.max(by_area).min(params.max_sterilizers)
}

/// Why a placement was suggested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementReason {
    DeadZoneRelief,
    EvenDistribution,
}

/// Suggested sterilizer position in room coordinates (metres, y up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementSuggestion {
    /// 1-based ordinal
    pub position: u32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Floor area served (m²)
    pub coverage: f32,
    pub reason: PlacementReason,
}

/// Spread `count` units over the room in a near-square lattice.
///
/// `cols = ceil(sqrt(count))`, `rows = ceil(count / cols)`, and unit `i` sits
/// at `((col+1)·W/(cols+1), height, (row+1)·D/(rows+1))`.
pub fn suggest_placements(
    count: u32,
    room_width: f32,
    room_depth: f32,
    dead_zone_percentage: f32,
    params: &DiagnosticParams,
) -> Vec<PlacementSuggestion> {
    if count == 0 {
        return Vec::new();
    }

    let cols = (count as f32).sqrt().ceil().max(1.0) as u32;
    let rows = count.div_ceil(cols);
    let reason = if dead_zone_percentage > params.high_dead_zone_percentage {
        PlacementReason::DeadZoneRelief
    } else {
        PlacementReason::EvenDistribution
    };

    (0..count)
        .map(|i| {
            let row = i / cols;
            let col = i % cols;
            PlacementSuggestion {
                position: i + 1,
                x: (col + 1) as f32 * room_width / (cols + 1) as f32,
                y: params.placement_height,
                z: (row + 1) as f32 * room_depth / (rows + 1) as f32,
                coverage: params.coverage,
                reason,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_all_rules_fire() {
        let recs = generate_recommendations(0.05, 35.0, 30, &DiagnosticParams::default());
        let topics: Vec<_> = recs.iter().map(|r| r.topic).collect();
        assert_eq!(
            topics,
            vec![
                RecommendationTopic::HighDeadZone,
                RecommendationTopic::LowAirVelocity,
                RecommendationTopic::AddSterilizers,
            ]
        );
        assert_eq!(recs[0].kind, RecommendationKind::Warning);
        assert_eq!(recs[2].kind, RecommendationKind::Suggestion);
        assert_eq!(recs[0].value, 35.0);
    }

    #[test]
    fn test_healthy_room_gets_success() {
        let recs = generate_recommendations(0.4, 5.0, 87, &DiagnosticParams::default());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::Success);
        assert_eq!(recs[0].topic, RecommendationTopic::VentilationAdequate);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let recs = generate_recommendations(0.1, 20.0, 60, &DiagnosticParams::default());
        assert_eq!(recs[0].topic, RecommendationTopic::VentilationAdequate);
    }

    #[test]
    fn test_sterilizer_heuristic() {
        let params = DiagnosticParams::default();
        // Small room so the area term does not dominate
        assert_eq!(recommend_sterilizer_count(85, 0.5, 0.0, &params), 0);
        assert_eq!(recommend_sterilizer_count(65, 0.5, 0.0, &params), 1);
        assert_eq!(recommend_sterilizer_count(30, 0.31, 0.0, &params), 3);
        assert_eq!(recommend_sterilizer_count(30, 0.25, 0.0, &params), 2);
        assert_eq!(recommend_sterilizer_count(30, 0.1, 0.0, &params), 1);
    }

    #[test]
    fn test_dead_zone_cutoffs_follow_params() {
        let params = DiagnosticParams {
            severe_dead_zone_ratio: 0.6,
            moderate_dead_zone_ratio: 0.4,
            ..Default::default()
        };
        assert_eq!(recommend_sterilizer_count(30, 0.5, 0.0, &params), 2);
        assert_eq!(recommend_sterilizer_count(30, 0.35, 0.0, &params), 1);
        assert_eq!(recommend_sterilizer_count(30, 0.65, 0.0, &params), 3);
    }

    #[test]
    fn test_sterilizer_area_floor_and_cap() {
        let params = DiagnosticParams::default();
        assert_eq!(recommend_sterilizer_count(90, 0.0, 30.0, &params), 3);
        assert_eq!(recommend_sterilizer_count(90, 0.0, 31.0, &params), 4);
        assert_eq!(recommend_sterilizer_count(10, 0.9, 200.0, &params), 5);
        assert_eq!(recommend_sterilizer_count(90, 0.0, f32::NAN, &params), 3);
    }

    #[test]
    fn test_placements_grid() {
        let params = DiagnosticParams::default();
        let spots = suggest_placements(3, 6.0, 4.0, 10.0, &params);
        // cols = 2, rows = 2
        assert_eq!(spots.len(), 3);
        assert_abs_diff_eq!(spots[0].x, 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(spots[1].x, 4.0, epsilon = 1e-6);
        assert_abs_diff_eq!(spots[2].x, 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(spots[0].z, 4.0 / 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(spots[2].z, 8.0 / 3.0, epsilon = 1e-6);
        assert_eq!(spots[2].position, 3);
        assert!(spots.iter().all(|s| s.y == 1.5 && s.coverage == 10.0));
        assert!(spots
            .iter()
            .all(|s| s.reason == PlacementReason::EvenDistribution));
    }

    #[test]
    fn test_placements_single_and_empty() {
        let params = DiagnosticParams::default();
        assert!(suggest_placements(0, 5.0, 5.0, 50.0, &params).is_empty());

        let one = suggest_placements(1, 5.0, 8.0, 50.0, &params);
        assert_abs_diff_eq!(one[0].x, 2.5, epsilon = 1e-6);
        assert_abs_diff_eq!(one[0].z, 4.0, epsilon = 1e-6);
        assert_eq!(one[0].reason, PlacementReason::DeadZoneRelief);
    }
}
