use serde::{Deserialize, Serialize};

/// Tuning knobs of the diagnostic heuristics.
///
/// None of these have a physical derivation; they are kept configurable so a
/// caller can recalibrate without touching the scoring code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticParams {
    /// Estimated score gain per added sterilizer (fraction of the current score)
    pub improvement_factor: f32,
    /// Estimated dead-zone reduction per added sterilizer (fraction)
    pub dead_zone_reduction_factor: f32,
    /// Upper bound on recommended sterilizers
    pub max_sterilizers: u32,
    /// Floor area one sterilizer serves (m²)
    pub area_per_sterilizer: f32,
    /// Room area assumed when none is known (m²)
    pub default_room_area: f32,
    /// Mounting height of suggested placements (m)
    pub placement_height: f32,
    /// Coverage reported for each suggested placement (m²)
    pub coverage: f32,
    /// Dead-zone percentage above which the room is flagged
    pub high_dead_zone_percentage: f32,
    /// Average velocity below which airflow is flagged as weak
    pub low_velocity_threshold: f32,
    /// Score below which extra sterilizers are suggested
    pub add_sterilizer_score: u32,
    /// Dead-zone ratio above which a poor room gets three sterilizers
    pub severe_dead_zone_ratio: f32,
    /// Dead-zone ratio above which a poor room gets two sterilizers
    pub moderate_dead_zone_ratio: f32,
}

impl Default for DiagnosticParams {
    fn default() -> Self {
        Self {
            improvement_factor: 0.15,
            dead_zone_reduction_factor: 0.4,
            max_sterilizers: 5,
            area_per_sterilizer: 10.0,
            default_room_area: 30.0,
            placement_height: 1.5,
            coverage: 10.0,
            high_dead_zone_percentage: 20.0,
            low_velocity_threshold: 0.1,
            add_sterilizer_score: 60,
            severe_dead_zone_ratio: 0.3,
            moderate_dead_zone_ratio: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let params: DiagnosticParams =
            serde_json::from_str(r#"{"maxSterilizers": 3}"#).unwrap();
        assert_eq!(params.max_sterilizers, 3);
        assert_eq!(params.improvement_factor, 0.15);
        assert_eq!(params.default_room_area, 30.0);
        assert_eq!(params.severe_dead_zone_ratio, 0.3);
        assert_eq!(params.moderate_dead_zone_ratio, 0.2);
    }
}
