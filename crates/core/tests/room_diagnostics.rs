//! Room layout to diagnostic report, and a measured before/after run

use ventsim_core::diagnostics::{RecommendationKind, RecommendationTopic};
use ventsim_core::room::{OpeningKind, RoomBounds, RoomLayout, RoomOpening};
use ventsim_core::{
    compare_configurations, DiagnosticParams, DiagnosticReport, Grade, VentilationSimulation,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn office() -> RoomLayout {
    RoomLayout::new(RoomBounds::new(6.0, 5.0))
        .with_inlet(RoomOpening::opening(OpeningKind::Window, 0.0, 2.0, 0.1, 1.2))
        .with_outlet(RoomOpening::opening(OpeningKind::Door, 5.9, 3.0, 0.1, 0.9))
}

#[test]
fn office_report_is_consistent() {
    let layout = office();
    let config = layout.to_config(48).unwrap();
    assert_eq!((config.grid_width, config.grid_height), (48, 40));

    let mut sim = VentilationSimulation::new(config).unwrap();
    sim.simulate(150).unwrap();
    let result = sim.results();

    let params = DiagnosticParams::default();
    let report = DiagnosticReport::from_result(
        &result,
        layout.bounds.area(),
        layout.bounds.width,
        layout.bounds.depth,
        &params,
    );

    assert!(report.score <= 100);
    assert_eq!(report.grade, Grade::from_score(report.score));
    assert!(report.sterilizer_count >= 3, "30 m² needs at least three units");
    assert!(report.sterilizer_count <= params.max_sterilizers);
    assert_eq!(report.placements.len(), report.sterilizer_count as usize);
    for p in &report.placements {
        assert!(p.x > 0.0 && p.x < 6.0);
        assert!(p.z > 0.0 && p.z < 5.0);
    }
    assert!(!report.recommendations.is_empty());
    if report.score < 60 {
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.topic == RecommendationTopic::AddSterilizers
                && r.kind == RecommendationKind::Suggestion));
    }
    assert!(report.comparison.after_score >= report.comparison.before_score);
}

#[test]
fn suggested_sterilizers_lower_contamination() {
    let layout = office();
    let before = layout.to_config(48).unwrap();

    let mut sim = VentilationSimulation::new(before.clone()).unwrap();
    sim.simulate(100).unwrap();
    let report = DiagnosticReport::from_result(
        &sim.results(),
        layout.bounds.area(),
        layout.bounds.width,
        layout.bounds.depth,
        &DiagnosticParams::default(),
    );

    let after = layout
        .with_suggested_sterilizers(&report.placements)
        .to_config(48)
        .unwrap();
    assert_eq!(after.sterilizers.len(), report.placements.len());

    let cmp = compare_configurations(&before, &after, 100).unwrap();
    assert!(cmp.after.avg_concentration < cmp.before.avg_concentration);
    assert_eq!(cmp.comparison.before_score, cmp.before.ventilation_score());
    assert_eq!(cmp.before, sim.results());
}
