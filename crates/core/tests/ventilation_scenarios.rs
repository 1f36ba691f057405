//! End-to-end ventilation scenarios
//!
//! Small grids with one feature each: still air, a single inlet jet, a
//! sterilizer, and an AC unit. The last two cover setup inputs that must be
//! clipped or rejected.

use approx::assert_abs_diff_eq;
use ventsim_core::{
    CellType, ConfigError, SimulationConfig, SimulationParams, VentilationSimulation,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn still_air_stays_at_rest() {
    let mut sim = VentilationSimulation::new(SimulationConfig::new(10, 10)).unwrap();
    sim.simulate(10).unwrap();

    let grid = sim.grid();
    for i in 0..grid.cell_count() {
        assert_abs_diff_eq!(grid.density().as_slice()[i], 1.0, epsilon = 1e-5);
        assert_eq!(grid.ux().as_slice()[i], 0.0);
        assert_eq!(grid.uy().as_slice()[i], 0.0);
    }
}

#[test]
fn inlet_drives_flow_downstream() {
    let config = SimulationConfig::new(20, 10)
        .with_boundary_ring()
        .with_inlet(0, 5, 0.1, 0.0);
    let mut sim = VentilationSimulation::new(config).unwrap();
    sim.simulate(200).unwrap();

    let result = sim.results();
    assert!(result.avg_velocity > 0.0);

    let grid = sim.grid();
    assert_eq!(grid.cell_type(grid.index(0, 5)), CellType::Inlet);
    let downstream_ux = (1..6).map(|x| grid.ux().get(x, 5));
    assert!(
        downstream_ux.clone().any(|u| u != 0.0),
        "no x-velocity downstream of the inlet: {:?}",
        downstream_ux.collect::<Vec<_>>()
    );
}

#[test]
fn sterilizer_effect_falls_off_with_distance() {
    let config = SimulationConfig::new(21, 21).with_sterilizer(10, 10, 150.0, 5.0);
    let sim = VentilationSimulation::new(config).unwrap();
    let effect = sim.grid().sterilization();

    assert_abs_diff_eq!(effect.get(10, 10), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(effect.get(15, 10), 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(effect.get(10, 5), 0.0, epsilon = 1e-6);

    for d in 0..5 {
        let near = effect.get(10 + d, 10);
        let far = effect.get(10 + d + 1, 10);
        assert!(near > far, "effect not decreasing at distance {d}: {near} <= {far}");
    }
    // Outside the radius nothing is touched
    assert_eq!(effect.get(16, 10), 0.0);
    assert_eq!(effect.get(0, 0), 0.0);
}

#[test]
fn sterilizer_speeds_up_decay() {
    let steps = 60;
    let mut baseline = VentilationSimulation::new(SimulationConfig::new(21, 21)).unwrap();
    let mut treated = VentilationSimulation::new(
        SimulationConfig::new(21, 21).with_sterilizer(10, 10, 150.0, 5.0),
    )
    .unwrap();
    baseline.simulate(steps).unwrap();
    treated.simulate(steps).unwrap();

    let base_c = baseline.grid().concentration().get(10, 10);
    let treated_c = treated.grid().concentration().get(10, 10);
    assert_abs_diff_eq!(base_c, 0.999_f32.powi(60), epsilon = 1e-4);
    assert!(
        treated_c < base_c,
        "sterilized {treated_c} should be below baseline {base_c}"
    );
    assert!(treated.results().avg_concentration < baseline.results().avg_concentration);
}

#[test]
fn ac_unit_tags_four_rays() {
    let config = SimulationConfig::new(40, 40).with_ac_unit(10, 10, 300.0, 5);
    let sim = VentilationSimulation::new(config).unwrap();
    let grid = sim.grid();

    let mut expected = Vec::new();
    for d in 1..=5 {
        expected.push((10 + d, 10));
        expected.push((10 - d, 10));
        expected.push((10, 10 + d));
        expected.push((10, 10 - d));
    }

    for y in 0..40 {
        for x in 0..40 {
            let idx = grid.index(x, y);
            if expected.contains(&(x, y)) {
                assert_eq!(grid.cell_type(idx), CellType::Ac, "({x}, {y})");
                assert!(grid.pinned_velocity(idx).norm() > 0.0);
            } else {
                assert_eq!(grid.cell_type(idx), CellType::Empty, "({x}, {y})");
                assert_eq!(grid.pinned_velocity(idx).norm(), 0.0);
            }
        }
    }
    assert_eq!(sim.registry().devices()[0].cells, 20);
}

#[test]
fn extreme_coordinates_are_clipped_at_setup() {
    let json = r#"{
        "gridWidth": 4,
        "gridHeight": 4,
        "obstacles": [{"x": 9223372036854775807, "y": 0, "w": 2, "h": 1}]
    }"#;
    let sim = VentilationSimulation::from_json(json).unwrap();
    assert!(sim.grid().cell_types().iter().all(|c| *c == CellType::Empty));

    let config = SimulationConfig::new(4, 4)
        .with_ac_unit(i64::MAX - 1, 0, 300.0, 5)
        .with_ventilator(i64::MIN, i64::MAX, 200.0, -1.0, 1.0)
        .with_sterilizer(i64::MAX, i64::MAX, 150.0, 2.0)
        .with_obstacle(-5000, -5000, u32::MAX, u32::MAX);
    let mut sim = VentilationSimulation::new(config).unwrap();
    assert!(sim.grid().cell_types().iter().all(|c| *c == CellType::Wall));
    sim.simulate(5).unwrap();
}

#[test]
fn out_of_range_initial_concentration_is_rejected() {
    let params = SimulationParams {
        initial_concentration: 2.0,
        ..Default::default()
    };
    let config = SimulationConfig::new(8, 8)
        .with_boundary_ring()
        .with_params(params);
    assert!(matches!(
        VentilationSimulation::new(config),
        Err(ConfigError::InvalidInitialConcentration(_))
    ));

    let json = r#"{"gridWidth": 8, "gridHeight": 8, "params": {"initialConcentration": -0.5}}"#;
    assert!(matches!(
        VentilationSimulation::from_json(json),
        Err(ConfigError::InvalidInitialConcentration(_))
    ));
}
