use super::{SimulationResult, VentilationSimulation};
use crate::config::SimulationConfig;
use crate::diagnostics::BeforeAfterComparison;
use crate::error::Error;
use tracing::info;

/// Outcome of running two configurations side by side
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationComparison {
    pub before: SimulationResult,
    pub after: SimulationResult,
    /// Measured, not estimated
    pub comparison: BeforeAfterComparison,
}

fn run(config: &SimulationConfig, steps: u64) -> Result<SimulationResult, Error> {
    let mut sim = VentilationSimulation::new(config.clone())?;
    sim.simulate(steps)?;
    Ok(sim.results())
}

/// Simulate `before` and `after` for `steps` each and compare their scores.
///
/// The two runs own independent grids and execute concurrently on the rayon
/// pool.
///
/// # Errors
///
/// The first setup or run error of either configuration (`before` wins ties).
pub fn compare_configurations(
    before: &SimulationConfig,
    after: &SimulationConfig,
    steps: u64,
) -> Result<ConfigurationComparison, Error> {
    let (before, after) = rayon::join(|| run(before, steps), || run(after, steps));
    let (before, after) = (before?, after?);

    let comparison = BeforeAfterComparison::from_scores(
        before.ventilation_score(),
        after.ventilation_score(),
        before.dead_zone_percentage,
        after.dead_zone_percentage,
    );
    info!(
        "Comparison: score {} -> {}, dead zone {:.1}% -> {:.1}%",
        comparison.before_score,
        comparison.after_score,
        comparison.before_dead_zone,
        comparison.after_dead_zone
    );

    Ok(ConfigurationComparison {
        before,
        after,
        comparison,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_configs_compare_equal() {
        let config = SimulationConfig::new(24, 12)
            .with_boundary_ring()
            .with_inlet(1, 6, 0.1, 0.0)
            .with_outlet(22, 6);
        let cmp = compare_configurations(&config, &config, 30).unwrap();
        assert_eq!(cmp.before, cmp.after);
        assert_eq!(cmp.comparison.before_score, cmp.comparison.after_score);
    }

    #[test]
    fn test_invalid_after_is_reported() {
        let before = SimulationConfig::new(8, 8);
        let after = SimulationConfig::new(8, 8).with_sterilizer(4, 4, 150.0, 0.0);
        assert!(matches!(
            compare_configurations(&before, &after, 5),
            Err(Error::Config(_))
        ));
    }
}
