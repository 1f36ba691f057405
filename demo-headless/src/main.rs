use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ventsim_core::diagnostics::{
    PlacementReason, PlacementSuggestion, Recommendation, RecommendationKind, RecommendationTopic,
};
use ventsim_core::room::{DEFAULT_DEVICE_RADIUS, DEFAULT_RESOLUTION};
use ventsim_core::{
    compare_configurations, DiagnosticParams, DiagnosticReport, Meters, OpeningKind,
    RoomBounds, RoomLayout, RoomOpening, SimulationConfig, SimulationResult,
    VentilationSimulation, DEFAULT_STEPS,
};

/// Indoor ventilation and contaminant simulation
#[derive(Parser, Debug)]
#[command(name = "ventsim-headless")]
#[command(about = "2D lattice-Boltzmann room ventilation diagnostics", long_about = None)]
struct Args {
    /// Simulation config JSON (overrides the built-in room)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Room width in metres
    #[arg(long, default_value_t = 6.0)]
    room_width: f32,

    /// Room depth in metres
    #[arg(long, default_value_t = 5.0)]
    room_depth: f32,

    /// Cells along the longer room side
    #[arg(short, long, default_value_t = DEFAULT_RESOLUTION)]
    resolution: usize,

    /// Timesteps to run
    #[arg(short, long, default_value_t = DEFAULT_STEPS)]
    steps: u64,

    /// Re-run with the suggested sterilizers and report the measured change
    #[arg(long)]
    compare: bool,

    /// Print the result JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Window on the left wall, door on the right
fn default_layout(width: f32, depth: f32) -> RoomLayout {
    RoomLayout::new(RoomBounds::new(width, depth))
        .with_inlet(RoomOpening::opening(
            OpeningKind::Window,
            0.0,
            depth * 0.4,
            0.05,
            depth * 0.2,
        ))
        .with_outlet(RoomOpening::opening(
            OpeningKind::Door,
            width - 0.01,
            depth * 0.6,
            0.05,
            depth * 0.2,
        ))
}

/// Map room-space suggestions onto an existing grid config
fn with_sterilizers_on_grid(
    mut config: SimulationConfig,
    placements: &[PlacementSuggestion],
    width: f32,
    depth: f32,
) -> SimulationConfig {
    let gw = config.grid_width as f32;
    let gh = config.grid_height as f32;
    let radius = (DEFAULT_DEVICE_RADIUS.value() / width * gw).round().max(1.0);
    let cmh = OpeningKind::AirSterilizer.default_cmh().value();
    for p in placements {
        let x = (p.x / width * gw).floor() as i64;
        let y = (p.z / depth * gh).floor() as i64;
        config = config.with_sterilizer(x, y, cmh, radius);
    }
    config
}

fn describe(rec: &Recommendation) -> String {
    match rec.topic {
        RecommendationTopic::HighDeadZone => {
            format!("{:.1}% of the room is stagnant", rec.value)
        }
        RecommendationTopic::LowAirVelocity => {
            format!("average air velocity is low ({:.4} lattice units)", rec.value)
        }
        RecommendationTopic::AddSterilizers => {
            format!("score {:.0} is below target, consider adding sterilizers", rec.value)
        }
        RecommendationTopic::VentilationAdequate => {
            format!("ventilation is adequate (score {:.0})", rec.value)
        }
    }
}

fn print_report(result: &SimulationResult, report: &DiagnosticReport) {
    println!("=== Flow ===");
    println!("Grid:               {} x {}", result.grid_width, result.grid_height);
    println!("Avg velocity:       {:.5}", result.avg_velocity);
    println!("Max velocity:       {:.5}", result.max_velocity);
    println!(
        "Dead zones:         {} cells ({:.1}%)",
        result.dead_zones.count, result.dead_zone_percentage
    );
    println!("Avg concentration:  {:.4}", result.avg_concentration);

    println!();
    println!("=== Diagnosis ===");
    println!("Score: {} / 100 ({})", report.score, report.grade);
    for rec in &report.recommendations {
        let tag = match rec.kind {
            RecommendationKind::Success => "OK",
            RecommendationKind::Warning => "WARN",
            RecommendationKind::Suggestion => "TIP",
        };
        println!("  [{tag}] {}", describe(rec));
    }

    println!();
    println!("Recommended sterilizers: {}", report.sterilizer_count);
    for p in &report.placements {
        let reason = match p.reason {
            PlacementReason::DeadZoneRelief => "dead-zone relief",
            PlacementReason::EvenDistribution => "even distribution",
        };
        println!(
            "  #{} at ({:.2}, {:.2}, {:.2}) m, covers {:.0} m², {reason}",
            p.position, p.x, p.y, p.z, p.coverage
        );
    }

    let est = &report.comparison;
    println!(
        "Estimated: score {} -> {}, dead zone {:.1}% -> {:.1}% ({:+.1}%)",
        est.before_score,
        est.after_score,
        est.before_dead_zone,
        est.after_dead_zone,
        est.improvement_percentage
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let bounds = RoomBounds::new(args.room_width, args.room_depth);
    bounds.validate()?;
    info!(
        "Room {} x {}",
        Meters::new(args.room_width),
        Meters::new(args.room_depth)
    );

    let layout = default_layout(args.room_width, args.room_depth);
    let config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            SimulationConfig::from_json(&fs::read_to_string(path)?)?
        }
        None => layout.to_config(args.resolution)?,
    };

    let mut sim = VentilationSimulation::new(config.clone())?;
    sim.simulate(args.steps)?;
    let result = sim.results();

    if args.json {
        println!("{}", result.to_json()?);
        return Ok(());
    }

    let params = DiagnosticParams::default();
    let report = DiagnosticReport::from_result(
        &result,
        bounds.area(),
        bounds.width,
        bounds.depth,
        &params,
    );
    print_report(&result, &report);

    if args.compare && !report.placements.is_empty() {
        let after = match &args.config {
            Some(_) => with_sterilizers_on_grid(
                config.clone(),
                &report.placements,
                bounds.width,
                bounds.depth,
            ),
            None => layout
                .with_suggested_sterilizers(&report.placements)
                .to_config(args.resolution)?,
        };
        let measured = compare_configurations(&config, &after, args.steps)?;
        let cmp = &measured.comparison;
        println!();
        println!(
            "=== Measured with suggested sterilizers ({} each) ===",
            OpeningKind::AirSterilizer.default_cmh()
        );
        println!(
            "Score: {} -> {} ({:+.1}%)",
            cmp.before_score, cmp.after_score, cmp.improvement_percentage
        );
        println!(
            "Dead zone: {:.1}% -> {:.1}%",
            cmp.before_dead_zone, cmp.after_dead_zone
        );
        println!(
            "Avg concentration: {:.4} -> {:.4}",
            measured.before.avg_concentration, measured.after.avg_concentration
        );
    }

    Ok(())
}
