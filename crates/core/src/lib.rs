//! Indoor Ventilation Simulation Core Library
//!
//! A 2D lattice-Boltzmann (D2Q9) airflow solver for a top-down room slice,
//! with device source models, contaminant transport and ventilation
//! diagnostics.
//!
//! ## Pipeline
//!
//! - Describe a room in metres ([`room::RoomLayout`]) or a grid directly
//!   ([`SimulationConfig`])
//! - Run it with [`VentilationSimulation`] (collide, stream, bounce-back,
//!   transport every step)
//! - Read a [`SimulationResult`] and diagnose it with
//!   [`diagnostics::DiagnosticReport`]
//!
//! ```rust
//! use ventsim_core::{SimulationConfig, VentilationSimulation};
//!
//! let config = SimulationConfig::new(32, 16)
//!     .with_boundary_ring()
//!     .with_inlet(1, 8, 0.1, 0.0)
//!     .with_outlet(30, 8)
//!     .with_sterilizer(16, 8, 150.0, 4.0);
//! let mut sim = VentilationSimulation::new(config)?;
//! sim.simulate(50)?;
//! let result = sim.results();
//! assert!(result.avg_velocity > 0.0);
//! # Ok::<(), ventsim_core::Error>(())
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Lattice state and solver
pub mod grid;
pub mod solver;

// Setup: configs, device models, room rasterization
pub mod config;
pub mod devices;
pub mod room;

// Runs and their analysis
pub mod diagnostics;
pub mod simulation;

// Re-export core types
pub use core_types::{CellType, CubicMetersPerHour, Meters, Vec2};
pub use error::{ConfigError, Error, Result, SimulationError};

pub use config::SimulationConfig;
pub use grid::LatticeGrid;
pub use solver::SimulationParams;

pub use diagnostics::{DiagnosticParams, DiagnosticReport, Grade};
pub use room::{OpeningKind, RoomBounds, RoomLayout, RoomOpening};
pub use simulation::{
    compare_configurations, SimulationResult, VentilationSimulation, DEFAULT_STEPS,
};
