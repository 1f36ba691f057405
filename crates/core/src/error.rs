//! Error types for setup and run phases
//!
//! Setup problems (bad dimensions, zero radii, malformed JSON) surface as
//! [`ConfigError`] before any timestep runs. The run loop itself only fails
//! when the caller cancels it or the lattice blows up numerically, both
//! reported through [`SimulationError`].

use std::fmt;

/// Invalid simulation configuration, detected at setup time
#[derive(Debug)]
pub enum ConfigError {
    /// Grid width or height is zero
    InvalidGridDimensions { width: usize, height: usize },
    /// Sterilizer or purifier radius is not a positive finite number
    InvalidRadius {
        device: &'static str,
        index: usize,
        radius: f32,
    },
    /// AC unit spread radius is zero
    InvalidSpreadRadius { index: usize },
    /// Ventilator direction vector has zero (or non-finite) length
    ZeroDirection { index: usize },
    /// A numeric field is NaN or infinite
    NonFinite { field: String, value: f32 },
    /// Relaxation time at or below the BGK stability limit of 0.5
    InvalidRelaxationTime(f32),
    /// Starting concentration outside the normalized range [0, 1]
    InvalidInitialConcentration(f32),
    /// Room dimensions must be positive
    InvalidRoomDimensions { width: f32, depth: f32 },
    /// Config JSON could not be parsed
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidGridDimensions { width, height } => {
                write!(f, "grid dimensions must be non-zero, got {width}x{height}")
            }
            ConfigError::InvalidRadius {
                device,
                index,
                radius,
            } => write!(
                f,
                "{device} #{index}: radius must be finite and positive, got {radius}"
            ),
            ConfigError::InvalidSpreadRadius { index } => {
                write!(f, "AC unit #{index}: spread radius must be positive")
            }
            ConfigError::ZeroDirection { index } => {
                write!(f, "ventilator #{index}: direction vector must be non-zero")
            }
            ConfigError::NonFinite { field, value } => {
                write!(f, "{field} must be finite, got {value}")
            }
            ConfigError::InvalidRelaxationTime(tau) => {
                write!(f, "relaxation time tau must be greater than 0.5, got {tau}")
            }
            ConfigError::InvalidInitialConcentration(c) => {
                write!(f, "initial concentration must lie in [0, 1], got {c}")
            }
            ConfigError::InvalidRoomDimensions { width, depth } => write!(
                f,
                "room dimensions must be finite and positive, got {width}x{depth}"
            ),
            ConfigError::Json(e) => write!(f, "invalid config JSON: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Failure while advancing the lattice
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A density or velocity became NaN/Inf; the run must be discarded
    Unstable { step: u64, cell: usize },
    /// The cancellation flag was raised between timesteps
    Cancelled { completed_steps: u64 },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Unstable { step, cell } => write!(
                f,
                "lattice became numerically unstable at step {step} (cell {cell})"
            ),
            SimulationError::Cancelled { completed_steps } => {
                write!(f, "simulation cancelled after {completed_steps} steps")
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Any error produced by the crate
#[derive(Debug)]
pub enum Error {
    Config(ConfigError),
    Simulation(SimulationError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "configuration error: {e}"),
            Error::Simulation(e) => write!(f, "simulation error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::Simulation(e) => Some(e),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<SimulationError> for Error {
    fn from(e: SimulationError) -> Self {
        Error::Simulation(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(ConfigError::Json(e))
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;
