//! C ABI for the ventilation simulator
//!
//! Every fallible function returns a [`VentSimErrorCode`] and records a
//! message retrievable with [`ventsim_get_last_error`]. Instances are opaque
//! pointers created by [`ventsim_new_from_json`] and released with
//! [`ventsim_destroy`]. The header `VentSimFFI.h` is generated by the build
//! script.

mod error;
mod helpers;
mod instance;
mod queries;
mod simulation;

pub use error::{ventsim_get_last_error, ventsim_get_last_error_code, VentSimErrorCode};
pub use instance::{ventsim_destroy, ventsim_new_from_json, VentSimInstance};
pub use queries::{
    ventsim_copy_concentration, ventsim_copy_dead_zone_map, ventsim_copy_velocity_field,
    ventsim_free_string, ventsim_get_results_json, ventsim_get_stats,
    ventsim_recommend_sterilizer_count, ventsim_ventilation_score, VentSimStats,
};
pub use simulation::{ventsim_cancel, ventsim_simulate, ventsim_step};
