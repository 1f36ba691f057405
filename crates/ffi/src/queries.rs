use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use ventsim_core::diagnostics::{
    recommend_sterilizer_count, ventilation_score, DeadZoneMap, DiagnosticParams, FlowStats,
};

use crate::error::{DefaultVentSimError, VentSimErrorCode};
use crate::helpers::{copy_to_buffer, to_code, track_error, track_result, with_sim};
use crate::instance::VentSimInstance;

#[repr(C)]
/// FFI-friendly summary of the current simulation state.
/// Keep this layout stable for C/C++/C# consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VentSimStats {
    /// Grid width in cells.
    pub width: usize,

    /// Grid height in cells.
    pub height: usize,

    /// Timesteps run since creation.
    pub steps_run: u64,

    /// Mean velocity magnitude over non-Wall cells (lattice units).
    pub avg_velocity: f32,

    /// Largest velocity magnitude (lattice units).
    pub max_velocity: f32,

    /// Number of stagnant cells.
    pub dead_zone_count: usize,

    /// Stagnant share of non-Wall cells (0 - 100).
    pub dead_zone_percentage: f32,

    /// Mean contaminant concentration over non-Wall cells (0 - 1).
    pub avg_concentration: f32,

    /// Ventilation score (0 - 100).
    pub score: u32,
}

/// Fill `out_stats` with the current summary statistics.
///
/// Thread-safe: takes the read lock.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `ventsim_new_from_json` or null.
/// - `out_stats` must be a valid, non-null pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn ventsim_get_stats(
    ptr: *const VentSimInstance,
    out_stats: *mut VentSimStats,
) -> VentSimErrorCode {
    if out_stats.is_null() {
        return track_error(&DefaultVentSimError::null_pointer("out_stats"));
    }

    to_code(unsafe {
        with_sim(ptr, |sim| {
            let grid = sim.grid();
            let flow = FlowStats::compute(grid);
            let dead = DeadZoneMap::detect(grid, sim.params().dead_zone_threshold);
            let stats = VentSimStats {
                width: grid.width(),
                height: grid.height(),
                steps_run: sim.steps_run(),
                avg_velocity: flow.avg_velocity,
                max_velocity: flow.max_velocity,
                dead_zone_count: dead.count,
                dead_zone_percentage: dead.percentage,
                avg_concentration: flow.avg_concentration,
                score: ventilation_score(flow.avg_velocity, dead.percentage),
            };
            // SAFETY: checked non-null above
            *out_stats = stats;
            Ok(())
        })
    })
}

/// Copy the velocity and density fields (row-major, `width * height` each).
///
/// Returns `VentSimErrorCode::BufferTooSmall` if `len` is shorter than the grid.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `ventsim_new_from_json` or null.
/// - `out_ux`, `out_uy`, `out_density` must each be valid for `len` writes.
#[no_mangle]
pub unsafe extern "C" fn ventsim_copy_velocity_field(
    ptr: *const VentSimInstance,
    out_ux: *mut f32,
    out_uy: *mut f32,
    out_density: *mut f32,
    len: usize,
) -> VentSimErrorCode {
    to_code(unsafe {
        with_sim(ptr, |sim| {
            let grid = sim.grid();
            copy_to_buffer("out_ux", grid.ux().as_slice(), out_ux, len)?;
            copy_to_buffer("out_uy", grid.uy().as_slice(), out_uy, len)?;
            copy_to_buffer("out_density", grid.density().as_slice(), out_density, len)
        })
    })
}

/// Copy the concentration field (row-major, `width * height`).
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `ventsim_new_from_json` or null.
/// - `out_concentration` must be valid for `len` writes.
#[no_mangle]
pub unsafe extern "C" fn ventsim_copy_concentration(
    ptr: *const VentSimInstance,
    out_concentration: *mut f32,
    len: usize,
) -> VentSimErrorCode {
    to_code(unsafe {
        with_sim(ptr, |sim| {
            copy_to_buffer(
                "out_concentration",
                sim.grid().concentration().as_slice(),
                out_concentration,
                len,
            )
        })
    })
}

/// Copy the 0/1 dead-zone map (row-major, `width * height`).
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `ventsim_new_from_json` or null.
/// - `out_map` must be valid for `len` writes.
#[no_mangle]
pub unsafe extern "C" fn ventsim_copy_dead_zone_map(
    ptr: *const VentSimInstance,
    out_map: *mut u8,
    len: usize,
) -> VentSimErrorCode {
    to_code(unsafe {
        with_sim(ptr, |sim| {
            let dead = DeadZoneMap::detect(sim.grid(), sim.params().dead_zone_threshold);
            copy_to_buffer("out_map", &dead.map, out_map, len)
        })
    })
}

/// Serialize the full result structure to JSON.
///
/// On success `out_json` receives an owned string that MUST be released with
/// `ventsim_free_string`. On failure it is set to null.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `ventsim_new_from_json` or null.
/// - `out_json` must be a valid, non-null pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn ventsim_get_results_json(
    ptr: *const VentSimInstance,
    out_json: *mut *mut c_char,
) -> VentSimErrorCode {
    if out_json.is_null() {
        return track_error(&DefaultVentSimError::null_pointer("out_json"));
    }
    unsafe { *out_json = ptr::null_mut() };

    let result = unsafe {
        with_sim(ptr, |sim| {
            let json = sim.results().to_json()?;
            CString::new(json).map_err(|e| {
                DefaultVentSimError::invalid_parameter(format!("result JSON contains NUL: {e}"))
            })
        })
    };

    match track_result(result) {
        Ok(cstring) => {
            unsafe { *out_json = cstring.into_raw() };
            VentSimErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Free a string returned by `ventsim_get_results_json`. Null is a no-op.
///
/// # Safety
/// `s` must come from `ventsim_get_results_json` and not be freed already.
#[no_mangle]
pub unsafe extern "C" fn ventsim_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    // SAFETY: produced by CString::into_raw in ventsim_get_results_json
    unsafe { drop(CString::from_raw(s)) };
}

/// Ventilation score (0 - 100) for an average velocity and dead-zone percentage.
#[no_mangle]
pub extern "C" fn ventsim_ventilation_score(avg_velocity: f32, dead_zone_percentage: f32) -> u32 {
    ventilation_score(avg_velocity, dead_zone_percentage)
}

/// Recommended sterilizer count for a score, dead-zone ratio (0 - 1) and
/// room area in m². Pass a non-finite area to use the default 30 m².
#[no_mangle]
pub extern "C" fn ventsim_recommend_sterilizer_count(
    score: u32,
    dead_zone_ratio: f32,
    room_area: f32,
) -> u32 {
    recommend_sterilizer_count(score, dead_zone_ratio, room_area, &DiagnosticParams::default())
}
