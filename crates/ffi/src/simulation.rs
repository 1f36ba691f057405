use std::sync::atomic::Ordering;

use tracing::debug;

use crate::error::{DefaultVentSimError, VentSimErrorCode};
use crate::helpers::{instance_from_ptr, to_code, track_result, with_sim_mut};
use crate::instance::VentSimInstance;

/// Advance one timestep.
///
/// # Safety
/// `ptr` must be a valid pointer returned by `ventsim_new_from_json` or null.
#[no_mangle]
pub unsafe extern "C" fn ventsim_step(ptr: *const VentSimInstance) -> VentSimErrorCode {
    to_code(unsafe {
        with_sim_mut(ptr, |sim, _| {
            sim.step();
            Ok(())
        })
    })
}

/// Run `steps` timesteps, blocking until done or cancelled.
///
/// Returns
/// - `VentSimErrorCode::Ok` when every step completed
/// - `VentSimErrorCode::Cancelled` if `ventsim_cancel` was called; the grid
///   holds the state after the last completed step
/// - `VentSimErrorCode::Unstable` if the lattice produced NaN/Inf
///
/// # Safety
/// `ptr` must be a valid pointer returned by `ventsim_new_from_json` or null.
#[no_mangle]
pub unsafe extern "C" fn ventsim_simulate(
    ptr: *const VentSimInstance,
    steps: u64,
) -> VentSimErrorCode {
    to_code(unsafe {
        with_sim_mut(ptr, |sim, instance| {
            debug!("FFI simulate: {} steps", steps);
            let result = sim.simulate_with_cancel(steps, &instance.cancel);
            instance.cancel.store(false, Ordering::Relaxed);
            result.map_err(DefaultVentSimError::from)
        })
    })
}

/// Ask a running `ventsim_simulate` to stop before its next timestep.
///
/// Does not take the simulation lock, so it is safe to call from another
/// thread while `ventsim_simulate` is blocking. A request made while no run
/// is active stops the next run before its first step.
///
/// # Safety
/// `ptr` must be a valid pointer returned by `ventsim_new_from_json` or null.
#[no_mangle]
pub unsafe extern "C" fn ventsim_cancel(ptr: *const VentSimInstance) -> VentSimErrorCode {
    match track_result(unsafe { instance_from_ptr(ptr) }) {
        Ok(instance) => {
            instance.cancel.store(true, Ordering::Relaxed);
            VentSimErrorCode::Ok
        }
        Err(code) => code,
    }
}
