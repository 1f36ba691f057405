use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;
use std::sync::atomic::AtomicBool;
use std::sync::RwLock;

use tracing::info;
use ventsim_core::VentilationSimulation;

use crate::error::{DefaultVentSimError, VentSimErrorCode};
use crate::helpers::{track_error, track_result};

/// One ventilation simulation behind an opaque pointer.
///
/// # Thread Safety
/// The simulation sits behind an `RwLock`: queries take the read lock, while
/// `ventsim_step` and `ventsim_simulate` take the write lock for the whole
/// call. The cancellation flag lives outside the lock so `ventsim_cancel`
/// can reach a running `ventsim_simulate` from another thread.
///
/// ```cpp
/// VentSimInstance* sim = nullptr;
/// if (ventsim_new_from_json(config_json, &sim) != VentSimErrorCode::Ok) {
///     fprintf(stderr, "%s\n", ventsim_get_last_error());
///     return;
/// }
/// ventsim_simulate(sim, 500);
/// VentSimStats stats;
/// ventsim_get_stats(sim, &stats);
/// ventsim_destroy(sim);
/// ```
pub struct VentSimInstance {
    pub(crate) sim: RwLock<VentilationSimulation>,
    /// Raised by `ventsim_cancel`, consumed when a `ventsim_simulate` call returns
    pub(crate) cancel: AtomicBool,
}

impl VentSimInstance {
    /// Parse and validate a JSON config, then build the grid.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for malformed JSON or any setup validation failure.
    pub(crate) fn from_json(json: &str) -> Result<Self, DefaultVentSimError> {
        let sim = VentilationSimulation::from_json(json)?;
        Ok(Self {
            sim: RwLock::new(sim),
            cancel: AtomicBool::new(false),
        })
    }
}

/// Create a simulation from a JSON configuration and return it via out-parameter.
///
/// The JSON uses the camel-cased setup schema: `gridWidth`, `gridHeight`,
/// `obstacles`, `inlets`, `outlets`, `acUnits`, `sterilizers`, `purifiers`,
/// `ventilators` and an optional `params` object.
///
/// Returns
/// - `VentSimErrorCode::Ok` (0) on success, `out_instance` holds the new instance
/// - `VentSimErrorCode::NullPointer` if either pointer is null
/// - `VentSimErrorCode::InvalidParameter` if the string is not UTF-8
/// - `VentSimErrorCode::InvalidConfig` if the config is malformed or invalid
///
/// On failure `out_instance` is set to null.
///
/// # Safety
///
/// - `config_json` must be a valid null-terminated C string.
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller owns the returned instance and MUST call `ventsim_destroy`
///   exactly once.
#[no_mangle]
pub unsafe extern "C" fn ventsim_new_from_json(
    config_json: *const c_char,
    out_instance: *mut *mut VentSimInstance,
) -> VentSimErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultVentSimError::null_pointer("out_instance"));
    }
    // Null on every error path
    unsafe {
        *out_instance = ptr::null_mut();
    }
    if config_json.is_null() {
        return track_error(&DefaultVentSimError::null_pointer("config_json"));
    }

    // SAFETY: non-null, caller guarantees a null-terminated string
    let json = match unsafe { CStr::from_ptr(config_json) }.to_str() {
        Ok(s) => s,
        Err(e) => {
            return track_error(&DefaultVentSimError::invalid_parameter(format!(
                "config_json is not valid UTF-8: {e}"
            )))
        }
    };

    match track_result(VentSimInstance::from_json(json)) {
        Ok(instance) => {
            info!("Created ventilation simulation via FFI");
            unsafe {
                *out_instance = Box::into_raw(Box::new(instance));
            }
            VentSimErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Destroy an instance created by `ventsim_new_from_json`. Null is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `ventsim_new_from_json` and not
///   destroyed already.
/// - No other thread may be using the instance.
#[no_mangle]
pub unsafe extern "C" fn ventsim_destroy(ptr: *mut VentSimInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: produced by Box::into_raw in ventsim_new_from_json and not yet freed
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
