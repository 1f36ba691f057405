use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use ventsim_core::{ConfigError, SimulationError};

/// Common interface for FFI error types.
///
/// - `code()` - the error code passed across the FFI boundary
/// - `msg()` - the message kept for `ventsim_get_last_error`
pub(crate) trait VentSimError {
    fn code(&self) -> VentSimErrorCode;

    fn msg(&self) -> &str;
}

/// Default implementation of `VentSimError` for every failure the C API reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultVentSimError {
    code: VentSimErrorCode,
    msg: String,
}

impl DefaultVentSimError {
    /// Null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: VentSimErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Lock poisoned by a panic on another thread
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: VentSimErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Invalid argument that is not a configuration problem
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: VentSimErrorCode::InvalidParameter,
            msg: message,
        }
    }

    /// Caller-provided buffer shorter than the grid
    ///
    /// # Arguments
    /// * `param_name` - The buffer parameter (e.g., `"out_ux"`)
    /// * `required` - Cells needed
    /// * `provided` - Length passed by the caller
    pub fn buffer_too_small(param_name: &str, required: usize, provided: usize) -> Self {
        Self {
            code: VentSimErrorCode::BufferTooSmall,
            msg: format!("Buffer '{param_name}' holds {provided} values but {required} are required"),
        }
    }
}

impl From<ConfigError> for DefaultVentSimError {
    fn from(error: ConfigError) -> Self {
        Self {
            code: VentSimErrorCode::InvalidConfig,
            msg: error.to_string(),
        }
    }
}

impl From<SimulationError> for DefaultVentSimError {
    fn from(error: SimulationError) -> Self {
        let code = match error {
            SimulationError::Unstable { .. } => VentSimErrorCode::Unstable,
            SimulationError::Cancelled { .. } => VentSimErrorCode::Cancelled,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl VentSimError for DefaultVentSimError {
    fn code(&self) -> VentSimErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by ventilation simulation functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VentSimErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Configuration rejected at setup (bad JSON, zero grid, zero radius, ...).
    InvalidConfig = 3,

    /// Invalid parameter passed to function.
    InvalidParameter = 4,

    /// Output buffer shorter than `width * height`.
    BufferTooSmall = 5,

    /// The lattice produced NaN/Inf; the run should be discarded.
    Unstable = 6,

    /// `ventsim_cancel` stopped the run between timesteps.
    Cancelled = 7,
}

impl From<DefaultVentSimError> for VentSimErrorCode {
    fn from(error: DefaultVentSimError) -> Self {
        error.code
    }
}

thread_local! {
    /// Most recent FFI error on this thread (C string, error code).
    /// The CString is kept here so pointers handed out stay valid.
    static LAST_ERROR: RefCell<(Option<CString>, VentSimErrorCode)> = const { RefCell::new((None, VentSimErrorCode::Ok)) };
}

pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, VentSimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, VentSimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded.
///
/// # Thread Safety
/// Error state is thread-local; each thread sees only its own failures.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// VentSimInstance* sim = nullptr;
/// VentSimErrorCode err = ventsim_new_from_json(json, &sim);
/// if (err != VentSimErrorCode::Ok) {
///     const char* error = ventsim_get_last_error();
///     if (error) {
///         printf("Setup failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn ventsim_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` after a successful call).
#[no_mangle]
pub extern "C" fn ventsim_get_last_error_code() -> VentSimErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
