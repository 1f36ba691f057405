use crate::error::{with_last_error_mut, DefaultVentSimError, VentSimError, VentSimErrorCode};
use crate::instance::VentSimInstance;
use std::ffi::CString;
use ventsim_core::VentilationSimulation;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl VentSimError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Clear the thread-local error after a successful call.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = VentSimErrorCode::Ok;
    });
}

/// Record an error and return its code.
#[inline]
pub(crate) fn track_error(error: &impl VentSimError) -> VentSimErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the error of a failed result, or clear the error state on success.
pub(crate) fn track_result<T>(
    result: Result<T, DefaultVentSimError>,
) -> Result<T, VentSimErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Collapse a unit result into the code returned across the boundary.
pub(crate) fn to_code(result: Result<(), DefaultVentSimError>) -> VentSimErrorCode {
    match track_result(result) {
        Ok(()) => VentSimErrorCode::Ok,
        Err(code) => code,
    }
}

/// Borrow an instance from a raw pointer.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `ventsim_new_from_json`.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const VentSimInstance,
) -> Result<&'a VentSimInstance, DefaultVentSimError> {
    if ptr.is_null() {
        return Err(DefaultVentSimError::null_pointer("ptr"));
    }
    // SAFETY: non-null and, per contract, produced by Box::into_raw and not yet destroyed
    Ok(unsafe { &*ptr })
}

/// Run `f` under the read lock.
///
/// # Safety
/// See [`instance_from_ptr`].
pub(crate) unsafe fn with_sim<F, R>(
    ptr: *const VentSimInstance,
    f: F,
) -> Result<R, DefaultVentSimError>
where
    F: FnOnce(&VentilationSimulation) -> Result<R, DefaultVentSimError>,
{
    let instance = unsafe { instance_from_ptr(ptr)? };
    let sim = instance
        .sim
        .read()
        .map_err(|_| DefaultVentSimError::lock_poisoned("sim"))?;
    f(&sim)
}

/// Run `f` under the write lock.
///
/// # Safety
/// See [`instance_from_ptr`].
pub(crate) unsafe fn with_sim_mut<F, R>(
    ptr: *const VentSimInstance,
    f: F,
) -> Result<R, DefaultVentSimError>
where
    F: FnOnce(&mut VentilationSimulation, &VentSimInstance) -> Result<R, DefaultVentSimError>,
{
    let instance = unsafe { instance_from_ptr(ptr)? };
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| DefaultVentSimError::lock_poisoned("sim"))?;
    f(&mut sim, instance)
}

/// Copy `src` into a caller buffer of `len` elements.
///
/// # Safety
/// `dst` must be null or valid for `len` writes of `T`.
pub(crate) unsafe fn copy_to_buffer<T: Copy>(
    name: &str,
    src: &[T],
    dst: *mut T,
    len: usize,
) -> Result<(), DefaultVentSimError> {
    if dst.is_null() {
        return Err(DefaultVentSimError::null_pointer(name));
    }
    if len < src.len() {
        return Err(DefaultVentSimError::buffer_too_small(name, src.len(), len));
    }
    // SAFETY: dst is non-null and the caller guarantees `len >= src.len()` writable slots
    unsafe { std::ptr::copy_nonoverlapping(src.as_ptr(), dst, src.len()) };
    Ok(())
}
