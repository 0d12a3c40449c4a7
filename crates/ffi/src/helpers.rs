use crate::error::{with_last_error_mut, DefaultForestFireError, ForestFireError, ForestFireErrorCode};
use crate::instance::{FfiSimulation, ForestFireInstance};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Set the thread-local error message and code.
/// Internal helper for FFI functions to record failure details.
pub(crate) fn set_last_error(error: &impl ForestFireError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl ForestFireError) -> ForestFireErrorCode {
    set_last_error(error);
    error.code()
}

/// Track the error side of a result, passing the success value through.
pub(crate) fn track_result<T, E: ForestFireError>(result: Result<T, E>) -> Result<T, ForestFireErrorCode> {
    result.map_err(|error| track_error(&error))
}

/// Clear the thread-local error message and code.
/// Internal helper called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = ForestFireErrorCode::Ok;
    });
}

/// Run an FFI body, recording its error or clearing the last error on success.
pub(crate) fn handle_ffi_result<F>(body: F) -> ForestFireErrorCode
where
    F: FnOnce() -> Result<(), DefaultForestFireError>,
{
    match body() {
        Ok(()) => {
            clear_last_error();
            ForestFireErrorCode::Ok
        }
        Err(error) => track_error(&error),
    }
}

/// Borrow the instance behind an opaque pointer.
///
/// # Safety
/// `ptr` must be null or a pointer returned by `forest_fire_new` that has not
/// been destroyed.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const ForestFireInstance,
) -> Result<&'a ForestFireInstance, DefaultForestFireError> {
    // SAFETY: null is rejected; otherwise the caller guarantees a live instance.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultForestFireError::null_pointer("ptr"))
}

/// Borrow a C string argument as UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a valid null-terminated string that lives
/// for the duration of the call.
pub(crate) unsafe fn str_from_ptr<'a>(
    ptr: *const c_char,
    param_name: &str,
) -> Result<&'a str, DefaultForestFireError> {
    if ptr.is_null() {
        return Err(DefaultForestFireError::null_pointer(param_name));
    }
    // SAFETY: non-null and null-terminated per the caller contract.
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| DefaultForestFireError::invalid_string(param_name))
}

/// Write a value through an out-parameter.
///
/// # Safety
/// `out` must be null or valid for writes of `T`.
pub(crate) unsafe fn write_out<T>(
    out: *mut T,
    value: T,
    param_name: &str,
) -> Result<(), DefaultForestFireError> {
    if out.is_null() {
        return Err(DefaultForestFireError::null_pointer(param_name));
    }
    // SAFETY: non-null and writable per the caller contract.
    unsafe { out.write(value) };
    Ok(())
}

/// Run `f` with shared access to the simulation.
pub(crate) fn with_simulation<T>(
    instance: &ForestFireInstance,
    f: impl FnOnce(&FfiSimulation) -> T,
) -> Result<T, DefaultForestFireError> {
    let sim = instance
        .sim
        .read()
        .map_err(|_| DefaultForestFireError::lock_poisoned("RwLock"))?;
    Ok(f(&sim))
}

/// Run `f` with exclusive access to the simulation.
pub(crate) fn with_simulation_mut<T>(
    instance: &ForestFireInstance,
    f: impl FnOnce(&mut FfiSimulation) -> T,
) -> Result<T, DefaultForestFireError> {
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| DefaultForestFireError::lock_poisoned("RwLock"))?;
    Ok(f(&mut sim))
}
