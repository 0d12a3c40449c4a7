use forest_fire_core::{GridError, ValidationError};
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// This trait provides a unified way to handle errors across the FFI boundary,
/// pairing the error code returned to C with a diagnostic message.
///
/// # Design
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait ForestFireError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> ForestFireErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `ForestFireError` for the engine's FFI failures.
///
/// This struct wraps a `ForestFireErrorCode` and provides convenient constructors
/// for each error type (except Ok, which represents success).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultForestFireError {
    code: ForestFireErrorCode,
    msg: String,
}

impl DefaultForestFireError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: ForestFireErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    ///
    /// # Arguments
    /// * `lock_name` - The name of the lock that was poisoned (e.g., `"RwLock"`)
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: ForestFireErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for a string argument that is not valid UTF-8.
    ///
    /// # Arguments
    /// * `param_name` - The name of the offending parameter (e.g., `"probability"`)
    pub fn invalid_string(param_name: &str) -> Self {
        Self {
            code: ForestFireErrorCode::InvalidString,
            msg: format!("Parameter '{param_name}' is not valid UTF-8"),
        }
    }

    /// Create error for an output buffer that cannot hold the grid.
    pub fn buffer_too_small(required: usize, provided: usize) -> Self {
        Self {
            code: ForestFireErrorCode::BufferTooSmall,
            msg: format!("Buffer holds {provided} cells, {required} required"),
        }
    }
}

impl From<ValidationError> for DefaultForestFireError {
    fn from(error: ValidationError) -> Self {
        Self {
            code: ForestFireErrorCode::InvalidConfig,
            msg: error.to_string(),
        }
    }
}

impl From<GridError> for DefaultForestFireError {
    fn from(error: GridError) -> Self {
        Self {
            code: ForestFireErrorCode::OutOfRange,
            msg: error.to_string(),
        }
    }
}

impl ForestFireError for DefaultForestFireError {
    fn code(&self) -> ForestFireErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by forest fire functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForestFireErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Configuration rejected: dimensions, probability or ignition points are invalid.
    /// The previous simulation state (if any) is unchanged.
    InvalidConfig = 3,

    /// A cell was addressed outside the grid.
    OutOfRange = 4,

    /// A string argument is not valid UTF-8.
    InvalidString = 5,

    /// Output buffer is smaller than the grid.
    BufferTooSmall = 6,
}

impl From<DefaultForestFireError> for ForestFireErrorCode {
    fn from(error: DefaultForestFireError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// Allows callers to retrieve diagnostic information after a failed call.
    /// The CString is stored to prevent memory leaks when returning raw pointers via FFI.
    static LAST_ERROR: RefCell<(Option<CString>, ForestFireErrorCode)> = const { RefCell::new((None, ForestFireErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, ForestFireErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, ForestFireErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded or the message cannot be converted to a C string.
///
/// # Thread Safety
/// Error messages are stored per-thread (thread-local storage), so this is thread-safe.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// ForestFireInstance* sim = NULL;
/// ForestFireErrorCode err = forest_fire_new("10", "10", "1.5", "0,0", 42, &sim);
/// if (err != Ok) {
///     const char* error = forest_fire_get_last_error();
///     if (error) {
///         printf("Forest fire creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn forest_fire_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns:
/// - `ForestFireErrorCode::Ok` (0) if the last call on this thread succeeded
/// - The specific error code from the last failed operation
#[no_mangle]
pub extern "C" fn forest_fire_get_last_error_code() -> ForestFireErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
