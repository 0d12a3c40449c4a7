use forest_fire_core::{RawConfig, Simulation};
use std::os::raw::c_char;
use std::ptr;
use std::sync::RwLock;

use crate::error::{DefaultForestFireError, ForestFireErrorCode};
use crate::helpers::{clear_last_error, str_from_ptr, track_error, track_result};

/// Simulation type held behind the FFI boundary (seeded `StdRng`).
pub(crate) type FfiSimulation = Simulation;

/// The forest fire simulation context.
/// Holds the current run: configuration, grid, step counter and random source.
///
/// # Thread Safety
/// `ForestFireInstance` can be shared across threads. The run is protected by
/// an `RwLock`, allowing:
/// - **Multiple concurrent readers** (cell queries, grid copies): `.read()` lock
/// - **Exclusive writer** (step, reset, reconfigure): `.write()` lock
///
/// A run is never advanced from two threads at once; concurrent
/// `forest_fire_step` calls are serialized by the lock.
///
/// # Usage
///
/// ```c
/// ForestFireInstance* sim = NULL;
/// if (forest_fire_new("20", "30", "0.55", "0,0;10,15", 42, &sim) != Ok) {
///     fprintf(stderr, "%s\n", forest_fire_get_last_error());
///     return;
/// }
///
/// // Driver-owned timer: one step per tick until the fire burns out
/// ForestFireStepReport report;
/// do {
///     forest_fire_step(sim, &report);
///     redraw(sim);
/// } while (report.fire_remains);
///
/// forest_fire_destroy(sim);
/// ```
pub struct ForestFireInstance {
    pub(crate) sim: RwLock<FfiSimulation>,
}

impl ForestFireInstance {
    /// Creates a new instance from raw configuration strings.
    ///
    /// # Errors
    ///
    /// Returns `ForestFireErrorCode::NullPointer` or `InvalidString` for unusable
    /// string arguments, and `ForestFireErrorCode::InvalidConfig` if validation fails.
    ///
    /// # Safety
    /// Each string pointer must be null or a valid null-terminated C string.
    pub(crate) unsafe fn new(
        raw: RawConfigPtrs,
        seed: u64,
    ) -> Result<Box<Self>, DefaultForestFireError> {
        // SAFETY: forwarded caller contract.
        let raw = unsafe { raw.read()? };
        let sim = Simulation::from_raw(&raw, seed)?;
        Ok(Box::new(Self {
            sim: RwLock::new(sim),
        }))
    }
}

/// The four raw configuration strings as passed across the boundary.
#[derive(Clone, Copy)]
pub(crate) struct RawConfigPtrs {
    pub height: *const c_char,
    pub width: *const c_char,
    pub probability: *const c_char,
    pub ignition: *const c_char,
}

impl RawConfigPtrs {
    /// Copy the strings into a `RawConfig`.
    ///
    /// # Safety
    /// Each pointer must be null or a valid null-terminated C string.
    pub(crate) unsafe fn read(self) -> Result<RawConfig, DefaultForestFireError> {
        // SAFETY: forwarded caller contract.
        unsafe {
            Ok(RawConfig::new(
                str_from_ptr(self.height, "height")?,
                str_from_ptr(self.width, "width")?,
                str_from_ptr(self.probability, "probability")?,
                str_from_ptr(self.ignition, "ignition")?,
            ))
        }
    }
}

/// Create a new forest fire instance and return it via out-parameter.
///
/// The configuration is given as the raw text a user typed; it is validated
/// here (dimensions 5-100, probability 0-1, ignition `"row,col;row,col"`).
/// Ignition points outside the grid are ignored.
///
/// Parameters
/// - `height`, `width`, `probability`, `ignition`: null-terminated UTF-8 strings.
/// - `seed`: random seed; the same configuration and seed always burn the same way.
/// - `out_instance`: Pointer to receive the created instance. Must be non-null.
///   - On success: set to valid `ForestFireInstance` pointer
///   - On failure: set to null
///
/// Returns
/// - `ForestFireErrorCode::Ok` (0) — success, `out_instance` contains valid pointer
/// - `ForestFireErrorCode::NullPointer` — a string or `out_instance` is null
/// - `ForestFireErrorCode::InvalidString` — a string is not UTF-8
/// - `ForestFireErrorCode::InvalidConfig` — validation failed
///
/// Error Details
/// - Call `forest_fire_get_last_error()` to retrieve human-readable error description
///
/// # Safety
///
/// - String pointers must be valid null-terminated C strings.
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller takes ownership of the returned instance and MUST call
///   `forest_fire_destroy` exactly once to avoid memory leaks.
#[no_mangle]
pub unsafe extern "C" fn forest_fire_new(
    height: *const c_char,
    width: *const c_char,
    probability: *const c_char,
    ignition: *const c_char,
    seed: u64,
    out_instance: *mut *mut ForestFireInstance,
) -> ForestFireErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultForestFireError::null_pointer("out_instance"));
    }

    let raw = RawConfigPtrs {
        height,
        width,
        probability,
        ignition,
    };

    // SAFETY: string pointers are covered by this function's contract.
    match track_result(unsafe { ForestFireInstance::new(raw, seed) }) {
        Ok(instance) => {
            clear_last_error();
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            ForestFireErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }

            code
        }
    }
}

/// Destroy a `ForestFireInstance` and free its memory.
///
/// # Safety
/// - `ptr` must be a pointer returned by `forest_fire_new`, or null (no-op).
/// - Must not be called twice on the same pointer.
#[no_mangle]
pub unsafe extern "C" fn forest_fire_destroy(ptr: *mut ForestFireInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: The pointer was created by `Box::into_raw` in `forest_fire_new`
    // and has not been freed. Converting back reclaims ownership and drops it.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
