use forest_fire_core::StepReport;
use std::os::raw::c_char;

use crate::error::ForestFireErrorCode;
use crate::helpers::{handle_ffi_result, instance_from_ptr, with_simulation_mut, write_out};
use crate::instance::{FfiSimulation, ForestFireInstance, RawConfigPtrs};

/// Outcome of a step, laid out for C callers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestFireStepReport {
    /// True while any cell is burning. Stop stepping once this is false.
    pub fire_remains: bool,
    /// Steps advanced since creation or the last reset.
    pub step_count: u64,
}

impl From<StepReport> for ForestFireStepReport {
    fn from(report: StepReport) -> Self {
        Self {
            fire_remains: report.fire_remains,
            step_count: report.step_count,
        }
    }
}

/// Advance the simulation by one step.
///
/// Once the fire has burned out this is a no-op that reports the final state.
/// Pacing (manual stepping or a timer) is up to the caller.
///
/// Thread-safe: acquires `RwLock` write lock for the step.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `forest_fire_new`.
/// - `out_report` must be null or valid for writes; if null the report is discarded.
#[no_mangle]
pub unsafe extern "C" fn forest_fire_step(
    ptr: *const ForestFireInstance,
    out_report: *mut ForestFireStepReport,
) -> ForestFireErrorCode {
    handle_ffi_result(|| {
        // SAFETY: caller contract.
        let instance = unsafe { instance_from_ptr(ptr)? };
        let report = with_simulation_mut(instance, FfiSimulation::step)?;
        if out_report.is_null() {
            return Ok(());
        }
        // SAFETY: non-null and writable per caller contract.
        unsafe { write_out(out_report, report.into(), "out_report") }
    })
}

/// Step until the fire burns out or `max_steps` steps have run (0 = no limit).
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `forest_fire_new`.
/// - `out_steps` must be a valid, non-null pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn forest_fire_run_to_completion(
    ptr: *const ForestFireInstance,
    max_steps: u64,
    out_steps: *mut u64,
) -> ForestFireErrorCode {
    handle_ffi_result(|| {
        // SAFETY: caller contract.
        let instance = unsafe { instance_from_ptr(ptr)? };
        let limit = (max_steps > 0).then_some(max_steps);
        let steps = with_simulation_mut(instance, |sim| sim.run_to_completion(limit))?;
        // SAFETY: caller contract.
        unsafe { write_out(out_steps, steps, "out_steps") }
    })
}

/// Restore the initial grid of the current configuration and zero the step count.
///
/// # Safety
/// `ptr` must be a valid pointer returned by `forest_fire_new`.
#[no_mangle]
pub unsafe extern "C" fn forest_fire_reset(ptr: *const ForestFireInstance) -> ForestFireErrorCode {
    handle_ffi_result(|| {
        // SAFETY: caller contract.
        let instance = unsafe { instance_from_ptr(ptr)? };
        with_simulation_mut(instance, FfiSimulation::reset)
    })
}

/// Validate a new configuration and restart the simulation with it.
///
/// On `ForestFireErrorCode::InvalidConfig` the running simulation is left
/// exactly as it was; the caller can keep stepping it.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `forest_fire_new`.
/// - String pointers must be valid null-terminated C strings.
#[no_mangle]
pub unsafe extern "C" fn forest_fire_reconfigure(
    ptr: *const ForestFireInstance,
    height: *const c_char,
    width: *const c_char,
    probability: *const c_char,
    ignition: *const c_char,
) -> ForestFireErrorCode {
    handle_ffi_result(|| {
        // SAFETY: caller contract.
        let instance = unsafe { instance_from_ptr(ptr)? };
        let raw = RawConfigPtrs {
            height,
            width,
            probability,
            ignition,
        };
        // SAFETY: caller contract.
        let raw = unsafe { raw.read()? };
        with_simulation_mut(instance, |sim| sim.reconfigure(&raw))??;
        Ok(())
    })
}
