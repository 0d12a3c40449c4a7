use forest_fire_core::{Cell, CellCounts};

use crate::error::{DefaultForestFireError, ForestFireErrorCode};
use crate::helpers::{handle_ffi_result, instance_from_ptr, with_simulation, write_out};
use crate::instance::ForestFireInstance;

/// Cell state as a single byte. Keep this layout stable for C/C++/C# consumers.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForestFireCell {
    Tree = 0,
    Fire = 1,
    Ash = 2,
}

impl From<Cell> for ForestFireCell {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Tree => Self::Tree,
            Cell::Fire => Self::Fire,
            Cell::Ash => Self::Ash,
        }
    }
}

/// Per-state cell totals.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestFireCounts {
    pub trees: usize,
    pub fires: usize,
    pub ashes: usize,
}

impl From<CellCounts> for ForestFireCounts {
    fn from(counts: CellCounts) -> Self {
        Self {
            trees: counts.trees,
            fires: counts.fires,
            ashes: counts.ashes,
        }
    }
}

/// Read the state of one cell.
///
/// Returns `ForestFireErrorCode::OutOfRange` if `row >= height` or `col >= width`.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `forest_fire_new`.
/// - `out_cell` must be a valid, non-null pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn forest_fire_cell_at(
    ptr: *const ForestFireInstance,
    row: usize,
    col: usize,
    out_cell: *mut ForestFireCell,
) -> ForestFireErrorCode {
    handle_ffi_result(|| {
        // SAFETY: caller contract.
        let instance = unsafe { instance_from_ptr(ptr)? };
        let cell = with_simulation(instance, |sim| sim.grid().cell_at(row, col))??;
        // SAFETY: caller contract.
        unsafe { write_out(out_cell, cell.into(), "out_cell") }
    })
}

/// Read the grid dimensions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `forest_fire_new`.
/// - `out_height` and `out_width` must be valid, non-null pointers to writable memory.
#[no_mangle]
pub unsafe extern "C" fn forest_fire_dimensions(
    ptr: *const ForestFireInstance,
    out_height: *mut usize,
    out_width: *mut usize,
) -> ForestFireErrorCode {
    handle_ffi_result(|| {
        // SAFETY: caller contract.
        let instance = unsafe { instance_from_ptr(ptr)? };
        let (height, width) = with_simulation(instance, |sim| (sim.grid().height(), sim.grid().width()))?;
        // SAFETY: caller contract.
        unsafe {
            write_out(out_height, height, "out_height")?;
            write_out(out_width, width, "out_width")
        }
    })
}

/// Copy the whole grid, row-major, into a caller-owned buffer.
///
/// The buffer must hold at least `height * width` cells; query the size with
/// `forest_fire_dimensions`. Returns `ForestFireErrorCode::BufferTooSmall`
/// otherwise, without writing anything.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `forest_fire_new`.
/// - `out_cells` must be valid for writes of `len` `ForestFireCell` values; the
///   memory does not need to be initialized.
#[no_mangle]
pub unsafe extern "C" fn forest_fire_copy_cells(
    ptr: *const ForestFireInstance,
    out_cells: *mut ForestFireCell,
    len: usize,
) -> ForestFireErrorCode {
    handle_ffi_result(|| {
        // SAFETY: caller contract.
        let instance = unsafe { instance_from_ptr(ptr)? };
        if out_cells.is_null() {
            return Err(DefaultForestFireError::null_pointer("out_cells"));
        }
        with_simulation(instance, |sim| {
            let cells = sim.grid().cells();
            if len < cells.len() {
                return Err(DefaultForestFireError::buffer_too_small(cells.len(), len));
            }
            // Buffer may be uninitialized; never form a slice over it
            for (i, &cell) in cells.iter().enumerate() {
                // SAFETY: non-null and valid for `len >= cells.len()` writes per caller contract.
                unsafe { out_cells.add(i).write(cell.into()) };
            }
            Ok(())
        })?
    })
}

/// Read the per-state cell totals and the step count.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `forest_fire_new`.
/// - `out_counts` and `out_step_count` must be valid, non-null pointers to writable memory.
#[no_mangle]
pub unsafe extern "C" fn forest_fire_counts(
    ptr: *const ForestFireInstance,
    out_counts: *mut ForestFireCounts,
    out_step_count: *mut u64,
) -> ForestFireErrorCode {
    handle_ffi_result(|| {
        // SAFETY: caller contract.
        let instance = unsafe { instance_from_ptr(ptr)? };
        let (counts, step_count) = with_simulation(instance, |sim| (sim.counts(), sim.step_count()))?;
        // SAFETY: caller contract.
        unsafe {
            write_out(out_counts, counts.into(), "out_counts")?;
            write_out(out_step_count, step_count, "out_step_count")
        }
    })
}
