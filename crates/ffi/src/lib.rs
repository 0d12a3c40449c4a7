//! C ABI for the forest fire simulation
//!
//! Lets a presentation layer written in another language (C, C++, C#, game
//! engines) create a run from the raw text a user typed, step it on its own
//! timer and read the grid back for drawing. The header `ForestFireFFI.h` is
//! generated by `build.rs`.
//!
//! Every fallible function returns a [`ForestFireErrorCode`]; on failure the
//! message is available from [`forest_fire_get_last_error`] on the same thread.

mod error;
mod helpers;
mod instance;
mod queries;
mod simulation;

pub use error::{forest_fire_get_last_error, forest_fire_get_last_error_code, ForestFireErrorCode};
pub use instance::{forest_fire_destroy, forest_fire_new, ForestFireInstance};
pub use queries::{
    forest_fire_cell_at, forest_fire_copy_cells, forest_fire_counts, forest_fire_dimensions,
    ForestFireCell, ForestFireCounts,
};
pub use simulation::{
    forest_fire_reconfigure, forest_fire_reset, forest_fire_run_to_completion, forest_fire_step,
    ForestFireStepReport,
};
