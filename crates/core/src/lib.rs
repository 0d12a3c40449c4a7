//! Forest Fire Simulation Core Library
//!
//! Models wildfire propagation on a rectangular grid as a discrete-time
//! cellular automaton. Trees ignite probabilistically from burning
//! orthogonal neighbours, burn for exactly one step, then become ash.
//!
//! ## Components
//!
//! - [`grid`] - the cell array: creation, seeding, bounds-checked reads
//! - [`step`] - the transition rule ([`advance`])
//! - [`config`] - raw input validation into a [`Configuration`]
//! - [`simulation`] - a driver-owned run with step counting, reset and
//!   reconfiguration
//! - [`batch`] - independent what-if runs in parallel
//!
//! The engine has no notion of rendering or timing. A driver owns a
//! [`Simulation`], calls [`Simulation::step`] at its own cadence and redraws
//! from [`Simulation::grid`] until the fire burns out.
//!
//! ```
//! use forest_fire_core::{RawConfig, Simulation};
//!
//! let raw = RawConfig::new("10", "10", "0.6", "0,0;5,5");
//! let mut sim = Simulation::from_raw(&raw, 42).expect("valid config");
//! while sim.step().fire_remains {}
//! assert!(!sim.grid().has_fire());
//! ```

pub mod batch;
pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod simulation;
pub mod step;

pub use batch::{run_batch, BatchSummary, Trial, TrialOutcome};
pub use cell::Cell;
pub use config::{parse, Configuration, IgnitionPoint, RawConfig};
pub use error::{ConfigError, Dimension, GridError, ValidationError};
pub use grid::{CellCounts, Grid};
pub use simulation::{Simulation, Snapshot, StepReport};
pub use step::advance;
