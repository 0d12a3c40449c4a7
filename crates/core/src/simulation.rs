//! Simulation run owned by a driver
//!
//! [`Simulation`] pairs a validated configuration with the current grid, the
//! step counter and the random source. A driver calls [`Simulation::step`]
//! once per tick (manual stepping, or on a timer of its own choosing) and
//! stops when the report says no fire remains.

use crate::config::{parse, Configuration, RawConfig};
use crate::error::ValidationError;
use crate::grid::{CellCounts, Grid};
use crate::step::advance;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Result of one driver tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// True while any cell is burning
    pub fire_remains: bool,
    /// Number of steps advanced since the last reset
    pub step_count: u64,
}

/// Owned view of a run, suitable for handing to a renderer or serializing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub grid: Grid,
    pub step: u64,
    /// True once no cell is burning
    pub complete: bool,
}

/// A single forest fire run
///
/// Generic over the random source so tests can inject their own; the default
/// is a seeded [`StdRng`].
#[derive(Debug, Clone)]
pub struct Simulation<R = StdRng> {
    config: Configuration,
    grid: Grid,
    step_count: u64,
    running: bool,
    rng: R,
}

impl Simulation<StdRng> {
    /// Create a run whose random stream is fully determined by `seed`
    #[must_use]
    pub fn new(config: Configuration, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Validate raw input and create a run from it
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] from [`parse`]; no run is created.
    pub fn from_raw(raw: &RawConfig, seed: u64) -> Result<Self, ValidationError> {
        Ok(Self::new(parse(raw)?, seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Create a run that draws from the given random source
    pub fn with_rng(config: Configuration, rng: R) -> Self {
        let grid = Grid::create(&config);
        let running = grid.has_fire();
        info!(
            "Created {}x{} forest, spread probability {:.3}, {} burning cell(s)",
            config.height(),
            config.width(),
            config.spread_probability(),
            grid.counts().fires
        );
        Self {
            config,
            grid,
            step_count: 0,
            running,
            rng,
        }
    }

    /// Advance one step
    ///
    /// Once the fire has burned out this is a no-op: the grid is unchanged
    /// and the step counter does not move.
    pub fn step(&mut self) -> StepReport {
        if !self.running {
            return self.report();
        }

        let (next, fire_remains) =
            advance(&self.grid, self.config.spread_probability(), &mut self.rng);
        self.grid = next;
        self.step_count += 1;
        self.running = fire_remains;

        let counts = self.grid.counts();
        debug!(
            "Step {}: {} burning, {} trees, {} ash",
            self.step_count, counts.fires, counts.trees, counts.ashes
        );
        if !fire_remains {
            info!(
                "Fire burned out after {} step(s), {:.1}% of the forest burned",
                self.step_count,
                self.grid.burned_fraction() * 100.0
            );
        }

        self.report()
    }

    /// Step until the fire burns out or `max_steps` steps have run
    ///
    /// # Returns
    ///
    /// Number of steps executed by this call
    pub fn run_to_completion(&mut self, max_steps: Option<u64>) -> u64 {
        self.run_with_observer(max_steps, |_, _| {})
    }

    /// Like [`run_to_completion`](Self::run_to_completion), calling
    /// `observer` with the new grid and report after every step
    pub fn run_with_observer<F>(&mut self, max_steps: Option<u64>, mut observer: F) -> u64
    where
        F: FnMut(&Grid, StepReport),
    {
        let mut executed = 0;
        while self.running && !max_steps.is_some_and(|max| executed >= max) {
            let report = self.step();
            executed += 1;
            observer(&self.grid, report);
        }
        executed
    }

    /// Rebuild the initial grid from the current configuration
    ///
    /// The random stream is not rewound, so a reset run generally burns
    /// differently from the first.
    pub fn reset(&mut self) {
        self.grid = Grid::create(&self.config);
        self.step_count = 0;
        self.running = self.grid.has_fire();
        debug!("Simulation reset");
    }

    /// Validate new raw input and restart with it
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] if the input is rejected. The current
    /// configuration, grid and step count are left exactly as they were.
    pub fn reconfigure(&mut self, raw: &RawConfig) -> Result<(), ValidationError> {
        match parse(raw) {
            Ok(config) => {
                self.replace_config(config);
                Ok(())
            }
            Err(err) => {
                warn!("Rejected configuration: {}", err);
                Err(err)
            }
        }
    }

    /// Restart with an already-validated configuration
    pub fn replace_config(&mut self, config: Configuration) {
        info!(
            "Reconfigured to {}x{}, spread probability {:.3}",
            config.height(),
            config.width(),
            config.spread_probability()
        );
        self.config = config;
        self.reset();
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// True while the fire has not burned out
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn counts(&self) -> CellCounts {
        self.grid.counts()
    }

    #[must_use]
    pub fn report(&self) -> StepReport {
        StepReport {
            fire_remains: self.running,
            step_count: self.step_count,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            step: self.step_count,
            complete: !self.running,
        }
    }
}
