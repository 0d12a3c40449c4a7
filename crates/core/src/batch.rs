//! Parallel what-if runs over independent configurations
//!
//! Runs share no state, so each trial is simulated on its own rayon task.
//! Outcomes depend only on each trial's configuration and seed, never on
//! thread scheduling, and are returned in input order.

use crate::config::Configuration;
use crate::grid::CellCounts;
use crate::simulation::Simulation;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

/// One independent run to perform
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub config: Configuration,
    pub seed: u64,
    /// Optional cap on the number of steps
    pub max_steps: Option<u64>,
}

/// Final state of a finished trial
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrialOutcome {
    pub seed: u64,
    pub steps: u64,
    /// False if the step cap was hit while fire remained
    pub burned_out: bool,
    pub counts: CellCounts,
    pub burned_fraction: f32,
}

/// Aggregate statistics over a batch of outcomes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchSummary {
    pub trials: usize,
    pub mean_steps: f64,
    pub min_steps: u64,
    pub max_steps: u64,
    pub mean_burned_fraction: f64,
    pub min_burned_fraction: f32,
    pub max_burned_fraction: f32,
}

/// Build `count` trials of one configuration with consecutive seeds
#[must_use]
pub fn seeded_trials(
    config: &Configuration,
    base_seed: u64,
    count: usize,
    max_steps: Option<u64>,
) -> Vec<Trial> {
    (0..count as u64)
        .map(|i| Trial {
            config: config.clone(),
            seed: base_seed.wrapping_add(i),
            max_steps,
        })
        .collect()
}

/// Run a single trial to completion on the current thread
#[must_use]
pub fn run_trial(trial: &Trial) -> TrialOutcome {
    let mut sim = Simulation::new(trial.config.clone(), trial.seed);
    let steps = sim.run_to_completion(trial.max_steps);
    TrialOutcome {
        seed: trial.seed,
        steps,
        burned_out: !sim.is_running(),
        counts: sim.counts(),
        burned_fraction: sim.grid().burned_fraction(),
    }
}

/// Run all trials in parallel
///
/// # Returns
///
/// One outcome per trial, in the same order as `trials`
#[must_use]
pub fn run_batch(trials: &[Trial]) -> Vec<TrialOutcome> {
    info!("Running {} trial(s) in parallel", trials.len());
    trials.par_iter().map(run_trial).collect()
}

/// Summarize a batch, `None` if it is empty
#[must_use]
pub fn summarize(outcomes: &[TrialOutcome]) -> Option<BatchSummary> {
    let first = outcomes.first()?;
    let n = outcomes.len() as f64;

    let mut summary = BatchSummary {
        trials: outcomes.len(),
        mean_steps: 0.0,
        min_steps: first.steps,
        max_steps: first.steps,
        mean_burned_fraction: 0.0,
        min_burned_fraction: first.burned_fraction,
        max_burned_fraction: first.burned_fraction,
    };

    for outcome in outcomes {
        summary.mean_steps += outcome.steps as f64 / n;
        summary.mean_burned_fraction += f64::from(outcome.burned_fraction) / n;
        summary.min_steps = summary.min_steps.min(outcome.steps);
        summary.max_steps = summary.max_steps.max(outcome.steps);
        summary.min_burned_fraction = summary.min_burned_fraction.min(outcome.burned_fraction);
        summary.max_burned_fraction = summary.max_burned_fraction.max(outcome.burned_fraction);
    }

    Some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IgnitionPoint;

    fn config(p: f64) -> Configuration {
        Configuration::new(20, 20, p, vec![IgnitionPoint::new(10, 10)]).unwrap()
    }

    #[test]
    fn test_batch_matches_sequential_runs() {
        let trials = seeded_trials(&config(0.45), 100, 16, None);
        let parallel = run_batch(&trials);
        let sequential: Vec<TrialOutcome> = trials.iter().map(run_trial).collect();
        assert_eq!(parallel, sequential);
        assert_eq!(parallel[3].seed, 103);
    }

    #[test]
    fn test_certain_spread_burns_whole_forest() {
        let outcomes = run_batch(&seeded_trials(&config(1.0), 0, 4, None));
        for outcome in &outcomes {
            assert!(outcome.burned_out);
            assert_eq!(outcome.counts.ashes, 400);
            assert_eq!(outcome.burned_fraction, 1.0);
            // Farthest corner (0,0) is 20 steps away, plus one to burn out
            assert_eq!(outcome.steps, 21);
        }
    }

    #[test]
    fn test_step_cap_reported() {
        let outcome = run_trial(&Trial {
            config: config(1.0),
            seed: 9,
            max_steps: Some(2),
        });
        assert_eq!(outcome.steps, 2);
        assert!(!outcome.burned_out);
    }

    #[test]
    fn test_summary() {
        assert!(summarize(&[]).is_none());

        let outcomes = run_batch(&seeded_trials(&config(0.0), 0, 3, None));
        let summary = summarize(&outcomes).unwrap();
        assert_eq!(summary.trials, 3);
        assert_eq!(summary.min_steps, 1);
        assert_eq!(summary.max_steps, 1);
        assert!((summary.mean_steps - 1.0).abs() < 1e-9);
        assert!((summary.mean_burned_fraction - 1.0 / 400.0).abs() < 1e-6);
    }
}
