use clap::Parser;
use forest_fire_core::batch::{seeded_trials, summarize};
use forest_fire_core::{run_batch, ConfigError, Configuration, RawConfig, Simulation};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Forest fire simulation demo with configurable parameters
///
/// Values are passed as text and validated by the engine, the same way a UI
/// would forward what a user typed.
#[derive(Parser, Debug)]
#[command(name = "forest-fire-demo")]
#[command(about = "Forest fire cellular automaton demo", long_about = None)]
struct Args {
    /// Forest height in cells (5-100)
    #[arg(long)]
    height: Option<String>,

    /// Forest width in cells (5-100)
    #[arg(long)]
    width: Option<String>,

    /// Probability (0-1) that fire spreads to each adjacent tree per step
    #[arg(short, long)]
    probability: Option<String>,

    /// Initial fire positions, "row1,col1;row2,col2;..."
    #[arg(short, long)]
    ignition: Option<String>,

    /// TOML config file; the options above override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Stop after this many steps even if fire remains
    #[arg(long)]
    max_steps: Option<u64>,

    /// Delay between steps in milliseconds (0 = as fast as possible)
    #[arg(long, default_value_t = 0)]
    interval_ms: u64,

    /// Print the grid after every step
    #[arg(short = 'g', long)]
    show_grid: bool,

    /// Run this many seeded what-if trials in parallel instead of a single run
    #[arg(short, long, default_value_t = 0)]
    trials: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("forest_fire_core=info")),
        )
        // Keep stdout for the step table
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let raw = match build_raw_config(&args) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let config = match raw.validate() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("=== Forest Fire Simulation ===\n");
    println!(
        "Forest: {}x{}, spread probability {:.2}, ignition points: {}",
        config.height(),
        config.width(),
        config.spread_probability(),
        raw.ignition_points
    );

    if args.trials > 0 {
        run_trials(&config, &args);
    } else {
        run_single(config, &args);
    }

    ExitCode::SUCCESS
}

/// Start from the config file (or defaults) and apply command-line overrides
fn build_raw_config(args: &Args) -> Result<RawConfig, ConfigError> {
    let mut raw = match &args.config {
        Some(path) => RawConfig::load(path)?,
        None => RawConfig::default(),
    };

    if let Some(height) = &args.height {
        raw.height.clone_from(height);
    }
    if let Some(width) = &args.width {
        raw.width.clone_from(width);
    }
    if let Some(probability) = &args.probability {
        raw.spread_probability.clone_from(probability);
    }
    if let Some(ignition) = &args.ignition {
        raw.ignition_points.clone_from(ignition);
    }

    Ok(raw)
}

fn run_single(config: Configuration, args: &Args) {
    let mut sim = Simulation::new(config, args.seed);
    let total = sim.counts().total();

    if args.show_grid {
        println!("\nInitial forest:\n{}", sim.grid());
    }

    if !sim.is_running() {
        println!("\nNo ignition point lies inside the forest; nothing to burn.");
        return;
    }

    println!("\nStep | Burning | Trees | Ash");
    println!("-----|---------|-------|-----");

    let interval = Duration::from_millis(args.interval_ms);
    sim.run_with_observer(args.max_steps, |grid, report| {
        let counts = grid.counts();
        println!(
            "{:4} | {:7} | {:5} | {:4}",
            report.step_count, counts.fires, counts.trees, counts.ashes
        );
        if args.show_grid {
            println!("{grid}");
        }
        if !interval.is_zero() && report.fire_remains {
            thread::sleep(interval);
        }
    });

    let counts = sim.counts();
    println!("\n=== Simulation Complete ===");
    if sim.is_running() {
        println!("Stopped after {} steps with fire remaining", sim.step_count());
    } else {
        println!("Fire burned out after {} steps", sim.step_count());
    }
    println!(
        "Burned: {} of {} cells ({:.1}%)",
        counts.burned(),
        total,
        sim.grid().burned_fraction() * 100.0
    );
}

fn run_trials(config: &Configuration, args: &Args) {
    let trials = seeded_trials(config, args.seed, args.trials, args.max_steps);
    tracing::info!("Starting {} what-if trials from seed {}", trials.len(), args.seed);
    let outcomes = run_batch(&trials);

    println!("\nSeed                 | Steps | Burned out | Burned %");
    println!("---------------------|-------|------------|---------");
    for outcome in &outcomes {
        println!(
            "{:20} | {:5} | {:>10} | {:7.1}",
            outcome.seed,
            outcome.steps,
            if outcome.burned_out { "yes" } else { "no" },
            outcome.burned_fraction * 100.0
        );
    }

    if let Some(summary) = summarize(&outcomes) {
        println!("\n=== Batch Summary ({} trials) ===", summary.trials);
        println!(
            "Steps: mean {:.1}, min {}, max {}",
            summary.mean_steps, summary.min_steps, summary.max_steps
        );
        println!(
            "Burned: mean {:.1}%, min {:.1}%, max {:.1}%",
            summary.mean_burned_fraction * 100.0,
            summary.min_burned_fraction * 100.0,
            summary.max_burned_fraction * 100.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_values_override_defaults() {
        let args = Args::parse_from(["forest-fire-demo", "--width", "30", "-p", "0.9"]);
        let raw = build_raw_config(&args).unwrap();
        assert_eq!(raw.width, "30");
        assert_eq!(raw.spread_probability, "0.9");
        assert_eq!(raw.height, RawConfig::default().height);
        assert_eq!(raw.ignition_points, RawConfig::default().ignition_points);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = Args::parse_from(["forest-fire-demo", "--config", "/nonexistent/forest.toml"]);
        assert!(matches!(build_raw_config(&args), Err(ConfigError::Io { .. })));
    }
}
