//! Deconfliction CLI - check a primary drone mission against other missions.
//!
//! Usage:
//!   cargo run -p deconflict-cli --bin deconflict -- demo
//!   cargo run -p deconflict-cli --bin deconflict -- demo --scenario head-on --plot plot.json
//!   cargo run -p deconflict-cli --bin deconflict -- check missions.json --strategy grid

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use deconflict_cli::output::{
    apply_threshold_overrides, load_scenario, render_report, write_plot,
};
use deconflict_cli::scenarios::{
    create_converging_scenario, create_head_on_scenario, create_reference_scenario,
};
use deconflict_core::{ConflictDetector, ConflictReport, DetectionStrategy, Scenario};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Available demo scenarios
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScenarioType {
    /// Reference three-drone example, no conflict
    Clear,
    /// Two drones passing head-on
    HeadOn,
    /// Four drones converging on the primary's path
    Converging,
}

/// Detection strategy selector
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    BruteForce,
    Grid,
    Parallel,
}

impl From<StrategyArg> for DetectionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::BruteForce => DetectionStrategy::BruteForce,
            StrategyArg::Grid => DetectionStrategy::Grid,
            StrategyArg::Parallel => DetectionStrategy::Parallel,
        }
    }
}

/// Spatio-temporal conflict checks for drone missions
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a built-in scenario
    Demo {
        /// Scenario to check
        #[arg(long, value_enum, default_value = "clear")]
        scenario: ScenarioType,

        #[command(flatten)]
        opts: RunOpts,
    },
    /// Check a JSON scenario file
    Check {
        /// Scenario document with `primary`, `others` and optional `rules`
        file: PathBuf,

        /// Override the minimum separation distance
        #[arg(long)]
        safe_distance: Option<f64>,

        /// Override the time window
        #[arg(long)]
        time_window: Option<f64>,

        #[command(flatten)]
        opts: RunOpts,
    },
}

#[derive(Args, Debug)]
struct RunOpts {
    /// How waypoint pairs are enumerated
    #[arg(long, value_enum, default_value = "brute-force")]
    strategy: StrategyArg,

    /// Print the full report as JSON instead of the one-line verdict
    #[arg(long)]
    json: bool,

    /// Write a plot description (JSON) to this path
    #[arg(long)]
    plot: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("deconflict=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Demo { scenario, opts } => {
            let scenario = match scenario {
                ScenarioType::Clear => create_reference_scenario(),
                ScenarioType::HeadOn => create_head_on_scenario(),
                ScenarioType::Converging => create_converging_scenario(),
            };
            run(&scenario, &opts)
        }
        Command::Check {
            file,
            safe_distance,
            time_window,
            opts,
        } => {
            let mut scenario = load_scenario(&file)?;
            apply_threshold_overrides(&mut scenario, safe_distance, time_window)?;
            run(&scenario, &opts)
        }
    }
}

fn run(scenario: &Scenario, opts: &RunOpts) -> Result<()> {
    scenario.validate().context("scenario rejected")?;

    let detector = ConflictDetector::new(scenario.rules_or_default(), opts.strategy.into());
    tracing::info!(
        primary = %scenario.primary.drone_id,
        others = scenario.others.len(),
        safe_distance = detector.rules.safe_distance,
        time_window = detector.rules.time_window,
        strategy = %detector.strategy,
        "checking mission"
    );

    let report = ConflictReport::run(&detector, &scenario.primary, &scenario.others);
    if !report.is_clear() {
        tracing::warn!("Detected {} conflict(s)", report.conflicts.len());
    }

    println!("{}", render_report(&report, opts.json)?);

    if let Some(path) = &opts.plot {
        write_plot(path, scenario, &report)?;
    }

    Ok(())
}
