//! Sheen CLI
//!
//! Runs JSON scenarios against the showcase headlessly and prints or writes
//! the resulting report. Exits with status 1 when a scenario assertion fails.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sheen_showcase::{run_loaded_scenario, HeadlessScenario, ShowcaseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "sheen")]
#[command(author, version, about = "Scroll-driven ring showcase, headless")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless scenario
    Run {
        /// Scenario JSON file
        scenario: PathBuf,
        /// sheen.toml, or a directory containing one
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the report to this relative path instead of stdout
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// Print the default configuration as TOML
    Config {
        /// Check this file instead and print it with defaults filled in
        #[arg(long)]
        check: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    match Cli::parse().command {
        Commands::Run {
            scenario,
            config,
            report,
        } => run(&scenario, config.as_deref(), report.as_deref()),
        Commands::Config { check } => print_config(check.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<ShowcaseConfig> {
    let config = match path {
        Some(path) => ShowcaseConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ShowcaseConfig::new(),
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn run(scenario_path: &Path, config: Option<&Path>, report_path: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(config)?;
    let scenario = HeadlessScenario::from_path(scenario_path)?;
    tracing::info!(
        scenario = %scenario_path.display(),
        steps = scenario.steps.len(),
        "running scenario"
    );

    let outcome = run_loaded_scenario(&scenario, &config)?;
    let report = outcome.report();
    match report_path {
        Some(path) => {
            report
                .write_to_path(path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!(report = %path.display(), "report written");
        }
        None => report.write_to_writer(&mut io::stdout().lock())?,
    }

    if outcome.is_failed() {
        tracing::error!(
            step = ?report.failed_step_index,
            assertion = ?report.assertion,
            message = ?report.message,
            "scenario failed"
        );
        return Ok(ExitCode::FAILURE);
    }
    tracing::info!(frames = report.elapsed_frames, mode = %report.final_mode, "scenario passed");
    Ok(ExitCode::SUCCESS)
}

fn print_config(check: Option<&Path>) -> Result<ExitCode> {
    let config = match check {
        Some(path) => load_config(Some(path))?,
        None => ShowcaseConfig::new(),
    };
    print!("{}", config.to_toml().context("Failed to serialize config")?);
    Ok(ExitCode::SUCCESS)
}
