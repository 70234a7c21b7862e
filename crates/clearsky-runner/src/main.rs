//! Scenario runner binary for the Clearsky simulation.
//!
//! Loads the game balance and a scripted scenario, plays the scenario on a
//! real-time tick loop, and prints the run summary as JSON on stdout.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `CLEARSKY_CONFIG` (default
//!    `clearsky-config.yaml`; defaults if the file is missing)
//! 3. Load the scenario from `CLEARSKY_SCENARIO` (default
//!    `scenarios/downtown.yaml`)
//! 4. Start the session and run the loop
//! 5. Log and print the result

mod error;
mod runner;
mod scenario;

use std::path::PathBuf;

use clearsky_engine::{GameConfig, GameSession};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::RunnerError;
use crate::scenario::Scenario;

/// Environment variable naming the configuration file.
const CONFIG_ENV: &str = "CLEARSKY_CONFIG";
/// Environment variable naming the scenario file.
const SCENARIO_ENV: &str = "CLEARSKY_SCENARIO";

/// Application entry point for the runner.
///
/// # Errors
///
/// Returns an error if the configuration or scenario cannot be loaded, or
/// the summary cannot be serialized.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("clearsky-runner starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        safe_aqi_threshold = config.safe_aqi_threshold,
        mission_time_limit = config.mission_time_limit,
        starting_credits = config.starting_credits,
        "Configuration loaded"
    );

    // 3. Load scenario.
    let scenario = load_scenario()?;
    info!(
        scenario = %scenario.name,
        mission = %scenario.mission.name,
        baseline_samples = scenario.baseline.len(),
        "Scenario loaded"
    );

    // 4. Start the session and run.
    let mut session = GameSession::start(
        config,
        scenario.mission.clone(),
        &scenario.baseline,
        scenario.location.clone(),
    );
    let summary = runner::run_scenario(&mut session, &scenario).await;

    // 5. Report.
    runner::log_run_end(&summary);
    let json = serde_json::to_string_pretty(&summary).map_err(RunnerError::from)?;
    println!("{json}");

    Ok(())
}

/// Load game configuration, falling back to defaults when the file is
/// missing.
fn load_config() -> Result<GameConfig, RunnerError> {
    let config_path = env_path(CONFIG_ENV, "clearsky-config.yaml");
    if config_path.exists() {
        let config = GameConfig::from_file(&config_path)?;
        Ok(config)
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        Ok(GameConfig::default())
    }
}

/// Load the scenario to play. Unlike the configuration, it has no default.
fn load_scenario() -> Result<Scenario, RunnerError> {
    let scenario_path = env_path(SCENARIO_ENV, "scenarios/downtown.yaml");
    let scenario = Scenario::from_file(&scenario_path)?;
    Ok(scenario)
}

fn env_path(var: &str, default: &str) -> PathBuf {
    std::env::var_os(var).map_or_else(|| PathBuf::from(default), PathBuf::from)
}
