//! Scripted scenarios for the runner.
//!
//! A scenario is a YAML file naming a location, a mission, the baseline
//! readings to start from, and the actions to perform at given ticks:
//!
//! ```yaml
//! name: Downtown morning
//! location: { name: Downtown, latitude: 34.05, longitude: -118.24, area: 0.0 }
//! mission:
//!   name: Clean Downtown
//!   target_aqi: 100
//!   time_limit: 600.0
//! baseline:
//!   - { pm25: 40.0, pm10: 55.0, no2: 30.0, o3: 40.0, co: 0.8, so2: 3.0,
//!       timestamp: "2026-06-01T08:00:00Z", source: observed }
//! actions:
//!   - { tick: 0, action_type: plant_tree, area: 100.0 }
//! tick_interval_ms: 1000
//! time_scale: 60.0
//! ```

use std::path::Path;

use clearsky_types::{ActionType, AirQualitySample, Location, Mission, ObjectiveType};
use serde::Deserialize;

/// Errors that can occur when loading a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Failed to read the scenario file from disk.
    #[error("failed to read scenario file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse scenario YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ScenarioError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// A scripted mission run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    /// Display name, echoed in the run summary.
    pub name: String,
    /// Where the mission takes place.
    pub location: Location,
    /// Mission definition.
    pub mission: Mission,
    /// Baseline readings; the most recent becomes the starting sample.
    pub baseline: Vec<AirQualitySample>,
    /// Actions to perform, keyed by tick.
    #[serde(default)]
    pub actions: Vec<ScriptedAction>,
    /// Externally measured objective progress, keyed by tick.
    #[serde(default)]
    pub progress: Vec<ScriptedProgress>,
    /// Wall-clock milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Mission seconds per wall-clock second.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    /// Stop after this many ticks. Zero means no limit.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

/// One action fired at a given tick.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptedAction {
    /// Tick at which to fire, counted from zero.
    pub tick: u64,
    /// The intervention to perform.
    pub action_type: ActionType,
    /// Affected area, square meters.
    #[serde(default)]
    pub area: f64,
}

/// External objective progress reported at a given tick.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptedProgress {
    /// Tick at which to report, counted from zero.
    pub tick: u64,
    /// The objective receiving progress.
    pub objective_type: ObjectiveType,
    /// Amount of progress.
    pub amount: f64,
}

impl Scenario {
    /// Load a scenario from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a scenario from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = serde_yml::from_str(yaml)?;
        Ok(scenario)
    }

    /// Actions scheduled for `tick`, in file order.
    pub fn actions_at(&self, tick: u64) -> impl Iterator<Item = &ScriptedAction> {
        self.actions.iter().filter(move |action| action.tick == tick)
    }

    /// Progress reports scheduled for `tick`, in file order.
    pub fn progress_at(&self, tick: u64) -> impl Iterator<Item = &ScriptedProgress> {
        self.progress.iter().filter(move |report| report.tick == tick)
    }
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_time_scale() -> f64 {
    1.0
}

const fn default_max_ticks() -> u64 {
    3600
}
