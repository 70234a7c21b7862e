//! Core records: samples, locations, simulation and player state, missions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::actions::GameAction;
use crate::aqi::compute_aqi;
use crate::enums::{AqiCategory, DataSource, ObjectiveType};
use crate::ids::MissionId;

// ---------------------------------------------------------------------------
// Air quality
// ---------------------------------------------------------------------------

/// A point-in-time pollutant reading.
///
/// The AQI is not a field: [`AirQualitySample::aqi`] derives it from `pm25`
/// on every call, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AirQualitySample {
    /// Fine particulate matter, ug/m3.
    pub pm25: f64,
    /// Coarse particulate matter, ug/m3.
    pub pm10: f64,
    /// Nitrogen dioxide, ppb.
    pub no2: f64,
    /// Ozone, ppb.
    pub o3: f64,
    /// Carbon monoxide, ppm.
    pub co: f64,
    /// Sulfur dioxide, ppb.
    pub so2: f64,
    /// When the reading was taken (or predicted for).
    pub timestamp: DateTime<Utc>,
    /// Provenance of the reading.
    pub source: DataSource,
}

impl AirQualitySample {
    /// A sample with the given PM2.5 level and every other pollutant at zero.
    pub fn from_pm25(pm25: f64, timestamp: DateTime<Utc>, source: DataSource) -> Self {
        Self {
            pm25,
            pm10: 0.0,
            no2: 0.0,
            o3: 0.0,
            co: 0.0,
            so2: 0.0,
            timestamp,
            source,
        }
        .sanitized()
    }

    /// Air Quality Index derived from `pm25`.
    pub fn aqi(&self) -> u32 {
        compute_aqi(self.pm25)
    }

    /// EPA tier of the derived AQI.
    pub fn category(&self) -> AqiCategory {
        AqiCategory::from_aqi(self.aqi())
    }

    /// Copy of the sample with every concentration floored at zero.
    ///
    /// NaN concentrations are treated as zero.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            pm25: non_negative(self.pm25),
            pm10: non_negative(self.pm10),
            no2: non_negative(self.no2),
            o3: non_negative(self.o3),
            co: non_negative(self.co),
            so2: non_negative(self.so2),
            ..self
        }
    }
}

/// Floor a concentration at zero. NaN becomes zero.
pub fn non_negative(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

/// A named place on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Location {
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Area in square meters.
    pub area: f64,
}

impl Location {
    /// Create a location.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, area: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            area,
        }
    }

    /// Same place, different affected area.
    #[must_use]
    pub fn with_area(&self, area: f64) -> Self {
        Self {
            area,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Exposure bookkeeping attached to the simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HealthImpact {
    /// Exposure at the current AQI (`aqi * exposure_factor`).
    pub current_exposure: f64,
    /// AQI at or below which the player recovers.
    pub safe_threshold: u32,
    /// Health points recovered per minute inside the safe zone.
    pub recovery_rate: f64,
}

/// Live state of a running simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SimulationState {
    /// AQI after every applied action.
    pub current_aqi: u32,
    /// AQI at mission start. Never changes after initialization.
    pub baseline_aqi: u32,
    /// AQI the mission must reach.
    pub target_aqi: u32,
    /// Seconds left on the mission clock. Never increases.
    pub time_remaining: f64,
    /// Completed actions, in application order.
    pub actions_applied: Vec<GameAction>,
    /// Forecast samples, one per hour.
    pub predicted_trajectory: Vec<AirQualitySample>,
    /// Exposure bookkeeping.
    pub health_impact: HealthImpact,
    /// Where the mission takes place.
    pub location: Location,
}

impl SimulationState {
    /// Baseline AQI minus current AQI. Negative when air got worse.
    pub fn aqi_improvement(&self) -> i64 {
        i64::from(self.baseline_aqi).saturating_sub(i64::from(self.current_aqi))
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Per-session player record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerState {
    /// Health, 0-100.
    pub health: f64,
    /// Energy, 0-100. Moves together with health.
    pub energy: f64,
    /// Credits available for actions.
    pub credits: u32,
    /// Whether the current AQI is at or below the safe threshold.
    pub is_in_safe_zone: bool,
    /// Seconds of unsafe exposure still tolerated.
    pub safe_time_remaining: f64,
}

impl PlayerState {
    /// Whether health has been fully drained.
    pub fn is_incapacitated(&self) -> bool {
        self.health <= 0.0
    }

    /// Whether the player can pay `cost`.
    pub const fn can_afford(&self, cost: u32) -> bool {
        self.credits >= cost
    }
}

// ---------------------------------------------------------------------------
// Missions
// ---------------------------------------------------------------------------

/// One goal within a mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MissionObjective {
    /// What is being measured.
    pub objective_type: ObjectiveType,
    /// Threshold to reach.
    pub target: f64,
    /// Latest measured value.
    #[serde(default)]
    pub current: f64,
    /// Points awarded on completion.
    pub points: u32,
    /// Set once the objective is met; never reverts.
    #[serde(default)]
    pub is_completed: bool,
    /// Text shown to the player.
    #[serde(default)]
    pub description: String,
}

impl MissionObjective {
    /// Create an open objective.
    pub fn new(
        objective_type: ObjectiveType,
        target: f64,
        points: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            objective_type,
            target,
            current: 0.0,
            points,
            is_completed: false,
            description: description.into(),
        }
    }
}

/// A mission definition: goal AQI, time budget and objectives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Mission {
    /// Unique mission identifier.
    #[serde(default)]
    pub id: MissionId,
    /// Display name.
    pub name: String,
    /// AQI that completes the mission.
    pub target_aqi: u32,
    /// Seconds available.
    pub time_limit: f64,
    /// Objectives tracked for scoring.
    #[serde(default)]
    pub objectives: Vec<MissionObjective>,
}
