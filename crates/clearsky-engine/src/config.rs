//! Configuration loading and typed config structures for the engine.
//!
//! The canonical configuration lives in `clearsky-config.yaml` at the
//! project root. Every field has a default, so an empty file (or no file at
//! all) yields the standard game balance. Per-action tables are structs with
//! one named field per [`ActionType`], resolved by exhaustive `match`, so a
//! new action kind cannot be added without giving it a cost, a cooldown and
//! an effect profile.

use std::path::Path;

use clearsky_types::ActionType;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its valid range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameConfig {
    /// AQI at or below which the player is in the safe zone.
    #[serde(default = "default_safe_aqi_threshold")]
    pub safe_aqi_threshold: u32,

    /// Health drained per minute at AQI 100 outside the safe zone.
    #[serde(default = "default_health_drain_rate")]
    pub health_drain_rate: f64,

    /// Health recovered per minute inside the safe zone.
    #[serde(default = "default_recovery_rate")]
    pub recovery_rate: f64,

    /// Default mission length in seconds.
    #[serde(default = "default_mission_time_limit")]
    pub mission_time_limit: f64,

    /// Seconds of unsafe exposure a fresh player tolerates.
    #[serde(default = "default_safe_exposure_seconds")]
    pub safe_exposure_seconds: f64,

    /// Credits a fresh player starts with.
    #[serde(default = "default_starting_credits")]
    pub starting_credits: u32,

    /// Hours covered by the forecast trajectory.
    #[serde(default = "default_forecast_hours")]
    pub forecast_hours: u32,

    /// Credits charged per action kind.
    #[serde(default)]
    pub action_costs: ActionCosts,

    /// Seconds before an action kind may be repeated.
    #[serde(default)]
    pub action_cooldowns: ActionCooldowns,

    /// Dispersion parameters and per-action effect profiles.
    #[serde(default)]
    pub simulation_parameters: SimulationParameters,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            safe_aqi_threshold: default_safe_aqi_threshold(),
            health_drain_rate: default_health_drain_rate(),
            recovery_rate: default_recovery_rate(),
            mission_time_limit: default_mission_time_limit(),
            safe_exposure_seconds: default_safe_exposure_seconds(),
            starting_credits: default_starting_credits(),
            forecast_hours: default_forecast_hours(),
            action_costs: ActionCosts::default(),
            action_cooldowns: ActionCooldowns::default(),
            simulation_parameters: SimulationParameters::default(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every rate and duration is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let params = &self.simulation_parameters;
        let scalars = [
            ("health_drain_rate", self.health_drain_rate),
            ("recovery_rate", self.recovery_rate),
            ("mission_time_limit", self.mission_time_limit),
            ("safe_exposure_seconds", self.safe_exposure_seconds),
            ("simulation_parameters.tree_effect_radius", params.tree_effect_radius),
            ("simulation_parameters.vehicle_effect_radius", params.vehicle_effect_radius),
            ("simulation_parameters.factory_effect_radius", params.factory_effect_radius),
            ("simulation_parameters.mixing_volume", params.mixing_volume),
            ("simulation_parameters.exposure_factor", params.exposure_factor),
        ];
        for (name, value) in scalars {
            ensure_non_negative(name, value)?;
        }

        for action in ActionType::ALL {
            ensure_non_negative("action_cooldowns", self.action_cooldowns.get(action))?;
            let profile = params.effect_profiles.get(action);
            ensure_non_negative("effect_profiles.duration_hours", profile.duration_hours)?;
            ensure_non_negative("effect_profiles.unit_footprint", profile.unit_footprint)?;
            for delta in [profile.pm25_per_unit, profile.no2_per_unit, profile.o3_per_unit] {
                if !delta.is_finite() {
                    return Err(ConfigError::Invalid {
                        reason: format!("effect profile for {action:?} has a non-finite delta"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Credits charged for `action`.
    pub const fn cost_of(&self, action: ActionType) -> u32 {
        self.action_costs.get(action)
    }

    /// Cooldown in seconds for `action`.
    pub const fn cooldown_of(&self, action: ActionType) -> f64 {
        self.action_cooldowns.get(action)
    }
}

fn ensure_non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            reason: format!("{name} must be a finite non-negative number, got {value}"),
        })
    }
}

// ---------------------------------------------------------------------------
// Per-action tables
// ---------------------------------------------------------------------------

/// Credits charged per action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActionCosts {
    /// Planting street trees.
    pub plant_tree: u32,
    /// Planting a rooftop garden.
    pub plant_rooftop_garden: u32,
    /// Removing vehicles.
    pub remove_vehicle: u32,
    /// Shutting a factory down.
    pub shutdown_factory: u32,
    /// Retrofitting a factory.
    pub retrofit_factory: u32,
    /// Halting construction.
    pub remove_construction: u32,
    /// Relocating.
    pub relocate: u32,
}

impl Default for ActionCosts {
    fn default() -> Self {
        Self {
            plant_tree: 10,
            plant_rooftop_garden: 25,
            remove_vehicle: 20,
            shutdown_factory: 100,
            retrofit_factory: 60,
            remove_construction: 40,
            relocate: 5,
        }
    }
}

impl ActionCosts {
    /// Cost of `action`.
    pub const fn get(&self, action: ActionType) -> u32 {
        match action {
            ActionType::PlantTree => self.plant_tree,
            ActionType::PlantRooftopGarden => self.plant_rooftop_garden,
            ActionType::RemoveVehicle => self.remove_vehicle,
            ActionType::ShutdownFactory => self.shutdown_factory,
            ActionType::RetrofitFactory => self.retrofit_factory,
            ActionType::RemoveConstruction => self.remove_construction,
            ActionType::Relocate => self.relocate,
        }
    }
}

/// Cooldown in seconds per action kind.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActionCooldowns {
    /// Planting street trees.
    pub plant_tree: f64,
    /// Planting a rooftop garden.
    pub plant_rooftop_garden: f64,
    /// Removing vehicles.
    pub remove_vehicle: f64,
    /// Shutting a factory down.
    pub shutdown_factory: f64,
    /// Retrofitting a factory.
    pub retrofit_factory: f64,
    /// Halting construction.
    pub remove_construction: f64,
    /// Relocating.
    pub relocate: f64,
}

impl Default for ActionCooldowns {
    fn default() -> Self {
        Self {
            plant_tree: 5.0,
            plant_rooftop_garden: 10.0,
            remove_vehicle: 8.0,
            shutdown_factory: 30.0,
            retrofit_factory: 20.0,
            remove_construction: 15.0,
            relocate: 3.0,
        }
    }
}

impl ActionCooldowns {
    /// Cooldown of `action` in seconds.
    pub const fn get(&self, action: ActionType) -> f64 {
        match action {
            ActionType::PlantTree => self.plant_tree,
            ActionType::PlantRooftopGarden => self.plant_rooftop_garden,
            ActionType::RemoveVehicle => self.remove_vehicle,
            ActionType::ShutdownFactory => self.shutdown_factory,
            ActionType::RetrofitFactory => self.retrofit_factory,
            ActionType::RemoveConstruction => self.remove_construction,
            ActionType::Relocate => self.relocate,
        }
    }
}

/// Per-unit pollutant deltas of one action kind.
///
/// One "unit" is one tree, one vehicle, one factory, and so on; the number
/// of units an action covers is its area divided by `unit_footprint`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EffectProfile {
    /// PM2.5 change per unit, ug/m3.
    pub pm25_per_unit: f64,
    /// NO2 change per unit, ppb.
    pub no2_per_unit: f64,
    /// O3 change per unit, ppb.
    pub o3_per_unit: f64,
    /// Hours the effect persists.
    pub duration_hours: f64,
    /// Square meters one unit occupies. Zero disables the action's effect.
    pub unit_footprint: f64,
}

impl EffectProfile {
    /// A profile that never changes anything.
    pub const NONE: Self = Self {
        pm25_per_unit: 0.0,
        no2_per_unit: 0.0,
        o3_per_unit: 0.0,
        duration_hours: 0.0,
        unit_footprint: 0.0,
    };

    const fn new(pm25: f64, no2: f64, o3: f64, duration_hours: f64, unit_footprint: f64) -> Self {
        Self {
            pm25_per_unit: pm25,
            no2_per_unit: no2,
            o3_per_unit: o3,
            duration_hours,
            unit_footprint,
        }
    }
}

/// Effect profile per action kind.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EffectProfiles {
    /// Planting street trees.
    pub plant_tree: EffectProfile,
    /// Planting a rooftop garden.
    pub plant_rooftop_garden: EffectProfile,
    /// Removing vehicles.
    pub remove_vehicle: EffectProfile,
    /// Shutting a factory down.
    pub shutdown_factory: EffectProfile,
    /// Retrofitting a factory.
    pub retrofit_factory: EffectProfile,
    /// Halting construction.
    pub remove_construction: EffectProfile,
    /// Relocating.
    pub relocate: EffectProfile,
}

impl Default for EffectProfiles {
    fn default() -> Self {
        Self {
            plant_tree: EffectProfile::new(-0.5, -0.2, 0.1, 24.0, 25.0),
            plant_rooftop_garden: EffectProfile::new(-0.3, -0.1, 0.05, 24.0, 50.0),
            remove_vehicle: EffectProfile::new(-2.0, -1.0, 0.5, 12.0, 20.0),
            shutdown_factory: EffectProfile::new(-5.0, -2.0, -0.5, 48.0, 1000.0),
            retrofit_factory: EffectProfile::new(-2.5, -1.0, -0.25, 72.0, 1000.0),
            remove_construction: EffectProfile::new(-3.0, -1.5, 0.2, 36.0, 500.0),
            relocate: EffectProfile::NONE,
        }
    }
}

impl EffectProfiles {
    /// Profile of `action`.
    pub const fn get(&self, action: ActionType) -> &EffectProfile {
        match action {
            ActionType::PlantTree => &self.plant_tree,
            ActionType::PlantRooftopGarden => &self.plant_rooftop_garden,
            ActionType::RemoveVehicle => &self.remove_vehicle,
            ActionType::ShutdownFactory => &self.shutdown_factory,
            ActionType::RetrofitFactory => &self.retrofit_factory,
            ActionType::RemoveConstruction => &self.remove_construction,
            ActionType::Relocate => &self.relocate,
        }
    }
}

/// Dispersion parameters used by the effect calculator.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Radius of influence of trees and rooftop gardens, meters.
    pub tree_effect_radius: f64,
    /// Radius of influence of vehicle removal, meters.
    pub vehicle_effect_radius: f64,
    /// Radius of influence of factory and construction actions, meters.
    pub factory_effect_radius: f64,
    /// Air volume the effects mix into, m3. Reported to consumers; the
    /// per-unit deltas are already concentrations.
    pub mixing_volume: f64,
    /// Multiplier from AQI to exposure.
    pub exposure_factor: f64,
    /// Per-action effect profiles.
    pub effect_profiles: EffectProfiles,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            tree_effect_radius: 50.0,
            vehicle_effect_radius: 100.0,
            factory_effect_radius: 1000.0,
            mixing_volume: 1_000_000.0,
            exposure_factor: 1.0,
            effect_profiles: EffectProfiles::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_safe_aqi_threshold() -> u32 {
    100
}

const fn default_health_drain_rate() -> f64 {
    1.0
}

const fn default_recovery_rate() -> f64 {
    0.5
}

const fn default_mission_time_limit() -> f64 {
    600.0
}

const fn default_safe_exposure_seconds() -> f64 {
    300.0
}

const fn default_starting_credits() -> u32 {
    1000
}

const fn default_forecast_hours() -> u32 {
    24
}
