//! Action Effect Calculator.
//!
//! Maps a player action to the pollutant change it causes. Each action kind
//! has an [`EffectProfile`](crate::config::EffectProfile): fixed per-unit
//! deltas plus the footprint of one unit. The number of units an action
//! covers is its area divided by that footprint, rounded down:
//!
//! | Action               | PM2.5/unit | NO2/unit | O3/unit | hours | m2/unit |
//! |----------------------|-----------:|---------:|--------:|------:|--------:|
//! | `plant_tree`           | -0.5 | -0.2 | +0.1  | 24 | 25   |
//! | `plant_rooftop_garden` | -0.3 | -0.1 | +0.05 | 24 | 50   |
//! | `remove_vehicle`       | -2.0 | -1.0 | +0.5  | 12 | 20   |
//! | `shutdown_factory`     | -5.0 | -2.0 | -0.5  | 48 | 1000 |
//! | `retrofit_factory`     | -2.5 | -1.0 | -0.25 | 72 | 1000 |
//! | `remove_construction`  | -3.0 | -1.5 | +0.2  | 36 | 500  |
//! | `relocate`             | 0    | 0    | 0     | 0  | -    |
//!
//! The calculator is pure: it reads the action and the parameters and
//! returns a fresh [`ActionEffect`]. Applying the deltas to a sample is a
//! separate step ([`apply_effect`]) that floors every concentration at zero.

use clearsky_types::{
    ActionEffect, ActionType, AirQualitySample, DataSource, GameAction, non_negative,
};

use crate::config::SimulationParameters;

/// Compute the effect of `action` under `params`.
pub fn compute_effect(action: &GameAction, params: &SimulationParameters) -> ActionEffect {
    let profile = params.effect_profiles.get(action.action_type);
    let units = unit_count(action.area(), profile.unit_footprint);
    let scale = f64::from(units);

    ActionEffect {
        pm25_change: scale * profile.pm25_per_unit,
        no2_change: scale * profile.no2_per_unit,
        o3_change: scale * profile.o3_per_unit,
        area_of_effect: effect_radius(action.action_type, params),
        duration: if units == 0 { 0.0 } else { profile.duration_hours },
        units,
        description: describe(action.action_type, units, &action.location.name),
    }
}

/// Apply `effect` to `sample`, flooring PM2.5, NO2 and O3 at zero.
///
/// The result is tagged [`DataSource::Simulated`] and stamped with
/// `timestamp`; pollutants the effect does not touch are carried over.
pub fn apply_effect(
    sample: &AirQualitySample,
    effect: &ActionEffect,
    timestamp: chrono::DateTime<chrono::Utc>,
) -> AirQualitySample {
    AirQualitySample {
        pm25: non_negative(sample.pm25 + effect.pm25_change),
        no2: non_negative(sample.no2 + effect.no2_change),
        o3: non_negative(sample.o3 + effect.o3_change),
        timestamp,
        source: DataSource::Simulated,
        ..sample.clone()
    }
}

/// Whole units covered by `area`. Zero for a zero footprint or bad input.
fn unit_count(area: f64, footprint: f64) -> u32 {
    if !area.is_finite() || footprint.is_nan() || footprint <= 0.0 {
        return 0;
    }
    to_units((area / footprint).floor())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_units(value: f64) -> u32 {
    // Clamped first, so the cast is exact.
    value.clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Radius of influence for an action kind.
const fn effect_radius(action: ActionType, params: &SimulationParameters) -> f64 {
    match action {
        ActionType::PlantTree | ActionType::PlantRooftopGarden => params.tree_effect_radius,
        ActionType::RemoveVehicle => params.vehicle_effect_radius,
        ActionType::ShutdownFactory
        | ActionType::RetrofitFactory
        | ActionType::RemoveConstruction => params.factory_effect_radius,
        ActionType::Relocate => 0.0,
    }
}

fn describe(action: ActionType, units: u32, place: &str) -> String {
    let (verb, singular, plural) = match action {
        ActionType::PlantTree => ("Planted", "tree", "trees"),
        ActionType::PlantRooftopGarden => ("Planted", "rooftop garden", "rooftop gardens"),
        ActionType::RemoveVehicle => ("Removed", "vehicle", "vehicles"),
        ActionType::ShutdownFactory => ("Shut down", "factory", "factories"),
        ActionType::RetrofitFactory => ("Retrofitted", "factory", "factories"),
        ActionType::RemoveConstruction => ("Halted", "construction site", "construction sites"),
        ActionType::Relocate => return format!("Relocated to {place}"),
    };
    let noun = if units == 1 { singular } else { plural };
    format!("{verb} {units} {noun} at {place}")
}
