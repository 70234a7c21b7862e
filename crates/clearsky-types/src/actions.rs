//! Player action requests and their computed pollutant effects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActionStatus, ActionType};
use crate::ids::ActionId;
use crate::structs::Location;

/// A requested intervention.
///
/// Created by the player-facing layer, consumed once by the effect
/// calculator, then kept unchanged in the append-only action history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameAction {
    /// Unique action identifier.
    pub id: ActionId,
    /// The kind of intervention.
    pub action_type: ActionType,
    /// Where the action happens; `location.area` is the affected area in m2.
    pub location: Location,
    /// Credits consumed by the action.
    pub cost: u32,
    /// Seconds before the same action kind may be repeated.
    pub cooldown: f64,
    /// Lifecycle state.
    pub status: ActionStatus,
    /// When the action was requested.
    pub timestamp: DateTime<Utc>,
}

impl GameAction {
    /// Create a pending action stamped with the current time.
    pub fn new(action_type: ActionType, location: Location, cost: u32, cooldown: f64) -> Self {
        Self {
            id: ActionId::new(),
            action_type,
            location,
            cost,
            cooldown,
            status: ActionStatus::Pending,
            timestamp: Utc::now(),
        }
    }

    /// Affected area in square meters, never negative.
    pub fn area(&self) -> f64 {
        self.location.area.max(0.0)
    }

    /// Mark the action as applied. Completion is terminal.
    pub const fn complete(&mut self) {
        self.status = ActionStatus::Completed;
    }

    /// Whether the action has been applied.
    pub const fn is_completed(&self) -> bool {
        matches!(self.status, ActionStatus::Completed)
    }
}

/// Pollutant change produced by one action.
///
/// Deltas are signed; negative values are improvements. Effects are never
/// stored on their own: they are recomputed from the action and the
/// configuration whenever they are needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionEffect {
    /// Change in PM2.5, ug/m3.
    pub pm25_change: f64,
    /// Change in NO2, ppb.
    pub no2_change: f64,
    /// Change in O3, ppb.
    pub o3_change: f64,
    /// Radius of the affected zone, meters.
    pub area_of_effect: f64,
    /// Hours the effect persists.
    pub duration: f64,
    /// Whole units (trees, vehicles, factories, ...) the area accounts for.
    pub units: u32,
    /// Human-readable summary.
    pub description: String,
}

impl ActionEffect {
    /// The identity effect: no pollutant change at all.
    pub fn none(description: impl Into<String>) -> Self {
        Self {
            pm25_change: 0.0,
            no2_change: 0.0,
            o3_change: 0.0,
            area_of_effect: 0.0,
            duration: 0.0,
            units: 0,
            description: description.into(),
        }
    }

    /// Whether the effect changes no pollutant.
    pub fn is_none(&self) -> bool {
        self.units == 0
            || (self.pm25_change.abs() < f64::EPSILON
                && self.no2_change.abs() < f64::EPSILON
                && self.o3_change.abs() < f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_action_is_pending_until_completed() {
        let mut action = GameAction::new(
            ActionType::PlantTree,
            Location::new("Plaza", 0.0, 0.0, 100.0),
            10,
            5.0,
        );
        assert!(!action.is_completed());
        action.complete();
        assert!(action.is_completed());
        action.complete();
        assert_eq!(action.status, ActionStatus::Completed);
    }

    #[test]
    fn negative_area_reads_as_zero() {
        let action = GameAction::new(
            ActionType::RemoveVehicle,
            Location::new("Ring road", 0.0, 0.0, -40.0),
            0,
            0.0,
        );
        assert!(action.area().abs() < f64::EPSILON);
    }

    #[test]
    fn identity_effect_is_none() {
        assert!(ActionEffect::none("nothing happened").is_none());
    }
}
