//! Enumeration types for the Clearsky simulation.
//!
//! Every enumeration is closed: adding a new action kind or objective kind
//! is a compile-time-checked change, because the engine resolves them with
//! exhaustive `match` expressions. All enums serialize in `snake_case` so
//! configuration and scenario files read naturally.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Player actions
// ---------------------------------------------------------------------------

/// An intervention the player can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ActionType {
    /// Plant street trees over the affected area.
    PlantTree,
    /// Convert rooftops into planted gardens.
    PlantRooftopGarden,
    /// Take combustion vehicles off the road.
    RemoveVehicle,
    /// Shut a factory down completely.
    ShutdownFactory,
    /// Fit a factory with emission scrubbers.
    RetrofitFactory,
    /// Halt a dusty construction site.
    RemoveConstruction,
    /// Move the player to another area. Has no pollutant effect.
    Relocate,
}

impl ActionType {
    /// Every action kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::PlantTree,
        Self::PlantRooftopGarden,
        Self::RemoveVehicle,
        Self::ShutdownFactory,
        Self::RetrofitFactory,
        Self::RemoveConstruction,
        Self::Relocate,
    ];

    /// Whether this action adds vegetation (counts toward tree objectives).
    pub const fn is_planting(self) -> bool {
        matches!(self, Self::PlantTree | Self::PlantRooftopGarden)
    }

    /// Whether this action removes or reduces a pollution source.
    pub const fn removes_pollution_source(self) -> bool {
        matches!(
            self,
            Self::RemoveVehicle
                | Self::ShutdownFactory
                | Self::RetrofitFactory
                | Self::RemoveConstruction
        )
    }
}

/// Lifecycle of a [`GameAction`](crate::GameAction).
///
/// `Pending` is the only non-terminal state; once an action is applied by
/// the engine it becomes `Completed` and never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ActionStatus {
    /// Requested but not yet applied.
    Pending,
    /// Applied to the simulation.
    Completed,
}

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

/// Provenance tag of an air-quality sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DataSource {
    /// Reading delivered by the telemetry layer.
    Observed,
    /// Reading produced by applying player actions.
    Simulated,
    /// Point of a forecast trajectory.
    Predicted,
}

/// The six standard EPA AQI tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AqiCategory {
    /// AQI 0-50.
    Good,
    /// AQI 51-100.
    Moderate,
    /// AQI 101-150.
    UnhealthyForSensitiveGroups,
    /// AQI 151-200.
    Unhealthy,
    /// AQI 201-300.
    VeryUnhealthy,
    /// AQI 301 and above.
    Hazardous,
}

impl AqiCategory {
    /// Classify an AQI value into its tier.
    pub const fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => Self::Good,
            51..=100 => Self::Moderate,
            101..=150 => Self::UnhealthyForSensitiveGroups,
            151..=200 => Self::Unhealthy,
            201..=300 => Self::VeryUnhealthy,
            _ => Self::Hazardous,
        }
    }

    /// Human-readable tier name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }

    /// Health advisory text for the tier.
    pub const fn health_advisory(self) -> &'static str {
        match self {
            Self::Good => "Air quality is satisfactory with little or no risk.",
            Self::Moderate => {
                "Acceptable quality. Unusually sensitive people should limit prolonged exertion."
            }
            Self::UnhealthyForSensitiveGroups => {
                "Children, older adults and people with lung disease should reduce exertion."
            }
            Self::Unhealthy => "Everyone may begin to experience health effects.",
            Self::VeryUnhealthy => "Health alert: serious effects for the entire population.",
            Self::Hazardous => "Health emergency: everyone should avoid outdoor activity.",
        }
    }
}

// ---------------------------------------------------------------------------
// Missions
// ---------------------------------------------------------------------------

/// Kind of a mission objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ObjectiveType {
    /// Bring the AQI down to the target value.
    ReduceAqi,
    /// Complete a number of planting actions.
    PlantTrees,
    /// Complete a number of source-removal actions.
    RemovePollution,
    /// Reach the AQI goal within a number of seconds.
    TimeLimit,
    /// Reach the AQI goal spending at most a number of credits.
    BudgetLimit,
    /// Consult a number of satellite datasets (fed externally).
    SatelliteData,
    /// Reach a level of community engagement (fed externally).
    CommunityEngagement,
}

/// Derived lifecycle phase of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SimulationPhase {
    /// No baseline has been loaded.
    Uninitialized,
    /// The mission is in progress.
    Running,
    /// The AQI target was reached.
    Completed,
    /// Mission time ran out before the target was reached.
    Failed,
}

impl SimulationPhase {
    /// Whether the phase is terminal.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_boundaries() {
        assert_eq!(AqiCategory::from_aqi(0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(50), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(51), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_aqi(150), AqiCategory::UnhealthyForSensitiveGroups);
        assert_eq!(AqiCategory::from_aqi(200), AqiCategory::Unhealthy);
        assert_eq!(AqiCategory::from_aqi(300), AqiCategory::VeryUnhealthy);
        assert_eq!(AqiCategory::from_aqi(301), AqiCategory::Hazardous);
        assert_eq!(AqiCategory::from_aqi(500), AqiCategory::Hazardous);
    }

    #[test]
    fn category_labels_and_advisories() {
        assert_eq!(AqiCategory::Good.label(), "Good");
        assert_eq!(AqiCategory::from_aqi(112).label(), "Unhealthy for Sensitive Groups");
        assert!(AqiCategory::Hazardous.health_advisory().starts_with("Health emergency"));
        let advisories = [
            AqiCategory::Good,
            AqiCategory::Moderate,
            AqiCategory::UnhealthyForSensitiveGroups,
            AqiCategory::Unhealthy,
            AqiCategory::VeryUnhealthy,
            AqiCategory::Hazardous,
        ]
        .map(AqiCategory::health_advisory);
        assert!(advisories.iter().all(|advisory| !advisory.is_empty()));
        let distinct: std::collections::BTreeSet<&str> = advisories.into_iter().collect();
        assert_eq!(distinct.len(), advisories.len());
    }

    #[test]
    fn only_completed_and_failed_are_finished() {
        assert!(!SimulationPhase::Uninitialized.is_finished());
        assert!(!SimulationPhase::Running.is_finished());
        assert!(SimulationPhase::Completed.is_finished());
        assert!(SimulationPhase::Failed.is_finished());
    }

    #[test]
    fn action_groups_are_disjoint() {
        for action in ActionType::ALL {
            assert!(!(action.is_planting() && action.removes_pollution_source()));
        }
        assert!(!ActionType::Relocate.is_planting());
        assert!(!ActionType::Relocate.removes_pollution_source());
    }

    #[test]
    fn action_type_uses_snake_case() {
        let json = serde_json::to_string(&ActionType::PlantRooftopGarden).unwrap_or_default();
        assert_eq!(json, "\"plant_rooftop_garden\"");
        let parsed: Result<ActionType, _> = serde_json::from_str("\"shutdown_factory\"");
        assert_eq!(parsed.ok(), Some(ActionType::ShutdownFactory));
    }
}
