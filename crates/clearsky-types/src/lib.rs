//! Shared type definitions for the Clearsky air-quality simulation.
//!
//! This crate is the single source of truth for every record the engine
//! consumes or produces. Types flow downstream to `TypeScript` via `ts-rs`
//! so the game interface can be typed against the engine's outputs.
//!
//! # Modules
//!
//! - [`aqi`] -- Pollutant Index Converter (PM2.5 to AQI)
//! - [`ids`] -- Type-safe UUID wrappers
//! - [`enums`] -- Action kinds, objective kinds, provenance, AQI tiers
//! - [`actions`] -- Action requests and computed effects
//! - [`structs`] -- Samples, locations, simulation and player state, missions

pub mod actions;
pub mod aqi;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::{ActionEffect, GameAction};
pub use aqi::{AqiBreakpoint, MAX_AQI, PM25_BREAKPOINTS, compute_aqi};
pub use enums::{ActionStatus, ActionType, AqiCategory, DataSource, ObjectiveType, SimulationPhase};
pub use ids::{ActionId, MissionId};
pub use structs::{
    AirQualitySample, HealthImpact, Location, Mission, MissionObjective, PlayerState,
    SimulationState, non_negative,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Exported files land in `bindings/` relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::ActionId::export_all();
        let _ = crate::ids::MissionId::export_all();

        // Enums
        let _ = crate::enums::ActionType::export_all();
        let _ = crate::enums::ActionStatus::export_all();
        let _ = crate::enums::DataSource::export_all();
        let _ = crate::enums::AqiCategory::export_all();
        let _ = crate::enums::ObjectiveType::export_all();
        let _ = crate::enums::SimulationPhase::export_all();

        // Structs
        let _ = crate::actions::GameAction::export_all();
        let _ = crate::actions::ActionEffect::export_all();
        let _ = crate::structs::AirQualitySample::export_all();
        let _ = crate::structs::Location::export_all();
        let _ = crate::structs::HealthImpact::export_all();
        let _ = crate::structs::SimulationState::export_all();
        let _ = crate::structs::PlayerState::export_all();
        let _ = crate::structs::MissionObjective::export_all();
        let _ = crate::structs::Mission::export_all();
    }
}
