//! Air-quality simulation engine for Clearsky.
//!
//! The engine turns player interventions into pollutant changes, tracks a
//! mission's AQI against its target and clock, and applies the health cost
//! of breathing the result.
//!
//! # Modules
//!
//! - [`config`] -- Game balance loaded from `clearsky-config.yaml` into
//!   strongly-typed structs.
//! - [`effects`] -- Action Effect Calculator.
//! - [`simulation`] -- Simulation State Machine ([`SimulationEngine`]).
//! - [`health`] -- Player Health Model.
//! - [`objectives`] -- Mission Objective Tracker ([`MissionTracker`]).
//! - [`session`] -- [`GameSession`], which ties the above together per tick.
//! - [`error`] -- [`EngineError`].
//!
//! The Pollutant Index Converter lives in `clearsky-types` and is
//! re-exported here as [`compute_aqi`].

pub mod config;
pub mod effects;
pub mod error;
pub mod health;
pub mod objectives;
pub mod session;
pub mod simulation;

pub use clearsky_types::compute_aqi;
pub use config::{ConfigError, GameConfig};
pub use effects::{apply_effect, compute_effect};
pub use error::EngineError;
pub use health::{in_safe_zone, new_player, update_health};
pub use objectives::MissionTracker;
pub use session::{ActionOutcome, GameSession, TickReport};
pub use simulation::SimulationEngine;
