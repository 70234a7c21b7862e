//! Session controller.
//!
//! A [`GameSession`] owns one mission's worth of state: the
//! [`SimulationEngine`], the player record, the objective tracker, the latest
//! pollutant sample, and per-action cooldowns. It is the single entry point
//! for the player-facing layer.
//!
//! # Tick order
//!
//! 1. Advance the mission clock
//! 2. Apply health drain or recovery at the current AQI
//! 3. Feed the objective tracker
//! 4. Re-derive the phase and log transitions
//!
//! Cooldowns run on session time (the sum of elapsed seconds passed to
//! [`GameSession::tick`]), so they scale with the clock the caller drives.
//! Actions are stamped on the same clock: the latest baseline reading's
//! timestamp plus the session time, so the samples and forecasts they
//! produce continue the baseline timeline.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use clearsky_types::{
    ActionEffect, ActionType, AirQualitySample, AqiCategory, GameAction, Location, Mission,
    PlayerState, SimulationPhase, non_negative,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::GameConfig;
use crate::effects::compute_effect;
use crate::error::EngineError;
use crate::health::{in_safe_zone, new_player, update_health};
use crate::objectives::MissionTracker;
use crate::simulation::SimulationEngine;

/// Result of a successful [`GameSession::perform_action`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutcome {
    /// The action kind performed.
    pub action_type: ActionType,
    /// The computed pollutant change.
    pub effect: ActionEffect,
    /// The sample after the effect was applied.
    pub sample: AirQualitySample,
    /// AQI of `sample`.
    pub aqi: u32,
    /// Credits left after paying for the action.
    pub credits_remaining: u32,
}

/// Snapshot produced by every [`GameSession::tick`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// Phase after the tick.
    pub phase: SimulationPhase,
    /// Current AQI.
    pub current_aqi: u32,
    /// Category of `current_aqi`.
    pub category: AqiCategory,
    /// Seconds left on the mission clock.
    pub time_remaining: f64,
    /// Session time elapsed so far, seconds.
    pub elapsed_seconds: f64,
    /// Player health after the tick.
    pub health: f64,
    /// Whether the player is in the safe zone.
    pub is_in_safe_zone: bool,
    /// Current mission score.
    pub score: i64,
}

/// One player's mission.
#[derive(Debug, Clone)]
pub struct GameSession {
    engine: SimulationEngine,
    mission: Mission,
    location: Location,
    player: PlayerState,
    tracker: MissionTracker,
    current: Option<AirQualitySample>,
    started_at: Option<DateTime<Utc>>,
    elapsed_seconds: f64,
    last_used: BTreeMap<ActionType, f64>,
    last_phase: SimulationPhase,
}

impl GameSession {
    /// Start `mission` at `location` from the given baseline readings.
    ///
    /// With no baseline readings the session stays uninitialized and every
    /// action is rejected with [`EngineError::NotInitialized`].
    pub fn start(
        config: GameConfig,
        mission: Mission,
        baseline: &[AirQualitySample],
        location: Location,
    ) -> Self {
        let mut player = new_player(&config);
        let tracker = MissionTracker::new(&mission);
        let mut engine = SimulationEngine::new(config);
        engine.initialize_mission(
            baseline,
            location.clone(),
            mission.target_aqi,
            mission.time_limit,
        );
        if let Some(state) = engine.state() {
            player.is_in_safe_zone = in_safe_zone(state.current_aqi, engine.config());
        }
        let current = baseline.iter().max_by_key(|sample| sample.timestamp).cloned();
        let started_at = current.as_ref().map(|sample| sample.timestamp);
        let last_phase = engine.phase();

        info!(
            mission = %mission.name,
            location = %location.name,
            objectives = mission.objectives.len(),
            ?last_phase,
            is_in_safe_zone = player.is_in_safe_zone,
            "Session started"
        );

        Self {
            engine,
            mission,
            location,
            player,
            tracker,
            current,
            started_at,
            elapsed_seconds: 0.0,
            last_used: BTreeMap::new(),
            last_phase,
        }
    }

    /// Perform `action_type` over `area` square meters at the session's
    /// location.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotInitialized`] if the session has no baseline
    /// - [`EngineError::SessionOver`] once the mission completed or failed
    /// - [`EngineError::CooldownActive`] if the same kind was used too recently
    /// - [`EngineError::InsufficientCredits`] if the player cannot pay
    pub fn perform_action(
        &mut self,
        action_type: ActionType,
        area: f64,
    ) -> Result<ActionOutcome, EngineError> {
        let current = match self.engine.phase() {
            SimulationPhase::Uninitialized => return Err(EngineError::NotInitialized),
            SimulationPhase::Completed | SimulationPhase::Failed => {
                return Err(EngineError::SessionOver);
            }
            SimulationPhase::Running => self.current.clone().ok_or(EngineError::NotInitialized)?,
        };

        let remaining_seconds = self.cooldown_remaining(action_type);
        if remaining_seconds > 0.0 {
            return Err(EngineError::CooldownActive {
                action_type,
                remaining_seconds,
            });
        }

        let config = self.engine.config();
        let cost = config.cost_of(action_type);
        if !self.player.can_afford(cost) {
            return Err(EngineError::InsufficientCredits {
                required: cost,
                available: self.player.credits,
            });
        }
        let credits = self.player.credits.saturating_sub(cost);

        let mut action = GameAction::new(
            action_type,
            self.location.with_area(area),
            cost,
            config.cooldown_of(action_type),
        );
        if let Some(at) = self.session_time() {
            action.timestamp = at;
        }
        let effect = compute_effect(&action, &config.simulation_parameters);
        let sample = self.engine.apply_action(action, &current)?;
        let aqi = sample.aqi();

        self.player.credits = credits;
        self.player.is_in_safe_zone = in_safe_zone(aqi, self.engine.config());
        self.last_used.insert(action_type, self.elapsed_seconds);
        self.tracker.record_action(action_type, cost);
        self.tracker.observe(aqi, self.elapsed_seconds);
        self.current = Some(sample.clone());

        info!(
            action = ?action_type,
            area,
            cost,
            credits_remaining = credits,
            aqi,
            "Action performed"
        );
        self.note_phase();

        Ok(ActionOutcome {
            action_type,
            effect,
            sample,
            aqi,
            credits_remaining: credits,
        })
    }

    /// Advance the session by `elapsed_seconds`.
    ///
    /// Negative and NaN values count as zero. Once the mission is over (or
    /// was never initialized) the state is left untouched and the report
    /// repeats the final snapshot.
    pub fn tick(&mut self, elapsed_seconds: f64) -> TickReport {
        if self.engine.phase() != SimulationPhase::Running {
            return self.report();
        }
        let dt = non_negative(elapsed_seconds);

        // 1. Clock
        self.elapsed_seconds += dt;
        self.engine.update_time(dt);

        // 2. Health
        let aqi = self.current_aqi();
        let was_safe = self.player.is_in_safe_zone;
        self.player = update_health(&self.player, aqi, dt, self.engine.config());
        if was_safe && !self.player.is_in_safe_zone {
            warn!(aqi, "Player left the safe zone");
        }

        // 3. Objectives
        self.tracker.observe(aqi, self.elapsed_seconds);

        // 4. Phase
        self.note_phase();

        self.report()
    }

    /// Seconds until `action_type` may be used again. Zero when ready.
    pub fn cooldown_remaining(&self, action_type: ActionType) -> f64 {
        let cooldown = self.engine.config().cooldown_of(action_type);
        self.last_used
            .get(&action_type)
            .map_or(0.0, |used_at| (used_at + cooldown - self.elapsed_seconds).max(0.0))
    }

    /// The simulation engine.
    pub const fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    /// The player record.
    pub const fn player(&self) -> &PlayerState {
        &self.player
    }

    /// The objective tracker.
    pub const fn tracker(&self) -> &MissionTracker {
        &self.tracker
    }

    /// Mutable access to the tracker, for externally measured progress.
    pub const fn tracker_mut(&mut self) -> &mut MissionTracker {
        &mut self.tracker
    }

    /// The mission being played.
    pub const fn mission(&self) -> &Mission {
        &self.mission
    }

    /// The latest pollutant sample, if the session has a baseline.
    pub const fn current_sample(&self) -> Option<&AirQualitySample> {
        self.current.as_ref()
    }

    /// Session time elapsed so far, seconds.
    pub const fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Current phase.
    pub fn phase(&self) -> SimulationPhase {
        self.engine.phase()
    }

    /// Timestamp of the current session time on the baseline timeline.
    ///
    /// `None` when the session has no baseline.
    pub fn session_time(&self) -> Option<DateTime<Utc>> {
        self.started_at.map(|start| {
            start
                .checked_add_signed(session_offset(self.elapsed_seconds))
                .unwrap_or(start)
        })
    }

    fn note_phase(&mut self) {
        let phase = self.engine.phase();
        if phase != self.last_phase {
            info!(
                from = ?self.last_phase,
                to = ?phase,
                elapsed_seconds = self.elapsed_seconds,
                aqi = self.current_aqi(),
                score = self.engine.calculate_score(),
                "Phase transition"
            );
            self.last_phase = phase;
        }
    }

    fn current_aqi(&self) -> u32 {
        self.engine.state().map_or(0, |state| state.current_aqi)
    }

    fn report(&self) -> TickReport {
        TickReport {
            phase: self.engine.phase(),
            current_aqi: self.current_aqi(),
            category: AqiCategory::from_aqi(self.current_aqi()),
            time_remaining: self.engine.state().map_or(0.0, |state| state.time_remaining),
            elapsed_seconds: self.elapsed_seconds,
            health: self.player.health,
            is_in_safe_zone: self.player.is_in_safe_zone,
            score: self.engine.calculate_score(),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn session_offset(seconds: f64) -> TimeDelta {
    // `as` saturates; offsets beyond the representable range are dropped.
    let millis = (seconds * 1000.0).round() as i64;
    TimeDelta::try_milliseconds(millis).unwrap_or_default()
}
