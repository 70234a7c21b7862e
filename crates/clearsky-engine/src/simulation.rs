//! Simulation State Machine.
//!
//! [`SimulationEngine`] owns the live [`SimulationState`] of one mission:
//! current, baseline and target AQI, the mission clock, the append-only
//! action log, and the forecast trajectory.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --initialize--> Running --+--> Completed  (current AQI <= target)
//!       ^                                 +--> Failed     (time remaining <= 0)
//!       +------------------reset--------------------------+
//! ```
//!
//! The phase is derived from the state on every call, never stored. When
//! the AQI target is reached on the same tick the clock runs out, the
//! mission counts as completed. The engine does not halt itself in a
//! terminal phase; callers stop feeding it ticks.
//!
//! # Mutation
//!
//! Pollutant state changes only through [`SimulationEngine::apply_action`];
//! the clock changes only through [`SimulationEngine::update_time`]. Both
//! take `&mut self`, so concurrent callers are serialized by the borrow
//! checker.

use chrono::Duration;
use clearsky_types::{
    ActionEffect, AirQualitySample, DataSource, GameAction, HealthImpact, Location,
    SimulationPhase, SimulationState, non_negative,
};
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::effects::{apply_effect, compute_effect};
use crate::error::EngineError;

/// Hours over which an applied effect decays by a factor of `e` in the
/// forecast.
pub const TRAJECTORY_DECAY_HOURS: f64 = 12.0;

/// The air-quality simulation for one mission.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: GameConfig,
    state: Option<SimulationState>,
}

impl SimulationEngine {
    /// Create an uninitialized engine.
    pub const fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// The configuration the engine was built with.
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Snapshot of the live state, if initialized.
    pub const fn state(&self) -> Option<&SimulationState> {
        self.state.as_ref()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SimulationPhase {
        if self.state.is_none() {
            SimulationPhase::Uninitialized
        } else if self.is_mission_completed() {
            SimulationPhase::Completed
        } else if self.is_mission_failed() {
            SimulationPhase::Failed
        } else {
            SimulationPhase::Running
        }
    }

    /// Start a mission with the configured safe threshold as target and the
    /// configured time limit.
    ///
    /// An empty sample list leaves the engine untouched.
    pub fn initialize(&mut self, baseline: &[AirQualitySample], location: Location) {
        let target = self.config.safe_aqi_threshold;
        let time_limit = self.config.mission_time_limit;
        self.initialize_mission(baseline, location, target, time_limit);
    }

    /// Start a mission with an explicit AQI target and time budget.
    ///
    /// The most recent sample (by timestamp) becomes the baseline. An empty
    /// sample list leaves the engine untouched; callers must check
    /// [`phase`](Self::phase) before acting.
    pub fn initialize_mission(
        &mut self,
        baseline: &[AirQualitySample],
        location: Location,
        target_aqi: u32,
        time_limit: f64,
    ) {
        let Some(latest) = baseline.iter().max_by_key(|sample| sample.timestamp) else {
            warn!(location = %location.name, "No baseline samples, simulation left uninitialized");
            return;
        };

        let baseline_aqi = latest.aqi();
        let trajectory = flat_trajectory(latest, self.config.forecast_hours);
        self.state = Some(SimulationState {
            current_aqi: baseline_aqi,
            baseline_aqi,
            target_aqi,
            time_remaining: non_negative(time_limit),
            actions_applied: Vec::new(),
            predicted_trajectory: trajectory,
            health_impact: HealthImpact {
                current_exposure: self.exposure(baseline_aqi),
                safe_threshold: self.config.safe_aqi_threshold,
                recovery_rate: self.config.recovery_rate,
            },
            location,
        });

        info!(
            baseline_aqi,
            target_aqi,
            time_limit,
            samples = baseline.len(),
            "Simulation initialized"
        );
    }

    /// Apply one action to `current` and return the resulting sample.
    ///
    /// PM2.5, NO2 and O3 are floored at zero; the AQI of the returned
    /// sample is derived from its PM2.5 and carries the action's timestamp.
    /// The action is marked completed and appended to the log, then the
    /// current AQI and exposure are updated. The forecast is recomputed last,
    /// from the updated sample and the extended log.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotInitialized`] if no baseline was loaded.
    pub fn apply_action(
        &mut self,
        mut action: GameAction,
        current: &AirQualitySample,
    ) -> Result<AirQualitySample, EngineError> {
        if self.state.is_none() {
            return Err(EngineError::NotInitialized);
        }

        let effect = compute_effect(&action, &self.config.simulation_parameters);
        let updated = apply_effect(current, &effect, action.timestamp);
        let new_aqi = updated.aqi();
        let exposure = self.exposure(new_aqi);
        action.complete();

        let state = self.state.as_mut().ok_or(EngineError::NotInitialized)?;
        debug!(
            action = ?action.action_type,
            units = effect.units,
            pm25_change = effect.pm25_change,
            previous_aqi = state.current_aqi,
            new_aqi,
            "Action applied"
        );
        state.actions_applied.push(action);
        state.current_aqi = new_aqi;
        state.health_impact.current_exposure = exposure;

        let trajectory = self.predict_trajectory(&updated, self.config.forecast_hours);
        if let Some(state) = self.state.as_mut() {
            state.predicted_trajectory = trajectory;
        }

        Ok(updated)
    }

    /// Advance the mission clock by the real elapsed time.
    ///
    /// Negative and NaN values are ignored; the clock floors at zero.
    pub fn update_time(&mut self, elapsed_seconds: f64) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if elapsed_seconds.is_nan() || elapsed_seconds <= 0.0 {
            return;
        }
        state.time_remaining = (state.time_remaining - elapsed_seconds).max(0.0);
    }

    /// Whether the AQI target has been reached.
    pub fn is_mission_completed(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.current_aqi <= state.target_aqi)
    }

    /// Whether the mission clock has run out.
    pub fn is_mission_failed(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.time_remaining <= 0.0)
    }

    /// Forecast `hours` hourly samples starting from `current`.
    ///
    /// Each applied action contributes its PM2.5 change decayed by
    /// `exp(-i / 12)` at hour `i`. The result depends only on the inputs and
    /// the action log; calling it twice yields identical sequences.
    pub fn predict_trajectory(
        &self,
        current: &AirQualitySample,
        hours: u32,
    ) -> Vec<AirQualitySample> {
        let effects: Vec<ActionEffect> = self
            .state
            .as_ref()
            .map(|state| {
                state
                    .actions_applied
                    .iter()
                    .map(|action| compute_effect(action, &self.config.simulation_parameters))
                    .collect()
            })
            .unwrap_or_default();

        (0..hours)
            .map(|hour| {
                let decay = (-f64::from(hour) / TRAJECTORY_DECAY_HOURS).exp();
                let change: f64 = effects.iter().map(|effect| effect.pm25_change * decay).sum();
                forecast_point(current, current.pm25 + change, hour)
            })
            .collect()
    }

    /// Mission score.
    ///
    /// ```text
    /// round(improvement * 10 + time_remaining / 60 + (improvement / actions) * 5)
    /// ```
    ///
    /// where `improvement = baseline_aqi - current_aqi`. The efficiency term
    /// is zero when no action was applied. Zero when uninitialized.
    pub fn calculate_score(&self) -> i64 {
        let Some(state) = self.state.as_ref() else {
            return 0;
        };
        #[allow(clippy::cast_precision_loss)]
        let improvement = state.aqi_improvement() as f64;
        let efficiency = match u32::try_from(state.actions_applied.len()) {
            Ok(0) | Err(_) => 0.0,
            Ok(count) => improvement / f64::from(count) * 5.0,
        };
        to_score((improvement * 10.0 + state.time_remaining / 60.0 + efficiency).round())
    }

    /// Discard the mission and return to the uninitialized phase.
    pub fn reset(&mut self) {
        if self.state.take().is_some() {
            info!("Simulation reset");
        }
    }

    fn exposure(&self, aqi: u32) -> f64 {
        f64::from(aqi) * self.config.simulation_parameters.exposure_factor
    }
}

/// Forecast with no applied actions: `hours` copies of `sample`, hourly.
fn flat_trajectory(sample: &AirQualitySample, hours: u32) -> Vec<AirQualitySample> {
    (0..hours)
        .map(|hour| forecast_point(sample, sample.pm25, hour))
        .collect()
}

fn forecast_point(base: &AirQualitySample, pm25: f64, hour: u32) -> AirQualitySample {
    AirQualitySample {
        pm25: non_negative(pm25),
        timestamp: base.timestamp + Duration::hours(i64::from(hour)),
        source: DataSource::Predicted,
        ..base.clone()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_score(value: f64) -> i64 {
    // `as` saturates at the i64 bounds and maps NaN to zero.
    value as i64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use clearsky_types::ActionType;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn sample(pm25: f64) -> AirQualitySample {
        let at = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        AirQualitySample::from_pm25(pm25, at, DataSource::Observed)
    }

    fn downtown() -> Location {
        Location::new("Downtown", 34.05, -118.24, 100.0)
    }

    fn plant(area: f64) -> GameAction {
        GameAction::new(ActionType::PlantTree, downtown().with_area(area), 10, 5.0)
    }

    fn running_engine(pm25: f64) -> SimulationEngine {
        let mut engine = SimulationEngine::new(GameConfig::default());
        engine.initialize(&[sample(pm25)], downtown());
        engine
    }

    #[test]
    fn new_engine_is_uninitialized() {
        let engine = SimulationEngine::new(GameConfig::default());
        assert_eq!(engine.phase(), SimulationPhase::Uninitialized);
        assert!(engine.state().is_none());
        assert!(!engine.is_mission_completed());
        assert!(!engine.is_mission_failed());
        assert_eq!(engine.calculate_score(), 0);
    }

    #[test]
    fn initialize_uses_config_target_and_time() {
        let engine = running_engine(40.0);
        let state = engine.state().unwrap();
        assert_eq!(state.baseline_aqi, 112);
        assert_eq!(state.current_aqi, 112);
        assert_eq!(state.target_aqi, 100);
        assert!(close(state.time_remaining, 600.0));
        assert!(state.actions_applied.is_empty());
        assert_eq!(state.predicted_trajectory.len(), 24);
        assert!(close(state.health_impact.current_exposure, 112.0));
        assert_eq!(state.health_impact.safe_threshold, 100);
        assert_eq!(engine.phase(), SimulationPhase::Running);
    }

    #[test]
    fn most_recent_sample_is_the_baseline() {
        let older = sample(80.0);
        let mut newer = sample(20.0);
        newer.timestamp = older.timestamp + Duration::hours(1);
        let mut engine = SimulationEngine::new(GameConfig::default());
        engine.initialize(&[newer, older], downtown());
        assert_eq!(engine.state().unwrap().baseline_aqi, 68);
    }

    #[test]
    fn empty_baseline_leaves_engine_uninitialized() {
        let mut engine = SimulationEngine::new(GameConfig::default());
        engine.initialize(&[], downtown());
        assert_eq!(engine.phase(), SimulationPhase::Uninitialized);

        let err = engine.apply_action(plant(100.0), &sample(40.0)).unwrap_err();
        assert_eq!(err, EngineError::NotInitialized);
    }

    #[test]
    fn planting_trees_downtown() {
        let mut engine = running_engine(40.0);
        let updated = engine.apply_action(plant(100.0), &sample(40.0)).unwrap();

        assert!(close(updated.pm25, 38.0));
        assert_eq!(updated.aqi(), 107);
        assert_eq!(updated.source, DataSource::Simulated);

        let state = engine.state().unwrap();
        assert_eq!(state.current_aqi, 107);
        assert_eq!(state.aqi_improvement(), 5);
        assert_eq!(state.actions_applied.len(), 1);
        assert!(state.actions_applied.iter().all(GameAction::is_completed));
        assert!(close(state.health_impact.current_exposure, 107.0));
    }

    #[test]
    fn pollutants_never_go_negative() {
        let mut engine = running_engine(2.0);
        let site = downtown().with_area(50_000.0);
        let huge = GameAction::new(ActionType::ShutdownFactory, site, 0, 0.0);
        let updated = engine.apply_action(huge, &sample(2.0)).unwrap();
        assert!(updated.pm25 >= 0.0);
        assert!(updated.no2 >= 0.0);
        assert!(updated.o3 >= 0.0);
        assert_eq!(engine.state().unwrap().current_aqi, 0);
        assert!(
            engine
                .state()
                .unwrap()
                .predicted_trajectory
                .iter()
                .all(|point| point.pm25 >= 0.0)
        );
    }

    #[test]
    fn completion_at_exactly_the_target() {
        let mut engine = SimulationEngine::new(GameConfig::default());
        engine.initialize_mission(&[sample(40.0)], downtown(), 107, 600.0);
        assert!(!engine.is_mission_completed());

        engine.apply_action(plant(100.0), &sample(40.0)).unwrap();
        assert!(engine.is_mission_completed());
        assert_eq!(engine.phase(), SimulationPhase::Completed);
    }

    #[test]
    fn clock_runs_out_and_floors_at_zero() {
        let mut engine = SimulationEngine::new(GameConfig::default());
        engine.initialize_mission(&[sample(40.0)], downtown(), 50, 1.0);
        engine.update_time(5.0);

        let state = engine.state().unwrap();
        assert!(close(state.time_remaining, 0.0));
        assert!(engine.is_mission_failed());
        assert_eq!(engine.phase(), SimulationPhase::Failed);
    }

    #[test]
    fn bad_elapsed_values_are_ignored() {
        let mut engine = running_engine(40.0);
        engine.update_time(-30.0);
        engine.update_time(f64::NAN);
        assert!(close(engine.state().unwrap().time_remaining, 600.0));

        engine.update_time(f64::INFINITY);
        assert!(close(engine.state().unwrap().time_remaining, 0.0));
    }

    #[test]
    fn completion_wins_over_failure() {
        let mut engine = SimulationEngine::new(GameConfig::default());
        engine.initialize_mission(&[sample(40.0)], downtown(), 107, 1.0);
        engine.apply_action(plant(100.0), &sample(40.0)).unwrap();
        engine.update_time(10.0);

        assert!(engine.is_mission_completed());
        assert!(engine.is_mission_failed());
        assert_eq!(engine.phase(), SimulationPhase::Completed);
    }

    #[test]
    fn trajectory_is_deterministic_and_hourly() {
        let mut engine = running_engine(40.0);
        let current = engine.apply_action(plant(100.0), &sample(40.0)).unwrap();

        let first = engine.predict_trajectory(&current, 6);
        let second = engine.predict_trajectory(&current, 6);
        assert_eq!(first, second);
        assert_eq!(first.len(), 6);

        for (hour, point) in (0_i64..).zip(&first) {
            assert_eq!(point.timestamp, current.timestamp + Duration::hours(hour));
            assert_eq!(point.source, DataSource::Predicted);
        }
        // Hour zero carries the full effect; later hours decay toward `current`.
        assert!(close(first.first().unwrap().pm25, 36.0));
        let last = first.last().unwrap().pm25;
        assert!(close(last, 38.0 - 2.0 * (-5.0_f64 / 12.0).exp()));
    }

    #[test]
    fn trajectory_without_actions_is_flat() {
        let engine = running_engine(40.0);
        let trajectory = engine.predict_trajectory(&sample(40.0), 3);
        assert!(trajectory.iter().all(|point| close(point.pm25, 40.0)));
        assert!(engine.predict_trajectory(&sample(40.0), 0).is_empty());
    }

    #[test]
    fn score_rewards_improvement_time_and_efficiency() {
        let mut engine = running_engine(40.0);
        // No actions: 0 * 10 + 600 / 60 + 0.
        assert_eq!(engine.calculate_score(), 10);

        engine.apply_action(plant(100.0), &sample(40.0)).unwrap();
        // 5 * 10 + 600 / 60 + 5 / 1 * 5.
        assert_eq!(engine.calculate_score(), 85);

        engine.update_time(600.0);
        assert_eq!(engine.calculate_score(), 75);
    }

    #[test]
    fn worsening_air_scores_negative() {
        let mut engine = SimulationEngine::new(GameConfig::default());
        engine.initialize_mission(&[sample(10.0)], downtown(), 20, 0.0);
        let relocate = GameAction::new(ActionType::Relocate, downtown(), 5, 3.0);
        engine.apply_action(relocate, &sample(40.0)).unwrap();
        // Baseline 42, current 112: -70 * 10 + 0 + -70 * 5.
        assert_eq!(engine.calculate_score(), -1050);
    }

    #[test]
    fn reset_returns_to_uninitialized() {
        let mut engine = running_engine(40.0);
        engine.reset();
        assert_eq!(engine.phase(), SimulationPhase::Uninitialized);
        assert!(engine.state().is_none());
    }
}
