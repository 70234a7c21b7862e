//! Scenario run loop.
//!
//! [`run_scenario`] drives a [`GameSession`] on a fixed wall-clock interval.
//! Each iteration:
//!
//! 1. Fires the scenario's actions and progress reports for this tick
//! 2. Waits for the next interval
//! 3. Measures the real time since the previous tick, scales it by
//!    `time_scale`, and advances the session by that much
//! 4. Stops on completion, failure or `max_ticks`
//!
//! Rejected actions (cooldown, credits) are logged and counted; they never
//! abort the run.

use clearsky_engine::{GameSession, TickReport};
use clearsky_types::{AqiCategory, SimulationPhase, non_negative};
use serde::Serialize;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::scenario::Scenario;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The mission's AQI target was reached.
    Completed,
    /// The mission clock ran out.
    Failed,
    /// The scenario's tick limit was reached first.
    MaxTicksReached,
    /// The scenario had no baseline readings.
    Uninitialized,
}

/// Outcome of a scenario run, printed as JSON by the binary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Scenario name.
    pub scenario: String,
    /// Mission name.
    pub mission: String,
    /// Why the run stopped.
    pub end_reason: EndReason,
    /// Ticks executed.
    pub total_ticks: u64,
    /// Actions accepted by the session.
    pub actions_performed: u32,
    /// Actions rejected by the session.
    pub actions_rejected: u32,
    /// AQI at mission start.
    pub baseline_aqi: u32,
    /// The last tick report, if any tick ran.
    pub final_report: Option<TickReport>,
    /// Label of the final AQI category, if any tick ran.
    pub final_category: Option<&'static str>,
    /// Health advisory for the final AQI category, if any tick ran.
    pub final_advisory: Option<&'static str>,
    /// Points from completed objectives.
    pub objective_points: u32,
    /// Completed objectives.
    pub objectives_completed: usize,
    /// Objectives in the mission.
    pub objectives_total: usize,
}

/// Run `scenario` against `session` until a termination condition is met.
pub async fn run_scenario(session: &mut GameSession, scenario: &Scenario) -> RunSummary {
    let mut actions_performed: u32 = 0;
    let mut actions_rejected: u32 = 0;
    let mut total_ticks: u64 = 0;
    let mut final_report: Option<TickReport> = None;

    if session.phase() == SimulationPhase::Uninitialized {
        warn!(scenario = %scenario.name, "Scenario has no baseline readings");
        return summarize(session, scenario, EndReason::Uninitialized, 0, 0, 0, None);
    }

    let time_scale = non_negative(scenario.time_scale);
    let period = Duration::from_millis(scenario.tick_interval_ms.max(1));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        scenario = %scenario.name,
        tick_interval_ms = scenario.tick_interval_ms,
        time_scale,
        max_ticks = scenario.max_ticks,
        scripted_actions = scenario.actions.len(),
        "Scenario starting"
    );

    // The first tick of a tokio interval completes immediately.
    interval.tick().await;
    let mut last = Instant::now();

    let end_reason = loop {
        // --- Scripted input ---
        for scripted in scenario.actions_at(total_ticks) {
            match session.perform_action(scripted.action_type, scripted.area) {
                Ok(outcome) => {
                    actions_performed = actions_performed.saturating_add(1);
                    debug!(
                        tick = total_ticks,
                        description = %outcome.effect.description,
                        aqi = outcome.aqi,
                        "Scripted action applied"
                    );
                }
                Err(e) => {
                    actions_rejected = actions_rejected.saturating_add(1);
                    warn!(
                        tick = total_ticks,
                        action = ?scripted.action_type,
                        error = %e,
                        "Scripted action rejected"
                    );
                }
            }
        }
        for report in scenario.progress_at(total_ticks) {
            session
                .tracker_mut()
                .record_progress(report.objective_type, report.amount);
        }

        // --- Wait and advance ---
        interval.tick().await;
        let now = Instant::now();
        let elapsed = now.duration_since(last).as_secs_f64() * time_scale;
        last = now;

        let report = session.tick(elapsed);
        total_ticks = total_ticks.saturating_add(1);
        let phase = report.phase;
        final_report = Some(report);

        // --- Termination ---
        if phase.is_finished() {
            if phase == SimulationPhase::Completed {
                break EndReason::Completed;
            }
            break EndReason::Failed;
        }
        if scenario.max_ticks > 0 && total_ticks >= scenario.max_ticks {
            info!(max_ticks = scenario.max_ticks, "Tick limit reached");
            break EndReason::MaxTicksReached;
        }
    };

    summarize(
        session,
        scenario,
        end_reason,
        total_ticks,
        actions_performed,
        actions_rejected,
        final_report,
    )
}

/// Log the end of a run.
pub fn log_run_end(summary: &RunSummary) {
    info!(
        reason = ?summary.end_reason,
        total_ticks = summary.total_ticks,
        baseline_aqi = summary.baseline_aqi,
        final_aqi = summary.final_report.as_ref().map(|r| r.current_aqi),
        score = summary.final_report.as_ref().map(|r| r.score),
        category = summary.final_category,
        objective_points = summary.objective_points,
        "Scenario ended"
    );
}

fn summarize(
    session: &GameSession,
    scenario: &Scenario,
    end_reason: EndReason,
    total_ticks: u64,
    actions_performed: u32,
    actions_rejected: u32,
    final_report: Option<TickReport>,
) -> RunSummary {
    let tracker = session.tracker();
    let final_category = final_report.as_ref().map(|report| report.category);
    RunSummary {
        scenario: scenario.name.clone(),
        mission: session.mission().name.clone(),
        end_reason,
        total_ticks,
        actions_performed,
        actions_rejected,
        baseline_aqi: session.engine().state().map_or(0, |state| state.baseline_aqi),
        final_report,
        final_category: final_category.map(AqiCategory::label),
        final_advisory: final_category.map(AqiCategory::health_advisory),
        objective_points: tracker.points_earned(),
        objectives_completed: tracker.completed_count(),
        objectives_total: tracker.objectives().len(),
    }
}
