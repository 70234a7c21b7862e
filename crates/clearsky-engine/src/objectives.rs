//! Mission objective tracking.
//!
//! [`MissionTracker`] consumes the engine's outputs (action kinds, credits
//! spent, the current AQI and the mission clock) and advances the mission's
//! objectives:
//!
//! | Objective              | `current` holds          | Completes when                        |
//! |------------------------|--------------------------|---------------------------------------|
//! | `reduce_aqi`           | latest AQI               | AQI <= target                         |
//! | `plant_trees`          | planting actions         | count >= target                       |
//! | `remove_pollution`     | source-removal actions   | count >= target                       |
//! | `time_limit`           | elapsed seconds          | mission AQI reached, elapsed <= target |
//! | `budget_limit`         | credits spent            | mission AQI reached, spent <= target  |
//! | `satellite_data`       | externally fed progress  | progress >= target                    |
//! | `community_engagement` | externally fed progress  | progress >= target                    |
//!
//! Completion is monotonic: once an objective is completed it stays
//! completed, whatever later observations say.

use clearsky_types::{ActionType, Mission, MissionObjective, ObjectiveType, non_negative};
use tracing::{debug, info};

/// Objective progress for one mission.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionTracker {
    target_aqi: u32,
    objectives: Vec<MissionObjective>,
}

impl MissionTracker {
    /// Start tracking `mission`'s objectives from a clean slate.
    pub fn new(mission: &Mission) -> Self {
        let objectives = mission
            .objectives
            .iter()
            .map(|objective| MissionObjective {
                current: 0.0,
                is_completed: false,
                ..objective.clone()
            })
            .collect();
        Self {
            target_aqi: mission.target_aqi,
            objectives,
        }
    }

    /// The tracked objectives, in mission order.
    pub fn objectives(&self) -> &[MissionObjective] {
        &self.objectives
    }

    /// Count a performed action and the credits it cost.
    pub fn record_action(&mut self, action_type: ActionType, cost: u32) {
        for objective in &mut self.objectives {
            match objective.objective_type {
                ObjectiveType::PlantTrees if action_type.is_planting() => {
                    objective.current += 1.0;
                    complete_if(objective.current >= objective.target, objective);
                }
                ObjectiveType::RemovePollution if action_type.removes_pollution_source() => {
                    objective.current += 1.0;
                    complete_if(objective.current >= objective.target, objective);
                }
                ObjectiveType::BudgetLimit => {
                    objective.current += f64::from(cost);
                }
                _ => {}
            }
        }
    }

    /// Observe the current AQI and the seconds elapsed since mission start.
    pub fn observe(&mut self, current_aqi: u32, elapsed_seconds: f64) {
        let aqi = f64::from(current_aqi);
        let elapsed = non_negative(elapsed_seconds);
        let goal_reached = current_aqi <= self.target_aqi;

        for objective in &mut self.objectives {
            match objective.objective_type {
                ObjectiveType::ReduceAqi => {
                    objective.current = aqi;
                    complete_if(aqi <= objective.target, objective);
                }
                ObjectiveType::TimeLimit => {
                    objective.current = elapsed;
                    complete_if(goal_reached && elapsed <= objective.target, objective);
                }
                ObjectiveType::BudgetLimit => {
                    complete_if(goal_reached && objective.current <= objective.target, objective);
                }
                _ => {}
            }
        }
    }

    /// Add externally measured progress to `objective_type`.
    ///
    /// Only `satellite_data` and `community_engagement` accept external
    /// progress; other kinds are derived from play and are left untouched.
    pub fn record_progress(&mut self, objective_type: ObjectiveType, amount: f64) {
        if !matches!(
            objective_type,
            ObjectiveType::SatelliteData | ObjectiveType::CommunityEngagement
        ) {
            debug!(?objective_type, "Ignoring external progress for a derived objective");
            return;
        }
        let amount = non_negative(amount);
        for objective in &mut self.objectives {
            if objective.objective_type == objective_type {
                objective.current += amount;
                complete_if(objective.current >= objective.target, objective);
            }
        }
    }

    /// Whether every objective is completed. A mission with no objectives
    /// is never complete.
    pub fn is_complete(&self) -> bool {
        !self.objectives.is_empty() && self.objectives.iter().all(|o| o.is_completed)
    }

    /// Sum of points for completed objectives.
    pub fn points_earned(&self) -> u32 {
        self.objectives
            .iter()
            .filter(|o| o.is_completed)
            .fold(0_u32, |total, o| total.saturating_add(o.points))
    }

    /// Number of completed objectives.
    pub fn completed_count(&self) -> usize {
        self.objectives.iter().filter(|o| o.is_completed).count()
    }
}

fn complete_if(met: bool, objective: &mut MissionObjective) {
    if met && !objective.is_completed {
        objective.is_completed = true;
        info!(
            objective = ?objective.objective_type,
            points = objective.points,
            "Objective completed"
        );
    }
}
