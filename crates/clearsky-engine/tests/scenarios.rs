//! End-to-end mission scenarios across the engine's modules.
//!
//! Each test drives a [`GameSession`] the way the player-facing layer does:
//! load balance from YAML, start a mission from baseline readings, perform
//! actions, and tick the clock until the mission ends.

#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing
)]

use chrono::{Duration, TimeZone, Utc};
use clearsky_engine::{
    EngineError, GameConfig, GameSession, SimulationEngine, compute_aqi, compute_effect,
};
use clearsky_types::{
    ActionType, AirQualitySample, DataSource, GameAction, Location, Mission, MissionId,
    MissionObjective, ObjectiveType, SimulationPhase,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn downtown() -> Location {
    Location::new("Downtown", 34.05, -118.24, 0.0)
}

/// Three hourly readings; the last one (PM2.5 40, AQI 112) is the baseline.
fn morning_readings() -> Vec<AirQualitySample> {
    let start = Utc.with_ymd_and_hms(2026, 6, 1, 6, 0, 0).unwrap();
    [44.0, 42.0, 40.0]
        .into_iter()
        .zip(0_i64..)
        .map(|(pm25, hour)| {
            AirQualitySample::from_pm25(pm25, start + Duration::hours(hour), DataSource::Observed)
        })
        .collect()
}

fn clean_downtown() -> Mission {
    Mission {
        id: MissionId::new(),
        name: String::from("Clean Downtown"),
        target_aqi: 100,
        time_limit: 600.0,
        objectives: vec![
            MissionObjective::new(ObjectiveType::ReduceAqi, 100.0, 100, "Bring AQI under 100"),
            MissionObjective::new(ObjectiveType::PlantTrees, 1.0, 25, "Plant trees"),
            MissionObjective::new(ObjectiveType::RemovePollution, 1.0, 25, "Remove a source"),
            MissionObjective::new(ObjectiveType::TimeLimit, 120.0, 50, "Finish in two minutes"),
            MissionObjective::new(ObjectiveType::BudgetLimit, 50.0, 50, "Spend at most 50"),
        ],
    }
}

#[test]
fn downtown_mission_completes_with_every_objective() {
    let config = GameConfig::parse("starting_credits: 200\n").unwrap();
    let mut session = GameSession::start(config, clean_downtown(), &morning_readings(), downtown());
    assert_eq!(session.engine().state().unwrap().baseline_aqi, 112);

    let trees = session.perform_action(ActionType::PlantTree, 100.0).unwrap();
    assert_eq!(trees.aqi, 107);
    assert_eq!(session.tick(10.0).phase, SimulationPhase::Running);

    // Three vehicles: PM2.5 38 -> 32.
    let vehicles = session.perform_action(ActionType::RemoveVehicle, 60.0).unwrap();
    assert!(close(vehicles.sample.pm25, 32.0));
    assert_eq!(vehicles.aqi, 93);
    assert_eq!(vehicles.credits_remaining, 170);

    let report = session.tick(1.0);
    assert_eq!(report.phase, SimulationPhase::Completed);
    assert!(session.tracker().is_complete());
    assert_eq!(session.tracker().points_earned(), 250);

    // The clock stopped at completion. Improvement 19: 190 + 590 / 60 + 19 / 2 * 5.
    assert_eq!(report.score, 247);
}

#[test]
fn idle_mission_times_out() {
    let config = GameConfig::default();
    let mut session = GameSession::start(config, clean_downtown(), &morning_readings(), downtown());

    let mut report = session.tick(0.0);
    let mut ticks = 0_u32;
    while report.phase == SimulationPhase::Running {
        report = session.tick(60.0);
        ticks = ticks.saturating_add(1);
    }

    assert_eq!(ticks, 10);
    assert_eq!(report.phase, SimulationPhase::Failed);
    assert!(close(report.time_remaining, 0.0));
    // Ten minutes at AQI 112: 11.2 health lost.
    assert!(close(report.health, 100.0 - 11.2));
    assert!(close(session.player().safe_time_remaining, 0.0));
    assert!(!session.tracker().is_complete());
}

#[test]
fn aqi_never_increases_under_removal_actions() {
    let mut engine = SimulationEngine::new(GameConfig::default());
    engine.initialize(&morning_readings(), downtown());

    let mut current = morning_readings().pop().unwrap();
    let mut previous_aqi = current.aqi();
    for action_type in ActionType::ALL {
        if action_type == ActionType::Relocate {
            continue;
        }
        let action = GameAction::new(action_type, downtown().with_area(1000.0), 0, 0.0);
        current = engine.apply_action(action, &current).unwrap();
        assert!(current.aqi() <= previous_aqi, "{action_type:?}");
        assert!(current.pm25 >= 0.0);
        assert_eq!(current.aqi(), compute_aqi(current.pm25));
        previous_aqi = current.aqi();
    }
    assert_eq!(engine.state().unwrap().actions_applied.len(), 6);
}

#[test]
fn factory_shutdown_beats_any_single_vehicle_or_tree() {
    let config = GameConfig::default();
    let params = &config.simulation_parameters;
    let unit = |action_type: ActionType, area: f64| {
        compute_effect(&GameAction::new(action_type, downtown().with_area(area), 0, 0.0), params)
    };
    let factory = unit(ActionType::ShutdownFactory, 1000.0);
    let vehicle = unit(ActionType::RemoveVehicle, 20.0);
    let tree = unit(ActionType::PlantTree, 25.0);
    assert!(factory.pm25_change < vehicle.pm25_change);
    assert!(vehicle.pm25_change < tree.pm25_change);
    assert!(factory.area_of_effect > vehicle.area_of_effect);
}

#[test]
fn credits_run_out() {
    let config = GameConfig::parse("starting_credits: 150\n").unwrap();
    let mission = Mission {
        target_aqi: 10,
        ..clean_downtown()
    };
    let mut session = GameSession::start(config, mission, &morning_readings(), downtown());

    session.perform_action(ActionType::ShutdownFactory, 1000.0).unwrap();
    let err = session.perform_action(ActionType::RetrofitFactory, 1000.0).unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientCredits {
            required: 60,
            available: 50
        }
    );
    session.perform_action(ActionType::RemoveConstruction, 500.0).unwrap();
    assert_eq!(session.player().credits, 10);
}

#[test]
fn reports_serialize_for_the_interface() {
    let mut session = GameSession::start(
        GameConfig::default(),
        clean_downtown(),
        &morning_readings(),
        downtown(),
    );
    let outcome = session.perform_action(ActionType::PlantTree, 50.0).unwrap();
    let report = session.tick(1.0);

    let outcome_json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(outcome_json["action_type"], "plant_tree");
    assert_eq!(outcome_json["sample"]["source"], "simulated");

    let report_json = serde_json::to_value(&report).unwrap();
    assert_eq!(report_json["phase"], "running");
    assert_eq!(report_json["current_aqi"], report.current_aqi);
}
