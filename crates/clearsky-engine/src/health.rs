//! Player health mechanics applied each tick.
//!
//! Branches on the safe zone (`current_aqi <= safe_aqi_threshold`):
//!
//! - Inside: health and energy recover by `recovery_rate` per minute,
//!   capped at 100. The exposure allowance is untouched.
//! - Outside: health and energy drain by
//!   `(current_aqi / 100) * health_drain_rate` per minute, floored at 0,
//!   and the exposure allowance shrinks by the elapsed seconds.
//!
//! Health and energy always move together.

use clearsky_types::{PlayerState, non_negative};

use crate::config::GameConfig;

/// Upper bound for health and energy.
pub const MAX_VITAL: f64 = 100.0;

/// Whether `current_aqi` is within the safe zone.
pub const fn in_safe_zone(current_aqi: u32, config: &GameConfig) -> bool {
    current_aqi <= config.safe_aqi_threshold
}

/// A fresh player: full health and energy, starting credits, full exposure
/// allowance.
///
/// The player starts in the safe zone; [`GameSession::start`] re-derives the
/// flag from the starting AQI.
///
/// [`GameSession::start`]: crate::session::GameSession::start
pub fn new_player(config: &GameConfig) -> PlayerState {
    PlayerState {
        health: MAX_VITAL,
        energy: MAX_VITAL,
        credits: config.starting_credits,
        is_in_safe_zone: true,
        safe_time_remaining: config.safe_exposure_seconds,
    }
}

/// Apply `elapsed_seconds` of exposure at `current_aqi` to `player`.
///
/// Pure: returns the updated record. Negative or NaN elapsed time counts as
/// zero; an infinite interval saturates at the clamps.
pub fn update_health(
    player: &PlayerState,
    current_aqi: u32,
    elapsed_seconds: f64,
    config: &GameConfig,
) -> PlayerState {
    let seconds = non_negative(elapsed_seconds);
    let minutes = seconds / 60.0;
    let is_in_safe_zone = in_safe_zone(current_aqi, config);

    if is_in_safe_zone {
        // 0 * inf is NaN; treat it as no recovery.
        let gain = non_negative(config.recovery_rate * minutes);
        PlayerState {
            health: (player.health + gain).min(MAX_VITAL),
            energy: (player.energy + gain).min(MAX_VITAL),
            is_in_safe_zone,
            ..player.clone()
        }
    } else {
        let severity = f64::from(current_aqi) / 100.0;
        let drain = non_negative(severity * config.health_drain_rate * minutes);
        PlayerState {
            health: (player.health - drain).max(0.0),
            energy: (player.energy - drain).max(0.0),
            is_in_safe_zone,
            safe_time_remaining: (player.safe_time_remaining - seconds).max(0.0),
            ..player.clone()
        }
    }
}
