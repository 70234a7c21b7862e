//! Error types for the `clearsky-engine` crate.
//!
//! The engine prefers safe defaults over errors for malformed numeric input
//! (unknown effects are zero, negative concentrations clamp to zero). The
//! variants here cover the conditions a caller must not silently ignore:
//! acting on an engine with no baseline, and the session preconditions on
//! credits and cooldowns.

use clearsky_types::ActionType;

/// Errors that can occur during engine and session operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The simulation has no baseline yet.
    #[error("simulation is not initialized")]
    NotInitialized,

    /// The mission already finished; no further actions are accepted.
    #[error("session is over")]
    SessionOver,

    /// The player cannot pay for the action.
    #[error("insufficient credits: action costs {required} but only {available} available")]
    InsufficientCredits {
        /// Credits the action costs.
        required: u32,
        /// Credits the player holds.
        available: u32,
    },

    /// The same action kind was used too recently.
    #[error("{action_type:?} is cooling down for another {remaining_seconds:.1}s")]
    CooldownActive {
        /// The requested action kind.
        action_type: ActionType,
        /// Seconds until the action is available again.
        remaining_seconds: f64,
    },
}
