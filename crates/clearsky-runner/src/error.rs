//! Error types for the runner binary.
//!
//! [`RunnerError`] wraps every failure mode during startup so `main` can
//! propagate with `?`. The run loop itself does not fail: rejected actions
//! are logged and counted.

/// Top-level error for the runner binary.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: clearsky_engine::ConfigError,
    },

    /// Scenario loading failed.
    #[error("scenario error: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: crate::scenario::ScenarioError,
    },

    /// The run summary could not be serialized.
    #[error("failed to serialize run summary: {source}")]
    Json {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}
