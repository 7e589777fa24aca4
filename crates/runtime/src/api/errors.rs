//! Unified error types surfaced by the runtime API.
//!
//! Wraps scenario loading, enemy configuration and state machine failures so
//! clients can bubble them up with consistent context.
use std::path::PathBuf;

use game_core::{ConfigError, EntityId};
use state_machine::StateMachineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires a scenario before building")]
    MissingScenario,

    #[error("failed to read scenario file {path}")]
    ScenarioIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario RON")]
    ScenarioParse(#[source] ron::error::SpannedError),

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("spawn references unknown enemy template `{template}`")]
    UnknownTemplate { template: String },

    #[error("enemy template `{template}` is misconfigured")]
    Config {
        template: String,
        #[source]
        source: ConfigError,
    },

    #[error(transparent)]
    StateMachine(#[from] StateMachineError),

    #[error("no enemy with id {0}")]
    UnknownEnemy(EntityId),

    #[error("frame delta must be finite and non-negative, got {0}")]
    InvalidDelta(f32),

    #[error("invalid runtime configuration: {0}")]
    InvalidConfig(String),
}
