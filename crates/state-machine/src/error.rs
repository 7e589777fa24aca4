//! State machine errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StateMachineError>;

/// Misuse of a [`StateMachine`](crate::StateMachine).
///
/// Keys are carried in their `Debug` form so the error stays independent of
/// the machine's key type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateMachineError {
    #[error("state machine driven before initialize")]
    NotInitialized,

    #[error("state machine already initialized (current state {current})")]
    AlreadyInitialized { current: String },

    #[error("no state registered for {key}")]
    UnknownState { key: String },

    #[error("state {key} registered twice")]
    DuplicateState { key: String },

    #[error("state machine has no states")]
    Empty,
}

impl StateMachineError {
    pub(crate) fn unknown(key: impl std::fmt::Debug) -> Self {
        Self::UnknownState {
            key: format!("{key:?}"),
        }
    }

    pub(crate) fn duplicate(key: impl std::fmt::Debug) -> Self {
        Self::DuplicateState {
            key: format!("{key:?}"),
        }
    }
}
