//! Configuration errors raised while assembling enemies.
//!
//! Everything here is detected at construction time. Once an
//! [`EnemyAgent`](crate::ai::EnemyAgent) exists, its strategies have every
//! collaborator they need and its radii are consistent.

use state_machine::StateMachineError;

/// Invalid or incomplete enemy configuration.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("strategy `{strategy}` requires a {collaborator}, none was provided")]
    MissingCollaborator {
        strategy: &'static str,
        collaborator: &'static str,
    },

    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error(
        "perception radii out of order: strike {strike_distance}, aggro {aggro_radius}, \
         leash {leash_radius} (need 0 < strike <= aggro <= leash)"
    )]
    InvalidPerception {
        aggro_radius: f32,
        leash_radius: f32,
        strike_distance: f32,
    },

    #[error("preferred distance {preferred} must lie within strike distance {strike}")]
    PreferredDistanceOutOfRange { preferred: f32, strike: f32 },

    #[error(transparent)]
    StateMachine(#[from] StateMachineError),
}

impl ConfigError {
    /// Checks that `value` is strictly positive (NaN fails too).
    pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<(), Self> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(Self::NonPositive { field, value })
        }
    }
}
