//! Enemy AI.
//!
//! Each enemy runs a three-state machine (Idle, Chase, Attack). States are
//! [`StrategyState`](state_machine::StrategyState)s, so what an enemy does in
//! each state is picked per enemy template:
//!
//! | state  | strategies                      |
//! |--------|---------------------------------|
//! | Idle   | [`IdleStand`], [`IdleWander`]   |
//! | Chase  | [`ChaseDirect`], [`ChaseSteered`] |
//! | Attack | [`AttackMelee`], [`AttackRanged`] |
//!
//! Strategies never move the enemy themselves. They write
//! [`Intents`] and the host applies them.

pub mod agent;
pub mod attack;
pub mod chase;
pub mod enemy;
pub mod idle;
pub mod machine;
pub mod perception;
pub mod steering;
pub mod tracker;

pub use agent::EnemyAgent;
pub use attack::{AttackMelee, AttackRanged};
pub use chase::{ChaseDirect, ChaseSteered};
pub use enemy::{AttackIntent, AttackKind, Enemy, FrameClock, Intents};
pub use idle::{IdleStand, IdleWander};
pub use machine::{AnimationTrigger, Collaborators, EnemyMachine, EnemyStateKind, build_machine};
pub use perception::Perception;
pub use steering::{ContextSteering, Obstacle, Steering};
pub use tracker::{LastKnownTracker, TargetTracker};

/// Distance at which a waypoint counts as reached.
pub const ARRIVAL_RADIUS: f32 = 0.25;
