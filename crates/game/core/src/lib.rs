//! Enemy AI and stat rules shared by every host.
//!
//! `game-core` holds the gameplay half of the workspace: the stat/modifier
//! pipeline, enemy AI built on [`state_machine`], and the gameplay events
//! raised through [`event_bus`]. Nothing here owns a game loop;
//! hosts drive [`ai::EnemyAgent`]s once per frame and once per physics step.
pub mod ai;
pub mod common;
pub mod config;
pub mod error;
pub mod events;
pub mod math;
pub mod stats;

pub use ai::{
    AnimationTrigger, AttackIntent, AttackKind, Collaborators, ContextSteering, Enemy,
    EnemyAgent, EnemyMachine, EnemyStateKind, LastKnownTracker, Obstacle, Perception, Steering,
    TargetTracker,
};
pub use common::{EntityId, Target};
pub use config::{AttackBehavior, BehaviorConfig, ChaseBehavior, EnemyTemplate, IdleBehavior};
pub use error::ConfigError;
pub use math::{Vec2, distance};
pub use stats::{
    Accumulator, CacheMediator, ModifierOp, StatContainer, StatKind, StatMediator, StatModifier,
};
