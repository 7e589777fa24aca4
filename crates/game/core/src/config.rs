//! Data-driven enemy configuration.
//!
//! These types are what scenario files deserialize into (with the `serde`
//! feature). [`build_machine`](crate::ai::build_machine) turns a
//! [`BehaviorConfig`] into a state machine.

use crate::ai::Perception;
use crate::stats::StatContainer;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IdleBehavior {
    Stand,
    Wander { radius: f32, speed: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChaseBehavior {
    Direct { speed: f32 },
    /// Needs a steering collaborator.
    Steered { speed: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackBehavior {
    Melee { cooldown: f32 },
    Ranged { cooldown: f32, preferred_distance: f32 },
}

/// Which strategy runs in each enemy state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BehaviorConfig {
    pub idle: IdleBehavior,
    pub chase: ChaseBehavior,
    pub attack: AttackBehavior,
}

impl BehaviorConfig {
    pub const DEFAULT_CHASE_SPEED: f32 = 3.0;
    pub const DEFAULT_ATTACK_COOLDOWN: f32 = 1.0;
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            idle: IdleBehavior::Stand,
            chase: ChaseBehavior::Direct {
                speed: Self::DEFAULT_CHASE_SPEED,
            },
            attack: AttackBehavior::Melee {
                cooldown: Self::DEFAULT_ATTACK_COOLDOWN,
            },
        }
    }
}

/// Everything needed to spawn one kind of enemy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub name: String,
    pub stats: StatContainer,
    #[cfg_attr(feature = "serde", serde(default))]
    pub perception: Perception,
    #[cfg_attr(feature = "serde", serde(default))]
    pub behavior: BehaviorConfig,
    /// Seconds a chasing enemy keeps heading for where it last saw its
    /// target.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tracking_memory: f32,
}

impl EnemyTemplate {
    pub fn new(name: impl Into<String>, stats: StatContainer) -> Self {
        Self {
            name: name.into(),
            stats,
            perception: Perception::default(),
            behavior: BehaviorConfig::default(),
            tracking_memory: 0.0,
        }
    }
}
