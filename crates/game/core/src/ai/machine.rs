//! Enemy state machine family and its assembly from configuration.

use std::rc::Rc;

use state_machine::{Machine, StateMachine, Strategy};

use super::{
    AttackMelee, AttackRanged, ChaseDirect, ChaseSteered, Enemy, IdleStand, IdleWander,
    Perception, Steering, TargetTracker,
};
use crate::config::{AttackBehavior, BehaviorConfig, ChaseBehavior, IdleBehavior};
use crate::error::ConfigError;

/// The three top-level enemy states.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EnemyStateKind {
    Idle,
    Chase,
    Attack,
}

/// Animation events forwarded to the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AnimationTrigger {
    Damaged,
    Footstep,
    AttackHit,
    AttackFinished,
}

/// Type family of enemy state machines.
#[derive(Debug)]
pub enum EnemyMachine {}

impl Machine for EnemyMachine {
    type Key = EnemyStateKind;
    type Context = Enemy;
    type Trigger = AnimationTrigger;
}

/// World queries handed to strategies at construction.
///
/// Each field is only required by some strategies; asking for a strategy
/// whose collaborator is missing fails with
/// [`ConfigError::MissingCollaborator`].
#[derive(Default)]
pub struct Collaborators {
    pub steering: Option<Rc<dyn Steering>>,
    pub tracker: Option<Box<dyn TargetTracker>>,
    /// Seed for strategies with randomness.
    pub seed: u64,
}

impl Collaborators {
    fn take_tracker(
        &mut self,
        strategy: &'static str,
    ) -> Result<Box<dyn TargetTracker>, ConfigError> {
        self.tracker.take().ok_or(ConfigError::MissingCollaborator {
            strategy,
            collaborator: "target tracker",
        })
    }

    fn steering(&self, strategy: &'static str) -> Result<Rc<dyn Steering>, ConfigError> {
        self.steering
            .clone()
            .ok_or(ConfigError::MissingCollaborator {
                strategy,
                collaborator: "steering",
            })
    }
}

/// Builds the Idle/Chase/Attack machine selected by `behavior`.
///
/// Validates the behaviour parameters against `perception` and fails before
/// anything is built if a strategy lacks a collaborator.
pub fn build_machine(
    behavior: &BehaviorConfig,
    perception: &Perception,
    mut collaborators: Collaborators,
) -> Result<StateMachine<EnemyMachine>, ConfigError> {
    perception.validate()?;

    let idle: Box<dyn Strategy<EnemyMachine>> = match behavior.idle {
        IdleBehavior::Stand => Box::new(IdleStand),
        IdleBehavior::Wander { radius, speed } => {
            Box::new(IdleWander::new(radius, speed, collaborators.seed)?)
        }
    };

    let chase: Box<dyn Strategy<EnemyMachine>> = match behavior.chase {
        ChaseBehavior::Direct { speed } => Box::new(ChaseDirect::new(
            speed,
            collaborators.take_tracker("chase_direct")?,
        )?),
        ChaseBehavior::Steered { speed } => {
            let steering = collaborators.steering("chase_steered")?;
            let tracker = collaborators.take_tracker("chase_steered")?;
            Box::new(ChaseSteered::new(speed, tracker, steering)?)
        }
    };

    let attack: Box<dyn Strategy<EnemyMachine>> = match behavior.attack {
        AttackBehavior::Melee { cooldown } => Box::new(AttackMelee::new(cooldown)?),
        AttackBehavior::Ranged {
            cooldown,
            preferred_distance,
        } => {
            if preferred_distance > perception.strike_distance {
                return Err(ConfigError::PreferredDistanceOutOfRange {
                    preferred: preferred_distance,
                    strike: perception.strike_distance,
                });
            }
            Box::new(AttackRanged::new(cooldown, preferred_distance)?)
        }
    };

    let machine = StateMachine::builder()
        .boxed_strategy(EnemyStateKind::Idle, idle)
        .boxed_strategy(EnemyStateKind::Chase, chase)
        .boxed_strategy(EnemyStateKind::Attack, attack)
        .build()?;
    Ok(machine)
}
