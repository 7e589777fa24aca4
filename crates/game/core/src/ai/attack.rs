//! Attack strategies.
//!
//! Attacks fire on a cooldown while the target stays within strike distance.
//! The cooldown runs on the enemy clock and survives leaving the Attack
//! state, so stepping in and out of reach cannot force extra attacks.
//! Each attack becomes an [`AttackIntent`] the host resolves; the hit frame of
//! the attack animation raises a local [`AttackLanded`].

use state_machine::{Strategy, Transition};

use super::{AnimationTrigger, AttackIntent, AttackKind, Enemy, EnemyMachine, EnemyStateKind};
use crate::Vec2;
use crate::error::ConfigError;
use crate::events::AttackLanded;
use crate::stats::StatKind;

/// Cooldown bookkeeping shared by both attack flavours.
#[derive(Clone, Copy, Debug, Default)]
struct Cooldown {
    length: f32,
    /// Clock time at which the next attack may launch; `None` until the first.
    ready_at: Option<f32>,
    last_damage: f32,
}

impl Cooldown {
    fn new(field: &'static str, length: f32) -> Result<Self, ConfigError> {
        ConfigError::require_positive(field, length)?;
        Ok(Self {
            length,
            ..Self::default()
        })
    }

    fn is_ready(&self, now: f32) -> bool {
        self.ready_at.is_none_or(|ready_at| now >= ready_at)
    }

    /// Emits an attack if the cooldown elapsed.
    fn try_launch(&mut self, enemy: &mut Enemy, kind: AttackKind) -> bool {
        let Some(target) = enemy.aggro_target else {
            return false;
        };
        let now = enemy.clock.elapsed;
        if !self.is_ready(now) {
            return false;
        }
        let damage = enemy.stat(StatKind::Attack);
        enemy.intents.attack = Some(AttackIntent {
            kind,
            target: target.position,
            damage,
        });
        self.ready_at = Some(now + self.length);
        self.last_damage = damage;
        tracing::debug!(enemy = %enemy.id, %kind, damage, "attack launched");
        true
    }

    fn land(&self, enemy: &Enemy) {
        enemy.events().call(&AttackLanded {
            damage: self.last_damage,
        });
    }
}

/// Holds ground and swings at the target.
///
/// A swing commits the enemy until the `AttackFinished` animation event or
/// the cooldown elapses, whichever comes first; a target stepping out of
/// reach mid-swing does not cancel it.
#[derive(Clone, Debug)]
pub struct AttackMelee {
    cooldown: Cooldown,
    committed: bool,
}

impl AttackMelee {
    pub fn new(cooldown: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            cooldown: Cooldown::new("melee.cooldown", cooldown)?,
            committed: false,
        })
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }
}

impl Strategy<EnemyMachine> for AttackMelee {
    fn enter(&mut self, enemy: &mut Enemy) {
        enemy.intents.movement = Vec2::ZERO;
    }

    fn frame_update(&mut self, enemy: &mut Enemy) -> Transition<EnemyStateKind> {
        if enemy.aggro_target.is_none() {
            return Transition::To(EnemyStateKind::Idle);
        }

        if self.committed && self.cooldown.is_ready(enemy.clock.elapsed) {
            self.committed = false;
        }

        if !enemy.within_strike {
            return if self.committed {
                Transition::Stay
            } else {
                Transition::To(EnemyStateKind::Chase)
            };
        }

        if self.cooldown.try_launch(enemy, AttackKind::Melee) {
            self.committed = true;
        }
        Transition::Stay
    }

    fn animation_trigger(
        &mut self,
        trigger: AnimationTrigger,
        enemy: &mut Enemy,
    ) -> Transition<EnemyStateKind> {
        match trigger {
            AnimationTrigger::AttackHit => {
                self.cooldown.land(enemy);
                Transition::Stay
            }
            AnimationTrigger::AttackFinished => {
                self.committed = false;
                if enemy.within_strike {
                    Transition::Stay
                } else {
                    Transition::To(EnemyStateKind::Chase)
                }
            }
            AnimationTrigger::Damaged | AnimationTrigger::Footstep => Transition::Stay,
        }
    }

    fn reset_values(&mut self) {
        self.committed = false;
    }
}

/// Shoots from range, backing off when the target gets closer than
/// `preferred_distance`.
#[derive(Clone, Debug)]
pub struct AttackRanged {
    cooldown: Cooldown,
    preferred_distance: f32,
}

impl AttackRanged {
    pub fn new(cooldown: f32, preferred_distance: f32) -> Result<Self, ConfigError> {
        ConfigError::require_positive("ranged.preferred_distance", preferred_distance)?;
        Ok(Self {
            cooldown: Cooldown::new("ranged.cooldown", cooldown)?,
            preferred_distance,
        })
    }

    pub fn preferred_distance(&self) -> f32 {
        self.preferred_distance
    }
}

impl Strategy<EnemyMachine> for AttackRanged {
    fn enter(&mut self, enemy: &mut Enemy) {
        enemy.intents.movement = Vec2::ZERO;
    }

    fn exit(&mut self, enemy: &mut Enemy) {
        enemy.intents.movement = Vec2::ZERO;
    }

    fn frame_update(&mut self, enemy: &mut Enemy) -> Transition<EnemyStateKind> {
        if enemy.aggro_target.is_none() {
            return Transition::To(EnemyStateKind::Idle);
        }
        if !enemy.within_strike {
            return Transition::To(EnemyStateKind::Chase);
        }
        self.cooldown.try_launch(enemy, AttackKind::Ranged);
        Transition::Stay
    }

    fn physics_update(&mut self, enemy: &mut Enemy) -> Transition<EnemyStateKind> {
        let crowding = enemy
            .aggro_target
            .filter(|t| enemy.position.distance(t.position) < self.preferred_distance);
        enemy.intents.movement = match crowding {
            Some(target) => {
                let away = (enemy.position - target.position).normalize_or_zero();
                away * enemy.stat(StatKind::Speed)
            }
            None => Vec2::ZERO,
        };
        Transition::Stay
    }

    fn animation_trigger(
        &mut self,
        trigger: AnimationTrigger,
        enemy: &mut Enemy,
    ) -> Transition<EnemyStateKind> {
        if trigger == AnimationTrigger::AttackHit {
            self.cooldown.land(enemy);
        }
        Transition::Stay
    }
}
