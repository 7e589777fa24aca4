//! Chase strategies.
//!
//! A chasing enemy heads for its aggro target, or for the target's last
//! known position while its tracker still remembers one. It requests Attack
//! once within strike distance and Idle once there is nothing left to chase.

use std::rc::Rc;

use state_machine::{Strategy, Transition};

use super::{ARRIVAL_RADIUS, Enemy, EnemyMachine, EnemyStateKind, Steering, TargetTracker};
use crate::Vec2;
use crate::error::ConfigError;
use crate::stats::StatKind;

/// State shared by both chase flavours.
struct Pursuit {
    speed: f32,
    tracker: Box<dyn TargetTracker>,
}

impl Pursuit {
    fn new(speed: f32, tracker: Box<dyn TargetTracker>) -> Result<Self, ConfigError> {
        ConfigError::require_positive("chase.speed", speed)?;
        Ok(Self { speed, tracker })
    }

    fn decide(&mut self, enemy: &Enemy) -> Transition<EnemyStateKind> {
        let now = enemy.clock.elapsed;
        self.tracker
            .observe(enemy.aggro_target.map(|t| t.position), now);

        if enemy.aggro_target.is_some() && enemy.within_strike {
            Transition::To(EnemyStateKind::Attack)
        } else if enemy.aggro_target.is_none() && self.tracker.last_known(now).is_none() {
            Transition::To(EnemyStateKind::Idle)
        } else {
            Transition::Stay
        }
    }

    /// Where to run to this step, if anywhere.
    fn destination(&mut self, enemy: &Enemy) -> Option<Vec2> {
        if let Some(target) = enemy.aggro_target {
            return Some(target.position);
        }
        let remembered = self.tracker.last_known(enemy.clock.elapsed)?;
        if enemy.position.distance(remembered) <= ARRIVAL_RADIUS {
            tracing::trace!(enemy = %enemy.id, "reached last known position");
            self.tracker.forget();
            return None;
        }
        Some(remembered)
    }

    fn drive(&mut self, enemy: &mut Enemy, direction: impl Fn(Vec2, Vec2) -> Vec2) {
        let movement = match self.destination(enemy) {
            Some(to) => {
                let speed = self.speed * enemy.stat(StatKind::Speed);
                direction(enemy.position, to) * speed
            }
            None => Vec2::ZERO,
        };
        enemy.intents.movement = movement;
    }
}

/// Runs straight at the target.
pub struct ChaseDirect {
    pursuit: Pursuit,
}

impl ChaseDirect {
    pub fn new(speed: f32, tracker: Box<dyn TargetTracker>) -> Result<Self, ConfigError> {
        Ok(Self {
            pursuit: Pursuit::new(speed, tracker)?,
        })
    }
}

impl Strategy<EnemyMachine> for ChaseDirect {
    fn exit(&mut self, enemy: &mut Enemy) {
        enemy.intents.movement = Vec2::ZERO;
    }

    fn frame_update(&mut self, enemy: &mut Enemy) -> Transition<EnemyStateKind> {
        self.pursuit.decide(enemy)
    }

    fn physics_update(&mut self, enemy: &mut Enemy) -> Transition<EnemyStateKind> {
        self.pursuit
            .drive(enemy, |from, to| (to - from).normalize_or_zero());
        Transition::Stay
    }

    fn reset_values(&mut self) {
        self.pursuit.tracker.forget();
    }
}

/// Routes around obstacles using a [`Steering`] query.
pub struct ChaseSteered {
    pursuit: Pursuit,
    steering: Rc<dyn Steering>,
}

impl ChaseSteered {
    pub fn new(
        speed: f32,
        tracker: Box<dyn TargetTracker>,
        steering: Rc<dyn Steering>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            pursuit: Pursuit::new(speed, tracker)?,
            steering,
        })
    }
}

impl Strategy<EnemyMachine> for ChaseSteered {
    fn exit(&mut self, enemy: &mut Enemy) {
        enemy.intents.movement = Vec2::ZERO;
    }

    fn frame_update(&mut self, enemy: &mut Enemy) -> Transition<EnemyStateKind> {
        self.pursuit.decide(enemy)
    }

    fn physics_update(&mut self, enemy: &mut Enemy) -> Transition<EnemyStateKind> {
        let steering = Rc::clone(&self.steering);
        self.pursuit
            .drive(enemy, |from, to| steering.direction(from, to));
        Transition::Stay
    }

    fn reset_values(&mut self) {
        self.pursuit.tracker.forget();
    }
}
