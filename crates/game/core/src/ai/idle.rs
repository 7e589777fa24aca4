//! Idle strategies.
//!
//! Both strategies hand over to Chase as soon as perception has picked an
//! aggro target.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use state_machine::{Strategy, Transition};

use super::{ARRIVAL_RADIUS, Enemy, EnemyMachine, EnemyStateKind};
use crate::Vec2;
use crate::error::ConfigError;
use crate::stats::StatKind;

fn chase_if_aggroed(enemy: &Enemy) -> Transition<EnemyStateKind> {
    if enemy.aggro_target.is_some() {
        Transition::To(EnemyStateKind::Chase)
    } else {
        Transition::Stay
    }
}

/// Stands still.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdleStand;

impl Strategy<EnemyMachine> for IdleStand {
    fn enter(&mut self, enemy: &mut Enemy) {
        enemy.intents.movement = Vec2::ZERO;
    }

    fn frame_update(&mut self, enemy: &mut Enemy) -> Transition<EnemyStateKind> {
        chase_if_aggroed(enemy)
    }
}

/// Walks between random points within `radius` of where it first went idle.
///
/// Waypoints come from a seeded RNG, so two enemies built with the same seed
/// wander the same way.
#[derive(Clone, Debug)]
pub struct IdleWander {
    radius: f32,
    speed: f32,
    rng: StdRng,
    home: Option<Vec2>,
    waypoint: Option<Vec2>,
}

impl IdleWander {
    pub fn new(radius: f32, speed: f32, seed: u64) -> Result<Self, ConfigError> {
        ConfigError::require_positive("wander.radius", radius)?;
        ConfigError::require_positive("wander.speed", speed)?;
        Ok(Self {
            radius,
            speed,
            rng: StdRng::seed_from_u64(seed),
            home: None,
            waypoint: None,
        })
    }

    pub fn waypoint(&self) -> Option<Vec2> {
        self.waypoint
    }

    fn pick_waypoint(&mut self, home: Vec2) -> Vec2 {
        let angle = self.rng.gen_range(0.0..TAU);
        // sqrt keeps the points uniform over the disc
        let reach = self.radius * self.rng.r#gen::<f32>().sqrt();
        home + Vec2::from_angle(angle) * reach
    }
}

impl Strategy<EnemyMachine> for IdleWander {
    fn initialize(&mut self, enemy: &mut Enemy) {
        self.home = Some(enemy.anchor);
        tracing::trace!(enemy = %enemy.id, home = ?enemy.anchor, "wander home fixed");
    }

    fn enter(&mut self, enemy: &mut Enemy) {
        enemy.intents.movement = Vec2::ZERO;
    }

    fn exit(&mut self, enemy: &mut Enemy) {
        enemy.intents.movement = Vec2::ZERO;
    }

    fn frame_update(&mut self, enemy: &mut Enemy) -> Transition<EnemyStateKind> {
        chase_if_aggroed(enemy)
    }

    fn physics_update(&mut self, enemy: &mut Enemy) -> Transition<EnemyStateKind> {
        let home = self.home.unwrap_or(enemy.anchor);
        let waypoint = match self.waypoint {
            Some(point) if enemy.position.distance(point) > ARRIVAL_RADIUS => point,
            _ => {
                let point = self.pick_waypoint(home);
                self.waypoint = Some(point);
                point
            }
        };

        let offset = waypoint - enemy.position;
        let mut speed = self.speed * enemy.stat(StatKind::Speed);
        if enemy.clock.fixed_dt > 0.0 {
            speed = speed.min(offset.length() / enemy.clock.fixed_dt);
        }
        enemy.intents.movement = offset.normalize_or_zero() * speed;
        Transition::Stay
    }

    fn reset_values(&mut self) {
        self.waypoint = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatContainer;
    use crate::{EntityId, Target};

    fn enemy() -> Enemy {
        let mut enemy = Enemy::new(
            EntityId(1),
            Vec2::new(5.0, 5.0),
            StatContainer::default().with(StatKind::Speed, 1.0),
        );
        enemy.clock.fixed_dt = 0.02;
        enemy
    }

    #[test]
    fn stand_requests_chase_only_with_a_target() {
        let mut enemy = enemy();
        let mut idle = IdleStand;

        assert_eq!(idle.frame_update(&mut enemy), Transition::Stay);

        enemy.aggro_target = Some(Target::new(EntityId::PLAYER, Vec2::ZERO));
        assert_eq!(idle.frame_update(&mut enemy), Transition::To(EnemyStateKind::Chase));
    }

    #[test]
    fn wander_stays_within_radius_of_home() {
        let mut enemy = enemy();
        let mut wander = IdleWander::new(2.0, 1.0, 42).unwrap();
        wander.initialize(&mut enemy);

        for _ in 0..50 {
            wander.physics_update(&mut enemy);
            let waypoint = wander.waypoint().unwrap();
            assert!(waypoint.distance(enemy.anchor) <= 2.0 + 1e-4);
            enemy.position = waypoint;
        }
    }

    #[test]
    fn wander_is_deterministic_per_seed() {
        let mut a = IdleWander::new(3.0, 1.0, 7).unwrap();
        let mut b = IdleWander::new(3.0, 1.0, 7).unwrap();
        let (mut ea, mut eb) = (enemy(), enemy());

        a.physics_update(&mut ea);
        b.physics_update(&mut eb);

        assert_eq!(a.waypoint(), b.waypoint());
        assert_eq!(ea.intents.movement, eb.intents.movement);
    }

    #[test]
    fn wander_speed_scales_with_speed_stat() {
        let mut enemy = enemy();
        enemy.apply_modifier(crate::stats::StatModifier::multiply(StatKind::Speed, 0.5));
        enemy.clock.fixed_dt = 0.0;
        let mut wander = IdleWander::new(10.0, 2.0, 1).unwrap();

        wander.physics_update(&mut enemy);

        assert!((enemy.intents.movement.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn invalid_parameters_fail_fast() {
        assert!(IdleWander::new(0.0, 1.0, 0).is_err());
        assert!(IdleWander::new(1.0, -1.0, 0).is_err());
    }
}
