//! Target acquisition with hysteresis.

use crate::error::ConfigError;
use crate::{Target, Vec2};

use super::Enemy;

/// Aggro rules of one enemy.
///
/// A target is acquired once it comes within `aggro_radius` and kept until it
/// moves beyond `leash_radius`, so an enemy does not flicker between Idle and
/// Chase at the edge of its aggro range.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Perception {
    pub aggro_radius: f32,
    pub leash_radius: f32,
    /// Distance at which the enemy can attack.
    pub strike_distance: f32,
}

impl Perception {
    pub const DEFAULT_AGGRO_RADIUS: f32 = 8.0;
    pub const DEFAULT_LEASH_RADIUS: f32 = 12.0;
    pub const DEFAULT_STRIKE_DISTANCE: f32 = 1.5;

    /// Validated constructor.
    pub fn new(
        aggro_radius: f32,
        leash_radius: f32,
        strike_distance: f32,
    ) -> Result<Self, ConfigError> {
        let perception = Self {
            aggro_radius,
            leash_radius,
            strike_distance,
        };
        perception.validate()?;
        Ok(perception)
    }

    /// Requires `0 < strike_distance <= aggro_radius <= leash_radius`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.strike_distance > 0.0
            && self.strike_distance <= self.aggro_radius
            && self.aggro_radius <= self.leash_radius;
        if ordered {
            Ok(())
        } else {
            Err(ConfigError::InvalidPerception {
                aggro_radius: self.aggro_radius,
                leash_radius: self.leash_radius,
                strike_distance: self.strike_distance,
            })
        }
    }

    /// Refreshes `aggro_target` and `within_strike` from the visible
    /// candidates.
    ///
    /// The current target is kept (with its position refreshed) while it stays
    /// inside the leash radius. Otherwise the closest candidate inside the
    /// aggro radius is picked, if any.
    pub fn update(&self, enemy: &mut Enemy, candidates: &[Target]) {
        let origin = enemy.position;

        let kept = enemy.aggro_target.and_then(|current| {
            candidates
                .iter()
                .find(|c| c.id == current.id)
                .filter(|c| origin.distance(c.position) <= self.leash_radius)
                .copied()
        });

        let target = kept.or_else(|| self.closest_within(origin, candidates, self.aggro_radius));

        match (enemy.aggro_target, target) {
            (None, Some(acquired)) => {
                tracing::debug!(enemy = %enemy.id, target = %acquired.id, "target acquired")
            }
            (Some(lost), None) => {
                tracing::debug!(enemy = %enemy.id, target = %lost.id, "target lost")
            }
            _ => {}
        }

        enemy.within_strike =
            target.is_some_and(|t| origin.distance(t.position) <= self.strike_distance);
        enemy.aggro_target = target;
    }

    fn closest_within(&self, origin: Vec2, candidates: &[Target], radius: f32) -> Option<Target> {
        candidates
            .iter()
            .map(|c| (origin.distance(c.position), c))
            .filter(|(d, _)| *d <= radius)
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, c)| *c)
    }
}

impl Default for Perception {
    fn default() -> Self {
        Self {
            aggro_radius: Self::DEFAULT_AGGRO_RADIUS,
            leash_radius: Self::DEFAULT_LEASH_RADIUS,
            strike_distance: Self::DEFAULT_STRIKE_DISTANCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityId;
    use crate::stats::StatContainer;

    fn enemy() -> Enemy {
        Enemy::new(EntityId(1), Vec2::ZERO, StatContainer::default())
    }

    fn player_at(x: f32) -> [Target; 1] {
        [Target::new(EntityId::PLAYER, Vec2::new(x, 0.0))]
    }

    #[test]
    fn aggro_and_leash_form_a_hysteresis_band() {
        let perception = Perception::new(5.0, 10.0, 1.0).unwrap();
        let mut enemy = enemy();

        perception.update(&mut enemy, &player_at(7.0));
        assert!(enemy.aggro_target.is_none());

        perception.update(&mut enemy, &player_at(4.0));
        assert!(enemy.aggro_target.is_some());

        perception.update(&mut enemy, &player_at(9.0));
        assert_eq!(enemy.aggro_target.map(|t| t.position.x), Some(9.0));

        perception.update(&mut enemy, &player_at(11.0));
        assert!(enemy.aggro_target.is_none());
    }

    #[test]
    fn strike_flag_follows_distance() {
        let perception = Perception::new(5.0, 10.0, 1.5).unwrap();
        let mut enemy = enemy();

        perception.update(&mut enemy, &player_at(3.0));
        assert!(!enemy.within_strike);

        perception.update(&mut enemy, &player_at(1.0));
        assert!(enemy.within_strike);

        perception.update(&mut enemy, &[]);
        assert!(!enemy.within_strike);
        assert!(enemy.aggro_target.is_none());
    }

    #[test]
    fn closest_candidate_wins() {
        let perception = Perception::default();
        let mut enemy = enemy();
        let candidates = [
            Target::new(EntityId(2), Vec2::new(6.0, 0.0)),
            Target::new(EntityId(3), Vec2::new(0.0, 2.0)),
        ];

        perception.update(&mut enemy, &candidates);

        assert_eq!(enemy.aggro_target.map(|t| t.id), Some(EntityId(3)));
    }

    #[test]
    fn inconsistent_radii_are_rejected() {
        assert!(Perception::new(10.0, 5.0, 1.0).is_err());
        assert!(Perception::new(5.0, 10.0, 0.0).is_err());
        assert!(Perception::new(5.0, 10.0, 6.0).is_err());
        assert!(Perception::default().validate().is_ok());
    }
}
