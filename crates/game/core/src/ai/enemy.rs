//! The per-enemy context every AI state reads and writes.

use event_bus::LocalEventHandler;

use crate::events::{Damaged, Died, StatsChanged};
use crate::stats::{StatContainer, StatKind, StatMediator, StatModifier};
use crate::{EntityId, Target, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackKind {
    Melee,
    Ranged,
}

/// A request to hit whatever stands at `target`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackIntent {
    pub kind: AttackKind,
    pub target: Vec2,
    pub damage: f32,
}

/// What the enemy wants to do this tick. The host reads and applies these.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Intents {
    /// Desired velocity in units per second.
    pub movement: Vec2,
    pub attack: Option<AttackIntent>,
}

impl Intents {
    pub fn take_attack(&mut self) -> Option<AttackIntent> {
        self.attack.take()
    }
}

/// Timing of the tick currently being processed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Length of one physics step.
    pub fixed_dt: f32,
    /// Seconds of frame time accumulated since spawn.
    pub elapsed: f32,
}

/// An enemy actor.
///
/// Positional and perception fields are public: perception writes the aggro
/// fields, strategies write intents, the host integrates movement. Health and
/// stats are private so that every change raises the matching local event.
#[derive(Debug)]
pub struct Enemy {
    pub id: EntityId,
    pub position: Vec2,
    /// Where the enemy spawned. Wandering stays around it.
    pub anchor: Vec2,
    pub aggro_target: Option<Target>,
    pub within_strike: bool,
    pub intents: Intents,
    pub clock: FrameClock,
    stats: StatMediator,
    health: f32,
    alive: bool,
    events: LocalEventHandler,
}

impl Enemy {
    /// Spawns at `position` with full health.
    pub fn new(id: EntityId, position: Vec2, base: StatContainer) -> Self {
        Self {
            id,
            position,
            anchor: position,
            aggro_target: None,
            within_strike: false,
            intents: Intents::default(),
            clock: FrameClock::default(),
            stats: StatMediator::new(base),
            health: base.health,
            alive: true,
            events: LocalEventHandler::new(),
        }
    }

    /// Local bus of this enemy.
    pub fn events(&self) -> &LocalEventHandler {
        &self.events
    }

    pub fn stats(&self) -> &StatMediator {
        &self.stats
    }

    /// Accumulated value of one stat.
    pub fn stat(&mut self, kind: StatKind) -> f32 {
        self.stats.value(kind)
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&mut self) -> f32 {
        self.stats.value(StatKind::Health)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Distance to the aggro target, if any.
    pub fn distance_to_target(&self) -> Option<f32> {
        self.aggro_target
            .map(|target| self.position.distance(target.position))
    }

    pub fn apply_modifier(&mut self, modifier: StatModifier) {
        self.stats.add_modifier(modifier);
        self.stats_changed();
    }

    pub fn remove_modifier(&mut self, modifier: &StatModifier) -> bool {
        let removed = self.stats.remove_modifier(modifier);
        if removed {
            self.stats_changed();
        }
        removed
    }

    pub fn clear_modifiers(&mut self) {
        self.stats.clear_modifiers();
        self.stats_changed();
    }

    /// Applies `amount` minus defense and returns what got through.
    ///
    /// Raises [`Damaged`] for any positive damage and [`Died`] once health
    /// reaches zero. Dead enemies ignore further damage.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if !self.alive {
            return 0.0;
        }

        let defense = self.stats.value(StatKind::Defense);
        let dealt = (amount - defense).max(0.0).min(self.health);
        if dealt <= 0.0 {
            tracing::trace!(id = %self.id, amount, defense, "damage fully absorbed");
            return 0.0;
        }

        self.health -= dealt;
        self.events.call(&Damaged {
            amount: dealt,
            remaining: self.health,
        });

        if self.health <= 0.0 {
            self.die();
        }
        dealt
    }

    /// Clamps health to the new maximum; a maximum of zero kills.
    fn stats_changed(&mut self) {
        let stats = *self.stats.get();
        self.health = self.health.min(stats.health);
        self.events.call(&StatsChanged { stats });
        if self.alive && self.health <= 0.0 {
            self.die();
        }
    }

    fn die(&mut self) {
        self.health = 0.0;
        self.alive = false;
        self.intents = Intents::default();
        tracing::debug!(id = %self.id, "enemy died");
        self.events.call(&Died { id: self.id });
    }
}
