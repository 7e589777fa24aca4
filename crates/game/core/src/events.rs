//! Gameplay events.
//!
//! Local events are raised on one enemy's
//! [`LocalEventHandler`](event_bus::LocalEventHandler) and only reach
//! listeners attached to that enemy (animation, VFX, health bars). Global
//! events go through the shared [`BusRegistry`](event_bus::BusRegistry).

use event_bus::{Event, GlobalEvent, LocalEvent};

use crate::ai::{AttackIntent, EnemyStateKind};
use crate::stats::StatContainer;
use crate::{EntityId, Vec2};

// ===== local =====

/// The owning enemy's state machine switched states.
///
/// `from` is `None` for the initial state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateChanged {
    pub from: Option<EnemyStateKind>,
    pub to: EnemyStateKind,
}

/// Damage got through defense.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Damaged {
    pub amount: f32,
    pub remaining: f32,
}

/// Health reached zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Died {
    pub id: EntityId,
}

/// A footstep animation event fired.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footstep {
    pub position: Vec2,
}

/// The modifier set changed. Carries the freshly accumulated stats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatsChanged {
    pub stats: StatContainer,
}

/// The hit frame of an attack animation played.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackLanded {
    pub damage: f32,
}

impl Event for StateChanged {}
impl LocalEvent for StateChanged {}
impl Event for Damaged {}
impl LocalEvent for Damaged {}
impl Event for Died {}
impl LocalEvent for Died {}
impl Event for Footstep {}
impl LocalEvent for Footstep {}
impl Event for StatsChanged {}
impl LocalEvent for StatsChanged {}
impl Event for AttackLanded {}
impl LocalEvent for AttackLanded {}

// ===== global =====

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySpawned {
    pub id: EntityId,
    pub position: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStateChanged {
    pub id: EntityId,
    pub from: Option<EnemyStateKind>,
    pub to: EnemyStateKind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyDied {
    pub id: EntityId,
}

/// An enemy committed to an attack this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackLaunched {
    pub attacker: EntityId,
    pub intent: AttackIntent,
}

impl Event for EnemySpawned {}
impl GlobalEvent for EnemySpawned {}
impl Event for EnemyStateChanged {}
impl GlobalEvent for EnemyStateChanged {}
impl Event for EnemyDied {}
impl GlobalEvent for EnemyDied {}
impl Event for AttackLaunched {}
impl GlobalEvent for AttackLaunched {}
