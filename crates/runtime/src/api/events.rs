//! Events the runtime itself publishes on the global bus.
//!
//! Enemy-level events ([`EnemySpawned`](game_core::events::EnemySpawned),
//! [`EnemyStateChanged`](game_core::events::EnemyStateChanged), ...) come
//! from `game-core`; these cover what only the driver knows about.

use event_bus::{Event, GlobalEvent};
use game_core::{EntityId, Vec2};

/// One call to [`Runtime::tick`](crate::Runtime::tick) finished.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickCompleted {
    pub frame: u64,
    pub elapsed: f32,
    pub physics_steps: u32,
}

/// An enemy attack reached the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerDamaged {
    pub attacker: EntityId,
    pub amount: f32,
    pub remaining: f32,
}

/// The host moved the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerMoved {
    pub position: Vec2,
}

impl Event for TickCompleted {}
impl GlobalEvent for TickCompleted {}
impl Event for PlayerDamaged {}
impl GlobalEvent for PlayerDamaged {}
impl Event for PlayerMoved {}
impl GlobalEvent for PlayerMoved {}
