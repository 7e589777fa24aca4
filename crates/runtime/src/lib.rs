//! Fixed-step driver for enemy AI encounters.
//!
//! This crate loads a [`Scenario`], spawns an [`EnemyAgent`](game_core::EnemyAgent)
//! per spawn point and drives them against a scripted player. Consumers embed
//! [`Runtime`] to advance frames and register bindings on its
//! [`BusRegistry`](event_bus::BusRegistry) to watch what happens.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`scenario`] loads and validates encounter files
//! - [`player`] holds the scripted player
pub mod api;
pub mod player;
pub mod runtime;
pub mod scenario;

pub use api::{PlayerDamaged, PlayerMoved, Result, RuntimeError, TickCompleted};
pub use player::Player;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig, TickReport};
pub use scenario::{PlayerSetup, Scenario, Spawn};
