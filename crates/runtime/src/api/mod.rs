//! Types downstream clients interact with.
mod errors;
mod events;

pub use errors::{Result, RuntimeError};
pub use events::{PlayerDamaged, PlayerMoved, TickCompleted};
