//! Stat pipeline.
//!
//! ```text
//! [ base StatContainer ] --apply modifiers in order--> [ accumulated StatContainer ]
//!                                 ^
//!                         [ CacheMediator ]  (rebuilt only when dirty)
//! ```
//!
//! [`StatMediator`] ties the pieces together for one actor.

pub mod cache;
pub mod container;
pub mod kind;
pub mod mediator;
pub mod modifier;

pub use cache::{Accumulator, CacheMediator};
pub use container::StatContainer;
pub use kind::StatKind;
pub use mediator::StatMediator;
pub use modifier::{ModifierOp, StatModifier};
