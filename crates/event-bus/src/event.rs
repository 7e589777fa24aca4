//! Event marker traits.
//!
//! An event is identified by its concrete Rust type. Whether it travels on a
//! process-wide bus or on a per-entity bus is decided at compile time by
//! implementing [`GlobalEvent`], [`LocalEvent`], or both.

use std::any::{Any, TypeId};

/// Pure-data payload that can be published on a bus.
pub trait Event: 'static {}

/// Event broadcast through the [`BusRegistry`](crate::BusRegistry).
pub trait GlobalEvent: Event {}

/// Event scoped to a single [`LocalEventHandler`](crate::LocalEventHandler).
pub trait LocalEvent: Event {}

/// Bus scope marker.
pub trait Scope: 'static {
    /// Label used in log output.
    const NAME: &'static str;
}

/// Scope of buses owned by a [`BusRegistry`](crate::BusRegistry).
#[derive(Debug)]
pub enum Global {}

/// Scope of buses owned by a [`LocalEventHandler`](crate::LocalEventHandler).
#[derive(Debug)]
pub enum Local {}

impl Scope for Global {
    const NAME: &'static str = "global";
}

impl Scope for Local {
    const NAME: &'static str = "local";
}

/// Ties an event type to the scope it may be published in.
///
/// Implemented automatically: every [`GlobalEvent`] is `InScope<Global>` and
/// every [`LocalEvent`] is `InScope<Local>`.
pub trait InScope<S: Scope>: Event {}

impl<T: GlobalEvent> InScope<Global> for T {}
impl<T: LocalEvent> InScope<Local> for T {}

/// Object-safe view of an event, used to dispatch on the runtime type.
pub trait DynEvent {
    fn event_type(&self) -> TypeId;
    fn event_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Event> DynEvent for T {
    fn event_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn event_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
