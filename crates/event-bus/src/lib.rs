//! Type-keyed publish/subscribe for single-threaded game loops.
//!
//! Every event type gets its own bus holding the bindings registered for it.
//! Buses come in two scopes:
//!
//! - **Global**: owned by a [`BusRegistry`] the host constructs and passes to
//!   the systems that need it.
//! - **Local**: owned by a [`LocalEventHandler`] embedded in one entity, so
//!   listeners only hear events raised on that entity.
//!
//! Scope is a compile-time property of the payload type ([`GlobalEvent`],
//! [`LocalEvent`]). Dispatch is synchronous; there is no queueing, no
//! threading, and no reflection. All types use `Rc`/`RefCell` internally and
//! are therefore `!Send`.
//!
//! # Architecture
//!
//! - [`Event`], [`GlobalEvent`], [`LocalEvent`]: payload markers
//! - [`EventBinding`]: callback pair, compared by identity
//! - [`Bus`] ([`EventBus`] / [`LocalEventBus`]): binding set for one type
//! - [`LocalEventHandler`], [`BusRegistry`]: `TypeId`-keyed owners of buses

pub mod binding;
pub mod bus;
pub mod event;
pub mod handler;
pub mod registry;

mod table;

pub use binding::{BindingId, EventBinding};
pub use bus::{Bus, EventBus, LocalEventBus};
pub use event::{DynEvent, Event, Global, GlobalEvent, InScope, Local, LocalEvent, Scope};
pub use handler::LocalEventHandler;
pub use registry::BusRegistry;
