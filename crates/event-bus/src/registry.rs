//! Explicitly owned registry of global buses.

use std::fmt;
use std::rc::Rc;

use crate::binding::EventBinding;
use crate::bus::EventBus;
use crate::event::{DynEvent, Global, GlobalEvent};
use crate::table::BusTable;

/// Owner of every process-wide [`EventBus`].
///
/// The registry is constructed by the host and handed to whichever systems
/// need to publish or subscribe; there is no ambient global state. Its
/// lifecycle is explicit:
///
/// - [`BusRegistry::new`] creates an empty registry,
/// - [`BusRegistry::reset`] clears the bindings of every bus type it has
///   created (each type installs its reset hook once, on creation),
/// - [`BusRegistry::dispose`] clears and drops all buses.
pub struct BusRegistry {
    table: BusTable<Global>,
}

impl BusRegistry {
    pub fn new() -> Self {
        tracing::debug!("bus registry created");
        Self {
            table: BusTable::new(),
        }
    }

    /// Returns the bus for `T`, creating it on first use.
    pub fn bus<T: GlobalEvent>(&self) -> Rc<EventBus<T>> {
        self.table.bus::<T>()
    }

    pub fn register<T: GlobalEvent>(&self, binding: &EventBinding<T>) {
        self.table.register(binding);
    }

    /// Removes `binding`. Unknown bindings and event types are ignored.
    pub fn unregister<T: GlobalEvent>(&self, binding: &EventBinding<T>) {
        self.table.unregister(binding);
    }

    /// Delivers `event` to every global listener of `T`.
    pub fn call<T: GlobalEvent>(&self, event: &T) {
        self.table.call(event);
    }

    /// Delivers a type-erased event to the bus matching its runtime type.
    pub fn call_dyn(&self, event: &dyn DynEvent) {
        self.table.call_dyn(event);
    }

    /// Clears the bindings of every bus type created so far.
    pub fn reset(&self) {
        tracing::debug!(buses = self.table.bus_count(), "resetting bus registry");
        self.table.reset();
    }

    /// Clears and drops every bus.
    pub fn dispose(self) {
        tracing::debug!(buses = self.table.bus_count(), "disposing bus registry");
        self.table.dispose();
    }

    pub fn bus_count(&self) -> usize {
        self.table.bus_count()
    }

    pub fn listener_count<T: GlobalEvent>(&self) -> usize {
        self.table.listener_count::<T>()
    }
}

impl Default for BusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BusRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusRegistry")
            .field("buses", &self.table.bus_count())
            .field("listeners", &self.table.total_listeners())
            .finish()
    }
}
