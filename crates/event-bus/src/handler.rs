//! Per-entity event routing.

use std::fmt;
use std::rc::Rc;

use crate::binding::EventBinding;
use crate::bus::LocalEventBus;
use crate::event::{DynEvent, Local, LocalEvent};
use crate::table::BusTable;

/// Owns one [`LocalEventBus`] per event type registered against it.
///
/// Buses are created lazily by [`register`](Self::register). Dropping the
/// handler discards every bus and binding it owns, so listeners attached to
/// one entity never observe events raised on another.
pub struct LocalEventHandler {
    table: BusTable<Local>,
}

impl LocalEventHandler {
    pub fn new() -> Self {
        Self {
            table: BusTable::new(),
        }
    }

    pub fn register<T: LocalEvent>(&self, binding: &EventBinding<T>) {
        self.table.register(binding);
    }

    /// Removes `binding` from the bus for `T`. Does not create a bus.
    pub fn unregister<T: LocalEvent>(&self, binding: &EventBinding<T>) {
        self.table.unregister(binding);
    }

    /// Delivers `event` to the local listeners of `T`, if any.
    pub fn call<T: LocalEvent>(&self, event: &T) {
        self.table.call(event);
    }

    /// Delivers a type-erased event to the bus matching its runtime type.
    pub fn call_dyn(&self, event: &dyn DynEvent) {
        self.table.call_dyn(event);
    }

    /// Returns the bus for `T`, creating it if needed.
    pub fn bus<T: LocalEvent>(&self) -> Rc<LocalEventBus<T>> {
        self.table.bus::<T>()
    }

    pub fn listener_count<T: LocalEvent>(&self) -> usize {
        self.table.listener_count::<T>()
    }

    pub fn bus_count(&self) -> usize {
        self.table.bus_count()
    }

    /// Discards every bus and binding.
    pub fn clear(&self) {
        self.table.dispose();
    }
}

impl Default for LocalEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LocalEventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalEventHandler")
            .field("buses", &self.table.bus_count())
            .field("listeners", &self.table.total_listeners())
            .finish()
    }
}
