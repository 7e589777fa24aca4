//! `TypeId`-keyed table of buses shared by the global registry and the
//! per-entity handler.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::binding::EventBinding;
use crate::bus::Bus;
use crate::event::{DynEvent, InScope, Scope};

/// Type-erased operations every bus exposes to its owning table.
///
/// Each bus type installs these once, when the table first creates it; this
/// doubles as the reset hook registry.
trait ErasedBus {
    fn call_erased(&self, event: &dyn Any);
    fn clear(&self);
    fn len(&self) -> usize;
}

impl<T: InScope<S>, S: Scope> ErasedBus for Bus<T, S> {
    fn call_erased(&self, event: &dyn Any) {
        match event.downcast_ref::<T>() {
            Some(event) => self.call(event),
            None => tracing::warn!(
                scope = S::NAME,
                expected = std::any::type_name::<T>(),
                "event payload does not match bus type"
            ),
        }
    }

    fn clear(&self) {
        Bus::clear(self);
    }

    fn len(&self) -> usize {
        Bus::len(self)
    }
}

struct Entry {
    typed: Rc<dyn Any>,
    erased: Rc<dyn ErasedBus>,
    name: &'static str,
}

pub(crate) struct BusTable<S> {
    entries: RefCell<HashMap<TypeId, Entry>>,
    _scope: std::marker::PhantomData<S>,
}

impl<S: Scope> BusTable<S> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            _scope: std::marker::PhantomData,
        }
    }

    /// Returns the bus for `T`, creating it on first use.
    pub(crate) fn bus<T: InScope<S>>(&self) -> Rc<Bus<T, S>> {
        if let Some(bus) = self.get::<T>() {
            return bus;
        }

        let bus = Rc::new(Bus::<T, S>::new());
        let entry = Entry {
            typed: bus.clone(),
            erased: bus.clone(),
            name: std::any::type_name::<T>(),
        };
        self.entries.borrow_mut().insert(TypeId::of::<T>(), entry);
        tracing::trace!(scope = S::NAME, event = entry_name::<T>(), "bus created");
        bus
    }

    /// Returns the bus for `T` only if it already exists.
    pub(crate) fn get<T: InScope<S>>(&self) -> Option<Rc<Bus<T, S>>> {
        let typed = self
            .entries
            .borrow()
            .get(&TypeId::of::<T>())
            .map(|entry| Rc::clone(&entry.typed))?;
        typed.downcast::<Bus<T, S>>().ok()
    }

    pub(crate) fn register<T: InScope<S>>(&self, binding: &EventBinding<T>) {
        self.bus::<T>().register(binding);
    }

    pub(crate) fn unregister<T: InScope<S>>(&self, binding: &EventBinding<T>) {
        if let Some(bus) = self.get::<T>() {
            bus.unregister(binding);
        }
    }

    pub(crate) fn call<T: InScope<S>>(&self, event: &T) {
        // The map borrow must end before delivery so subscribers can create
        // buses for other event types.
        match self.get::<T>() {
            Some(bus) => bus.call(event),
            None => tracing::trace!(
                scope = S::NAME,
                event = entry_name::<T>(),
                "no bus for event type"
            ),
        }
    }

    pub(crate) fn call_dyn(&self, event: &dyn DynEvent) {
        let erased = self
            .entries
            .borrow()
            .get(&event.event_type())
            .map(|entry| Rc::clone(&entry.erased));
        match erased {
            Some(bus) => bus.call_erased(event.as_any()),
            None => tracing::trace!(
                scope = S::NAME,
                event = event.event_name(),
                "no bus for event type"
            ),
        }
    }

    /// Clears the bindings of every bus while keeping the buses alive, so
    /// outstanding `Rc<Bus>` handles stay connected to this table.
    pub(crate) fn reset(&self) {
        let buses: Vec<(&'static str, Rc<dyn ErasedBus>)> = self
            .entries
            .borrow()
            .values()
            .map(|entry| (entry.name, Rc::clone(&entry.erased)))
            .collect();
        for (name, bus) in buses {
            tracing::trace!(scope = S::NAME, event = name, bindings = bus.len(), "bus reset");
            bus.clear();
        }
    }

    /// Clears every bus and forgets them.
    pub(crate) fn dispose(&self) {
        self.reset();
        self.entries.borrow_mut().clear();
    }

    pub(crate) fn bus_count(&self) -> usize {
        self.entries.borrow().len()
    }

    pub(crate) fn listener_count<T: InScope<S>>(&self) -> usize {
        self.get::<T>().map_or(0, |bus| bus.len())
    }

    pub(crate) fn total_listeners(&self) -> usize {
        self.entries
            .borrow()
            .values()
            .map(|entry| entry.erased.len())
            .sum()
    }
}

fn entry_name<T>() -> &'static str {
    std::any::type_name::<T>()
}
