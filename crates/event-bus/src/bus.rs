//! Binding set for a single event type.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;

use crate::binding::EventBinding;
use crate::event::{Global, InScope, Local, Scope};

/// Process-wide bus for one event type.
pub type EventBus<T> = Bus<T, Global>;

/// Per-entity bus for one event type.
pub type LocalEventBus<T> = Bus<T, Local>;

enum Pending<T> {
    Register(EventBinding<T>),
    Unregister(EventBinding<T>),
    Clear,
}

/// The set of bindings registered for event type `T` in scope `S`.
///
/// # Delivery
///
/// [`Bus::call`] runs every binding synchronously in registration order.
/// Subscribers should not depend on that order for correctness.
///
/// # Mutation during dispatch
///
/// Registering, unregistering, or clearing while a `call` on the same bus is
/// running is buffered. The buffered operations are applied, in the order they
/// were requested, once the outermost `call` returns (or unwinds). A binding
/// registered from inside a callback therefore does not see the event that is
/// currently being delivered.
///
/// # Panics
///
/// A panicking subscriber aborts delivery to the remaining bindings of that
/// `call`; the panic propagates to the caller.
pub struct Bus<T, S> {
    bindings: RefCell<Vec<EventBinding<T>>>,
    pending: RefCell<Vec<Pending<T>>>,
    depth: Cell<usize>,
    _scope: PhantomData<S>,
}

impl<T: InScope<S>, S: Scope> Bus<T, S> {
    pub fn new() -> Self {
        Self {
            bindings: RefCell::new(Vec::new()),
            pending: RefCell::new(Vec::new()),
            depth: Cell::new(0),
            _scope: PhantomData,
        }
    }

    /// Adds `binding`. Registering an already present binding is a no-op.
    pub fn register(&self, binding: &EventBinding<T>) {
        if self.is_dispatching() {
            self.pending
                .borrow_mut()
                .push(Pending::Register(binding.clone()));
            return;
        }
        self.insert(binding.clone());
    }

    /// Removes `binding`. Unknown bindings are ignored.
    pub fn unregister(&self, binding: &EventBinding<T>) {
        if self.is_dispatching() {
            self.pending
                .borrow_mut()
                .push(Pending::Unregister(binding.clone()));
            return;
        }
        self.remove(binding);
    }

    /// Drops every binding.
    pub fn clear(&self) {
        if self.is_dispatching() {
            self.pending.borrow_mut().push(Pending::Clear);
            return;
        }
        self.bindings.borrow_mut().clear();
    }

    /// Delivers `event` to every registered binding.
    pub fn call(&self, event: &T) {
        let _guard = DispatchGuard::enter(self);
        let bindings = self.bindings.borrow();
        if bindings.is_empty() {
            tracing::trace!(
                scope = S::NAME,
                event = std::any::type_name::<T>(),
                "no listeners"
            );
        }
        for binding in bindings.iter() {
            binding.invoke(event);
        }
    }

    pub fn contains(&self, binding: &EventBinding<T>) -> bool {
        self.bindings.borrow().iter().any(|b| b == binding)
    }

    pub fn len(&self) -> usize {
        self.bindings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` while a `call` is delivering on this bus.
    pub fn is_dispatching(&self) -> bool {
        self.depth.get() > 0
    }

    fn insert(&self, binding: EventBinding<T>) {
        let mut bindings = self.bindings.borrow_mut();
        if !bindings.iter().any(|b| *b == binding) {
            bindings.push(binding);
        }
    }

    fn remove(&self, binding: &EventBinding<T>) {
        self.bindings.borrow_mut().retain(|b| b != binding);
    }

    fn apply_pending(&self) {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        for op in pending {
            match op {
                Pending::Register(binding) => self.insert(binding),
                Pending::Unregister(binding) => self.remove(&binding),
                Pending::Clear => self.bindings.borrow_mut().clear(),
            }
        }
    }
}

impl<T: InScope<S>, S: Scope> Default for Bus<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S: Scope> fmt::Debug for Bus<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("scope", &S::NAME)
            .field("event", &std::any::type_name::<T>())
            .field("bindings", &self.bindings.borrow().len())
            .field("depth", &self.depth.get())
            .finish()
    }
}

/// Tracks dispatch depth; flushes buffered mutations when the outermost
/// dispatch ends, including during unwinding.
struct DispatchGuard<'a, T: InScope<S>, S: Scope> {
    bus: &'a Bus<T, S>,
}

impl<'a, T: InScope<S>, S: Scope> DispatchGuard<'a, T, S> {
    fn enter(bus: &'a Bus<T, S>) -> Self {
        bus.depth.set(bus.depth.get() + 1);
        Self { bus }
    }
}

impl<T: InScope<S>, S: Scope> Drop for DispatchGuard<'_, T, S> {
    fn drop(&mut self) {
        let depth = self.bus.depth.get() - 1;
        self.bus.depth.set(depth);
        if depth == 0 {
            self.bus.apply_pending();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, GlobalEvent};
    use std::cell::Cell;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::rc::Rc;

    #[derive(Debug)]
    struct Ping(u32);
    impl Event for Ping {}
    impl GlobalEvent for Ping {}

    fn counter() -> (Rc<Cell<u32>>, EventBinding<Ping>) {
        let hits = Rc::new(Cell::new(0));
        let binding = {
            let hits = Rc::clone(&hits);
            EventBinding::no_args(move || hits.set(hits.get() + 1))
        };
        (hits, binding)
    }

    #[test]
    fn every_registered_binding_is_called_once() {
        let bus = EventBus::<Ping>::new();
        let (a_hits, a) = counter();
        let (b_hits, b) = counter();
        bus.register(&a);
        bus.register(&b);

        bus.call(&Ping(1));

        assert_eq!(a_hits.get(), 1);
        assert_eq!(b_hits.get(), 1);
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let bus = EventBus::<Ping>::new();
        let (hits, binding) = counter();
        bus.register(&binding);
        bus.register(&binding);
        bus.register(&binding.clone());

        bus.call(&Ping(1));

        assert_eq!(bus.len(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn unregistered_binding_is_not_called() {
        let bus = EventBus::<Ping>::new();
        let (hits, binding) = counter();
        bus.register(&binding);
        bus.unregister(&binding);

        bus.call(&Ping(1));

        assert_eq!(hits.get(), 0);
        assert!(bus.is_empty());
    }

    #[test]
    fn unregistering_unknown_binding_is_a_no_op() {
        let bus = EventBus::<Ping>::new();
        let (_, known) = counter();
        let (_, unknown) = counter();
        bus.register(&known);

        bus.unregister(&unknown);

        assert!(bus.contains(&known));
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn payload_reaches_subscriber() {
        let bus = EventBus::<Ping>::new();
        let last = Rc::new(Cell::new(0));
        let binding = {
            let last = Rc::clone(&last);
            EventBinding::new(move |ping: &Ping| last.set(ping.0))
        };
        bus.register(&binding);

        bus.call(&Ping(42));

        assert_eq!(last.get(), 42);
    }

    #[test]
    fn registration_during_call_is_deferred() {
        let bus = Rc::new(EventBus::<Ping>::new());
        let (late_hits, late) = counter();

        let installer = {
            let bus = Rc::clone(&bus);
            let late = late.clone();
            EventBinding::no_args(move || bus.register(&late))
        };
        bus.register(&installer);

        bus.call(&Ping(1));
        assert_eq!(late_hits.get(), 0);
        assert!(bus.contains(&late));

        bus.call(&Ping(2));
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn unregistration_during_call_applies_after_dispatch() {
        let bus = Rc::new(EventBus::<Ping>::new());
        let (hits, target) = counter();

        let remover = {
            let bus = Rc::clone(&bus);
            let target = target.clone();
            EventBinding::no_args(move || bus.unregister(&target))
        };
        bus.register(&remover);
        bus.register(&target);

        bus.call(&Ping(1));
        assert_eq!(hits.get(), 1);
        assert!(!bus.contains(&target));

        bus.call(&Ping(2));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn nested_call_on_same_bus_is_allowed() {
        let bus = Rc::new(EventBus::<Ping>::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let binding = {
            let bus = Rc::clone(&bus);
            let seen = Rc::clone(&seen);
            EventBinding::new(move |ping: &Ping| {
                seen.borrow_mut().push(ping.0);
                if ping.0 > 0 {
                    bus.call(&Ping(ping.0 - 1));
                }
            })
        };
        bus.register(&binding);

        bus.call(&Ping(2));

        assert_eq!(*seen.borrow(), vec![2, 1, 0]);
        assert!(!bus.is_dispatching());
    }

    #[test]
    fn panicking_subscriber_aborts_remaining_deliveries() {
        let bus = EventBus::<Ping>::new();
        let (hits, after) = counter();
        let bomb = EventBinding::no_args(|| panic!("subscriber failure"));
        bus.register(&bomb);
        bus.register(&after);

        let result = catch_unwind(AssertUnwindSafe(|| bus.call(&Ping(1))));

        assert!(result.is_err());
        assert_eq!(hits.get(), 0);
        assert!(!bus.is_dispatching());

        bus.unregister(&bomb);
        bus.call(&Ping(2));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn clear_removes_all_bindings() {
        let bus = EventBus::<Ping>::new();
        let (hits, binding) = counter();
        bus.register(&binding);

        bus.clear();
        bus.call(&Ping(1));

        assert_eq!(hits.get(), 0);
        assert!(bus.is_empty());
    }
}
