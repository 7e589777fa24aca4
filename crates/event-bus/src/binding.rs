//! Subscriber registration records.

use std::fmt;
use std::rc::Rc;

/// Opaque identity of an [`EventBinding`].
///
/// Two bindings share an id exactly when one is a clone of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(usize);

struct Callbacks<T> {
    on_event: Option<Box<dyn Fn(&T)>>,
    on_event_no_args: Option<Box<dyn Fn()>>,
}

/// A callback pair registered against one event type.
///
/// The "with payload" callback receives the event, the "no payload" callback
/// only learns that the event happened. Constructors guarantee that at least
/// one of them is set.
///
/// Bindings are compared by identity: cloning a binding yields a handle to the
/// same registration, so registering the clone is a no-op and unregistering
/// the clone removes the original. Nothing unregisters a binding when its
/// owner goes away; owners must call `unregister` themselves.
pub struct EventBinding<T> {
    inner: Rc<Callbacks<T>>,
}

impl<T> EventBinding<T> {
    /// Binding invoked with the event payload.
    pub fn new(on_event: impl Fn(&T) + 'static) -> Self {
        Self::from_callbacks(Some(Box::new(on_event)), None)
    }

    /// Binding invoked without the payload.
    pub fn no_args(on_event_no_args: impl Fn() + 'static) -> Self {
        Self::from_callbacks(None, Some(Box::new(on_event_no_args)))
    }

    /// Binding carrying both callback forms. The payload form runs first.
    pub fn with_both(
        on_event: impl Fn(&T) + 'static,
        on_event_no_args: impl Fn() + 'static,
    ) -> Self {
        Self::from_callbacks(Some(Box::new(on_event)), Some(Box::new(on_event_no_args)))
    }

    fn from_callbacks(
        on_event: Option<Box<dyn Fn(&T)>>,
        on_event_no_args: Option<Box<dyn Fn()>>,
    ) -> Self {
        Self {
            inner: Rc::new(Callbacks {
                on_event,
                on_event_no_args,
            }),
        }
    }

    pub fn id(&self) -> BindingId {
        BindingId(Rc::as_ptr(&self.inner) as *const () as usize)
    }

    pub fn has_payload_callback(&self) -> bool {
        self.inner.on_event.is_some()
    }

    pub fn has_no_args_callback(&self) -> bool {
        self.inner.on_event_no_args.is_some()
    }

    pub(crate) fn invoke(&self, event: &T) {
        if let Some(on_event) = &self.inner.on_event {
            on_event(event);
        }
        if let Some(on_event_no_args) = &self.inner.on_event_no_args {
            on_event_no_args();
        }
    }
}

impl<T> Clone for EventBinding<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for EventBinding<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Eq for EventBinding<T> {}

impl<T> fmt::Debug for EventBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBinding")
            .field("id", &self.id())
            .field("payload", &self.has_payload_callback())
            .field("no_args", &self.has_no_args_callback())
            .finish()
    }
}
