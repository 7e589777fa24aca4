//! Transition requests returned by state hooks.

/// What a state wants the machine to do after one of its update hooks.
///
/// States never switch the machine themselves. They return a request and the
/// owning [`StateMachine`](crate::StateMachine) performs the exit/enter pair
/// once the hook has returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transition<K> {
    /// Remain in the current state.
    #[default]
    Stay,

    /// Exit the current state and enter `K`.
    ///
    /// Requesting the current state is allowed and re-runs both hooks.
    To(K),
}

impl<K> Transition<K> {
    #[inline]
    pub fn is_stay(&self) -> bool {
        matches!(self, Transition::Stay)
    }

    /// Returns the requested target, if any.
    #[inline]
    pub fn target(self) -> Option<K> {
        match self {
            Transition::Stay => None,
            Transition::To(key) => Some(key),
        }
    }

    /// Keeps `self` if it requests a change, otherwise falls back to `other`.
    #[inline]
    pub fn or(self, other: Transition<K>) -> Transition<K> {
        match self {
            Transition::Stay => other,
            request => request,
        }
    }
}

impl<K> From<Option<K>> for Transition<K> {
    fn from(target: Option<K>) -> Self {
        match target {
            Some(key) => Transition::To(key),
            None => Transition::Stay,
        }
    }
}
