//! Core state trait.
//!
//! [`Machine`] bundles the types a family of states agrees on; [`State`] is
//! the lifecycle every state exposes. All hooks default to no-ops so a state
//! only implements what it cares about.

use std::fmt::Debug;
use std::hash::Hash;

use crate::Transition;

/// Type family shared by a state machine and its states.
pub trait Machine: 'static {
    /// Identifies a state within the machine.
    type Key: Copy + Eq + Hash + Debug + 'static;

    /// Data the states read and write: the owning actor plus whatever the
    /// driver attaches for the current tick.
    type Context;

    /// Payload of animation-event callbacks.
    type Trigger: Copy + Debug;
}

/// A state of a [`StateMachine`](crate::StateMachine).
///
/// `enter` and `exit` cannot request transitions. Update hooks may, by
/// returning [`Transition::To`]; the machine applies the change after the
/// hook returns, so exit/enter pairs never interleave.
pub trait State<M: Machine> {
    fn enter(&mut self, _ctx: &mut M::Context) {}

    fn exit(&mut self, _ctx: &mut M::Context) {}

    /// Runs once per rendered frame while this state is current.
    fn frame_update(&mut self, _ctx: &mut M::Context) -> Transition<M::Key> {
        Transition::Stay
    }

    /// Runs once per fixed simulation step while this state is current.
    fn physics_update(&mut self, _ctx: &mut M::Context) -> Transition<M::Key> {
        Transition::Stay
    }

    /// Runs when an animation event fires while this state is current.
    fn animation_trigger(
        &mut self,
        _trigger: M::Trigger,
        _ctx: &mut M::Context,
    ) -> Transition<M::Key> {
        Transition::Stay
    }
}

/// Blanket implementation for boxed states, so `Box<dyn State<M>>` can be
/// stored and forwarded like any other state.
impl<M: Machine> State<M> for Box<dyn State<M>> {
    #[inline]
    fn enter(&mut self, ctx: &mut M::Context) {
        (**self).enter(ctx)
    }

    #[inline]
    fn exit(&mut self, ctx: &mut M::Context) {
        (**self).exit(ctx)
    }

    #[inline]
    fn frame_update(&mut self, ctx: &mut M::Context) -> Transition<M::Key> {
        (**self).frame_update(ctx)
    }

    #[inline]
    fn physics_update(&mut self, ctx: &mut M::Context) -> Transition<M::Key> {
        (**self).physics_update(ctx)
    }

    #[inline]
    fn animation_trigger(
        &mut self,
        trigger: M::Trigger,
        ctx: &mut M::Context,
    ) -> Transition<M::Key> {
        (**self).animation_trigger(trigger, ctx)
    }
}
