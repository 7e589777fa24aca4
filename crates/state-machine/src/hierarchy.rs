//! Hierarchical (nested) states.
//!
//! A [`SubStateMachine`] is a state that owns a child [`StateMachine`] of the
//! same [`Machine`] family. It lets one parent state (say `Combat`) break its
//! behaviour down into sub-states (`Approach`, `Strike`, `Recover`) without
//! the parent machine knowing about them.

use crate::error::{Result, StateMachineError};
use crate::machine::{Hook, Step};
use crate::{Machine, State, StateMachine, Transition};

/// Composite state wrapping a child machine.
///
/// # Semantics
///
/// - `enter`: the child starts over at its initial state
/// - `exit`: the child's current state is exited first
/// - Update hooks go to the child's current state. A requested key the child
///   owns is resolved inside the child. Any other key is handed to the parent
///   machine as this state's own transition request.
///
/// When parent and child both own a key, the child wins.
pub struct SubStateMachine<M: Machine> {
    child: StateMachine<M>,
    initial: M::Key,
}

impl<M: Machine> SubStateMachine<M> {
    /// Fails if `initial` is not registered in `child`.
    pub fn new(child: StateMachine<M>, initial: M::Key) -> Result<Self> {
        if !child.contains(initial) {
            return Err(StateMachineError::unknown(initial));
        }
        Ok(Self { child, initial })
    }

    pub fn child(&self) -> &StateMachine<M> {
        &self.child
    }

    /// Current state of the child machine, `None` while this state is inactive.
    pub fn active_child(&self) -> Option<M::Key> {
        self.child.current()
    }

    fn forward(&mut self, hook: Hook<M::Trigger>, ctx: &mut M::Context) -> Transition<M::Key> {
        match self.child.step(hook, ctx) {
            Ok(Step::Escalated(next)) => Transition::To(next),
            Ok(Step::Stayed | Step::Changed(_)) => Transition::Stay,
            Err(err) => {
                tracing::warn!(error = %err, "nested state machine rejected hook");
                Transition::Stay
            }
        }
    }
}

impl<M: Machine> State<M> for SubStateMachine<M> {
    fn enter(&mut self, ctx: &mut M::Context) {
        if let Err(err) = self.child.start(self.initial, ctx) {
            tracing::warn!(error = %err, "nested state machine failed to start");
        }
    }

    fn exit(&mut self, ctx: &mut M::Context) {
        self.child.shutdown(ctx);
    }

    fn frame_update(&mut self, ctx: &mut M::Context) -> Transition<M::Key> {
        self.forward(Hook::Frame, ctx)
    }

    fn physics_update(&mut self, ctx: &mut M::Context) -> Transition<M::Key> {
        self.forward(Hook::Physics, ctx)
    }

    fn animation_trigger(
        &mut self,
        trigger: M::Trigger,
        ctx: &mut M::Context,
    ) -> Transition<M::Key> {
        self.forward(Hook::Animation(trigger), ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Patrol,
        Walk,
        Look,
        Alert,
    }

    #[derive(Default)]
    struct Ctx {
        log: Vec<String>,
        next: Option<Key>,
    }

    struct Test;
    impl Machine for Test {
        type Key = Key;
        type Context = Ctx;
        type Trigger = ();
    }

    /// Logs hooks and requests whatever `ctx.next` holds.
    struct Leaf(Key);

    impl State<Test> for Leaf {
        fn enter(&mut self, ctx: &mut Ctx) {
            ctx.log.push(format!("{:?}.enter", self.0));
        }

        fn exit(&mut self, ctx: &mut Ctx) {
            ctx.log.push(format!("{:?}.exit", self.0));
        }

        fn frame_update(&mut self, ctx: &mut Ctx) -> Transition<Key> {
            ctx.next.take().into()
        }
    }

    fn machine() -> StateMachine<Test> {
        let patrol = StateMachine::builder()
            .state(Key::Walk, Leaf(Key::Walk))
            .state(Key::Look, Leaf(Key::Look))
            .build()
            .unwrap();

        StateMachine::builder()
            .state(Key::Patrol, SubStateMachine::new(patrol, Key::Walk).unwrap())
            .state(Key::Alert, Leaf(Key::Alert))
            .build()
            .unwrap()
    }

    #[test]
    fn entering_parent_starts_child_at_initial_state() {
        let mut machine = machine();
        let mut ctx = Ctx::default();

        machine.initialize(Key::Patrol, &mut ctx).unwrap();

        assert_eq!(ctx.log, ["Walk.enter"]);
    }

    #[test]
    fn child_transitions_stay_inside() {
        let mut machine = machine();
        let mut ctx = Ctx::default();
        machine.initialize(Key::Patrol, &mut ctx).unwrap();

        ctx.next = Some(Key::Look);
        assert_eq!(machine.frame_update(&mut ctx), Ok(None));

        assert_eq!(machine.current(), Some(Key::Patrol));
        assert_eq!(ctx.log, ["Walk.enter", "Walk.exit", "Look.enter"]);
        assert_eq!(machine.transition_count(), 0);
    }

    #[test]
    fn foreign_keys_bubble_to_parent() {
        let mut machine = machine();
        let mut ctx = Ctx::default();
        machine.initialize(Key::Patrol, &mut ctx).unwrap();
        ctx.next = Some(Key::Look);
        machine.frame_update(&mut ctx).unwrap();
        ctx.log.clear();

        ctx.next = Some(Key::Alert);
        assert_eq!(machine.frame_update(&mut ctx), Ok(Some(Key::Alert)));

        assert_eq!(ctx.log, ["Look.exit", "Alert.enter"]);
    }

    #[test]
    fn re_entering_parent_restarts_child() {
        let mut machine = machine();
        let mut ctx = Ctx::default();
        machine.initialize(Key::Patrol, &mut ctx).unwrap();
        ctx.next = Some(Key::Look);
        machine.frame_update(&mut ctx).unwrap();
        machine.change_state(Key::Alert, &mut ctx).unwrap();
        ctx.log.clear();

        machine.change_state(Key::Patrol, &mut ctx).unwrap();

        assert_eq!(ctx.log, ["Alert.exit", "Walk.enter"]);
    }

    #[test]
    fn unknown_initial_child_is_rejected() {
        let child = StateMachine::<Test>::builder()
            .state(Key::Walk, Leaf(Key::Walk))
            .build()
            .unwrap();
        assert!(SubStateMachine::new(child, Key::Look).is_err());
    }

    #[test]
    fn keys_unknown_everywhere_surface_as_errors() {
        let mut machine = StateMachine::<Test>::builder()
            .state(Key::Walk, Leaf(Key::Walk))
            .build()
            .unwrap();
        let mut ctx = Ctx::default();
        machine.initialize(Key::Walk, &mut ctx).unwrap();

        ctx.next = Some(Key::Alert);
        let err = machine.frame_update(&mut ctx).unwrap_err();

        assert!(matches!(err, StateMachineError::UnknownState { .. }));
        assert_eq!(machine.current(), Some(Key::Walk));
    }
}
