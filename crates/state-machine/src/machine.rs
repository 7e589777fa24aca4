//! The state container.

use std::collections::HashMap;
use std::fmt;

use crate::builder::StateMachineBuilder;
use crate::error::{Result, StateMachineError};
use crate::{Machine, State, Transition};

#[derive(Clone, Copy, Debug)]
pub(crate) enum Hook<T> {
    Frame,
    Physics,
    Animation(T),
}

/// Result of running one hook on the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step<K> {
    Stayed,
    Changed(K),
    /// The state requested a key this machine does not own.
    Escalated(K),
}

/// Finite state machine holding at most one current state.
///
/// # Lifecycle
///
/// ```text
/// uninitialized --initialize(k)--> k --change_state(j)--> j --shutdown--> uninitialized
/// ```
///
/// [`initialize`](Self::initialize) must be called exactly once before the
/// machine is driven. [`change_state`](Self::change_state) always runs `exit`
/// on the outgoing state before `enter` on the incoming one, including when
/// both are the same state.
///
/// # Driving
///
/// The host calls [`frame_update`](Self::frame_update) once per rendered
/// frame, [`physics_update`](Self::physics_update) once per fixed step, and
/// [`animation_trigger`](Self::animation_trigger) whenever an animation
/// event fires. Only the current state sees these calls. A transition
/// requested by the hook is applied before the call returns.
///
/// Hooks receive the context but never the machine, so a state cannot start
/// a transition while another one is in progress.
pub struct StateMachine<M: Machine> {
    states: HashMap<M::Key, Box<dyn State<M>>>,
    current: Option<M::Key>,
    transitions: u64,
}

impl<M: Machine> StateMachine<M> {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            current: None,
            transitions: 0,
        }
    }

    pub fn builder() -> StateMachineBuilder<M> {
        StateMachineBuilder::new()
    }

    /// Registers `state` under `key`.
    pub fn add_state(&mut self, key: M::Key, state: Box<dyn State<M>>) -> Result<()> {
        if self.states.contains_key(&key) {
            return Err(StateMachineError::duplicate(key));
        }
        self.states.insert(key, state);
        Ok(())
    }

    pub fn contains(&self, key: M::Key) -> bool {
        self.states.contains_key(&key)
    }

    pub fn current(&self) -> Option<M::Key> {
        self.current
    }

    pub fn is_initialized(&self) -> bool {
        self.current.is_some()
    }

    /// Number of completed `change_state` calls, including re-entries.
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Sets the initial state and runs its `enter` hook.
    pub fn initialize(&mut self, initial: M::Key, ctx: &mut M::Context) -> Result<()> {
        if let Some(current) = self.current {
            return Err(StateMachineError::AlreadyInitialized {
                current: format!("{current:?}"),
            });
        }
        self.start(initial, ctx)
    }

    /// Exits the current state and enters `next`.
    pub fn change_state(&mut self, next: M::Key, ctx: &mut M::Context) -> Result<()> {
        let current = self.current.ok_or(StateMachineError::NotInitialized)?;
        if !self.states.contains_key(&next) {
            return Err(StateMachineError::unknown(next));
        }
        self.switch(current, next, ctx)
    }

    /// Forwards a frame tick to the current state.
    ///
    /// Returns the new state if the tick caused a transition.
    pub fn frame_update(&mut self, ctx: &mut M::Context) -> Result<Option<M::Key>> {
        let step = self.step(Hook::Frame, ctx)?;
        Self::resolve(step)
    }

    /// Forwards a fixed-step tick to the current state.
    pub fn physics_update(&mut self, ctx: &mut M::Context) -> Result<Option<M::Key>> {
        let step = self.step(Hook::Physics, ctx)?;
        Self::resolve(step)
    }

    /// Forwards an animation event to whichever state is current.
    pub fn animation_trigger(
        &mut self,
        trigger: M::Trigger,
        ctx: &mut M::Context,
    ) -> Result<Option<M::Key>> {
        let step = self.step(Hook::Animation(trigger), ctx)?;
        Self::resolve(step)
    }

    /// Exits the current state, if any, and returns to uninitialized.
    pub fn shutdown(&mut self, ctx: &mut M::Context) {
        if let Some(current) = self.current.take() {
            if let Some(state) = self.states.get_mut(&current) {
                state.exit(ctx);
            }
            tracing::debug!(state = ?current, "state machine shut down");
        }
    }

    /// Enters `initial` without checking whether the machine already ran.
    pub(crate) fn start(&mut self, initial: M::Key, ctx: &mut M::Context) -> Result<()> {
        let state = self
            .states
            .get_mut(&initial)
            .ok_or_else(|| StateMachineError::unknown(initial))?;
        self.current = Some(initial);
        state.enter(ctx);
        tracing::debug!(state = ?initial, "state machine initialized");
        Ok(())
    }

    pub(crate) fn step(
        &mut self,
        hook: Hook<M::Trigger>,
        ctx: &mut M::Context,
    ) -> Result<Step<M::Key>> {
        let current = self.current.ok_or(StateMachineError::NotInitialized)?;
        let state = self
            .states
            .get_mut(&current)
            .ok_or_else(|| StateMachineError::unknown(current))?;

        let request = match hook {
            Hook::Frame => state.frame_update(ctx),
            Hook::Physics => state.physics_update(ctx),
            Hook::Animation(trigger) => state.animation_trigger(trigger, ctx),
        };

        match request {
            Transition::Stay => Ok(Step::Stayed),
            Transition::To(next) if self.states.contains_key(&next) => {
                self.switch(current, next, ctx)?;
                Ok(Step::Changed(next))
            }
            Transition::To(next) => Ok(Step::Escalated(next)),
        }
    }

    fn switch(&mut self, current: M::Key, next: M::Key, ctx: &mut M::Context) -> Result<()> {
        self.states
            .get_mut(&current)
            .ok_or_else(|| StateMachineError::unknown(current))?
            .exit(ctx);

        self.current = Some(next);
        self.states
            .get_mut(&next)
            .ok_or_else(|| StateMachineError::unknown(next))?
            .enter(ctx);

        self.transitions += 1;
        tracing::debug!(from = ?current, to = ?next, "state changed");
        Ok(())
    }

    fn resolve(step: Step<M::Key>) -> Result<Option<M::Key>> {
        match step {
            Step::Stayed => Ok(None),
            Step::Changed(next) => Ok(Some(next)),
            Step::Escalated(next) => {
                tracing::warn!(requested = ?next, "transition to unregistered state");
                Err(StateMachineError::unknown(next))
            }
        }
    }
}

impl<M: Machine> Default for StateMachine<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Machine> fmt::Debug for StateMachine<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .field("transitions", &self.transitions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Idle,
        Chase,
        Missing,
    }

    #[derive(Default)]
    struct Ctx {
        log: Vec<String>,
        target: bool,
    }

    struct Test;
    impl Machine for Test {
        type Key = Key;
        type Context = Ctx;
        type Trigger = u8;
    }

    struct Recorder {
        name: &'static str,
        on_frame: fn(&Ctx) -> Transition<Key>,
    }

    impl Recorder {
        fn boxed(
            name: &'static str,
            on_frame: fn(&Ctx) -> Transition<Key>,
        ) -> Box<dyn State<Test>> {
            Box::new(Self { name, on_frame })
        }
    }

    impl State<Test> for Recorder {
        fn enter(&mut self, ctx: &mut Ctx) {
            ctx.log.push(format!("{}.enter", self.name));
        }

        fn exit(&mut self, ctx: &mut Ctx) {
            ctx.log.push(format!("{}.exit", self.name));
        }

        fn frame_update(&mut self, ctx: &mut Ctx) -> Transition<Key> {
            ctx.log.push(format!("{}.frame", self.name));
            (self.on_frame)(ctx)
        }

        fn physics_update(&mut self, ctx: &mut Ctx) -> Transition<Key> {
            ctx.log.push(format!("{}.physics", self.name));
            Transition::Stay
        }

        fn animation_trigger(&mut self, trigger: u8, ctx: &mut Ctx) -> Transition<Key> {
            ctx.log.push(format!("{}.anim({trigger})", self.name));
            Transition::Stay
        }
    }

    fn machine() -> StateMachine<Test> {
        let mut machine = StateMachine::new();
        machine
            .add_state(
                Key::Idle,
                Recorder::boxed("idle", |ctx| {
                    if ctx.target {
                        Transition::To(Key::Chase)
                    } else {
                        Transition::Stay
                    }
                }),
            )
            .unwrap();
        machine
            .add_state(Key::Chase, Recorder::boxed("chase", |_| Transition::Stay))
            .unwrap();
        machine
    }

    #[test]
    fn initialize_then_change_runs_hooks_in_order() {
        let mut machine = machine();
        let mut ctx = Ctx::default();

        machine.initialize(Key::Idle, &mut ctx).unwrap();
        machine.change_state(Key::Chase, &mut ctx).unwrap();

        assert_eq!(ctx.log, ["idle.enter", "idle.exit", "chase.enter"]);
        assert_eq!(machine.current(), Some(Key::Chase));
        assert_eq!(machine.transition_count(), 1);
    }

    #[test]
    fn changing_to_current_state_re_enters() {
        let mut machine = machine();
        let mut ctx = Ctx::default();
        machine.initialize(Key::Idle, &mut ctx).unwrap();
        ctx.log.clear();

        machine.change_state(Key::Idle, &mut ctx).unwrap();

        assert_eq!(ctx.log, ["idle.exit", "idle.enter"]);
        assert_eq!(machine.transition_count(), 1);
    }

    #[test]
    fn initialize_twice_is_rejected() {
        let mut machine = machine();
        let mut ctx = Ctx::default();
        machine.initialize(Key::Idle, &mut ctx).unwrap();

        let err = machine.initialize(Key::Chase, &mut ctx).unwrap_err();

        assert!(matches!(err, StateMachineError::AlreadyInitialized { .. }));
        assert_eq!(machine.current(), Some(Key::Idle));
    }

    #[test]
    fn driving_before_initialize_fails() {
        let mut machine = machine();
        let mut ctx = Ctx::default();

        assert_eq!(
            machine.change_state(Key::Chase, &mut ctx),
            Err(StateMachineError::NotInitialized)
        );
        assert_eq!(
            machine.frame_update(&mut ctx),
            Err(StateMachineError::NotInitialized)
        );
        assert!(ctx.log.is_empty());
    }

    #[test]
    fn unknown_targets_are_rejected_without_side_effects() {
        let mut machine = machine();
        let mut ctx = Ctx::default();
        machine.initialize(Key::Idle, &mut ctx).unwrap();
        ctx.log.clear();

        let err = machine.change_state(Key::Missing, &mut ctx).unwrap_err();

        assert!(matches!(err, StateMachineError::UnknownState { .. }));
        assert!(ctx.log.is_empty());
        assert_eq!(machine.current(), Some(Key::Idle));
    }

    #[test]
    fn frame_update_applies_requested_transition_once() {
        let mut machine = machine();
        let mut ctx = Ctx::default();
        machine.initialize(Key::Idle, &mut ctx).unwrap();

        assert_eq!(machine.frame_update(&mut ctx), Ok(None));
        assert_eq!(machine.current(), Some(Key::Idle));

        ctx.target = true;
        assert_eq!(machine.frame_update(&mut ctx), Ok(Some(Key::Chase)));
        assert_eq!(machine.frame_update(&mut ctx), Ok(None));

        assert_eq!(machine.transition_count(), 1);
        assert_eq!(machine.current(), Some(Key::Chase));
    }

    #[test]
    fn updates_reach_only_current_state() {
        let mut machine = machine();
        let mut ctx = Ctx::default();
        machine.initialize(Key::Chase, &mut ctx).unwrap();
        ctx.log.clear();

        machine.physics_update(&mut ctx).unwrap();
        machine.animation_trigger(3, &mut ctx).unwrap();

        assert_eq!(ctx.log, ["chase.physics", "chase.anim(3)"]);
    }

    #[test]
    fn duplicate_state_is_rejected() {
        let mut machine = machine();
        let err = machine
            .add_state(Key::Idle, Recorder::boxed("again", |_| Transition::Stay))
            .unwrap_err();
        assert!(matches!(err, StateMachineError::DuplicateState { .. }));
    }

    #[test]
    fn shutdown_exits_current_state() {
        let mut machine = machine();
        let mut ctx = Ctx::default();
        machine.initialize(Key::Idle, &mut ctx).unwrap();

        machine.shutdown(&mut ctx);

        assert_eq!(ctx.log, ["idle.enter", "idle.exit"]);
        assert!(!machine.is_initialized());
        machine.initialize(Key::Chase, &mut ctx).unwrap();
    }
}
