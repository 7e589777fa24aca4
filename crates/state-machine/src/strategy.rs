//! Behaviour strategies bound to states.
//!
//! A strategy is the swappable part of a state: the state fixes *when* hooks
//! run, the strategy decides *what* happens. Strategies are chosen when the
//! machine is assembled and injected with the collaborators they need
//! (steering, target tracking, ...); the per-tick actor data arrives through
//! the context.

use crate::{Machine, State, Transition};

/// Swappable behaviour for a state.
///
/// Every hook defaults to a no-op, so a strategy implements only what it
/// needs.
pub trait Strategy<M: Machine> {
    /// Runs once, before the first `enter`.
    fn initialize(&mut self, _ctx: &mut M::Context) {}

    fn enter(&mut self, _ctx: &mut M::Context) {}

    fn exit(&mut self, _ctx: &mut M::Context) {}

    fn frame_update(&mut self, _ctx: &mut M::Context) -> Transition<M::Key> {
        Transition::Stay
    }

    fn physics_update(&mut self, _ctx: &mut M::Context) -> Transition<M::Key> {
        Transition::Stay
    }

    fn animation_trigger(
        &mut self,
        _trigger: M::Trigger,
        _ctx: &mut M::Context,
    ) -> Transition<M::Key> {
        Transition::Stay
    }

    /// Clears per-activation bookkeeping. Runs after every `exit`.
    fn reset_values(&mut self) {}
}

/// Strategy that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStrategy;

impl<M: Machine> Strategy<M> for NoopStrategy {}

/// State that forwards every hook to a boxed [`Strategy`].
///
/// # Semantics
///
/// - First `enter`: `initialize`, then `enter`
/// - `exit`: `exit`, then `reset_values`
/// - Update hooks are forwarded unchanged
pub struct StrategyState<M: Machine> {
    strategy: Box<dyn Strategy<M>>,
    initialized: bool,
    activations: u32,
}

impl<M: Machine> StrategyState<M> {
    pub fn new(strategy: Box<dyn Strategy<M>>) -> Self {
        Self {
            strategy,
            initialized: false,
            activations: 0,
        }
    }

    /// How many times this state has been entered.
    pub fn activations(&self) -> u32 {
        self.activations
    }
}

impl<M: Machine> State<M> for StrategyState<M> {
    fn enter(&mut self, ctx: &mut M::Context) {
        if !self.initialized {
            self.strategy.initialize(ctx);
            self.initialized = true;
        }
        self.activations += 1;
        self.strategy.enter(ctx);
    }

    fn exit(&mut self, ctx: &mut M::Context) {
        self.strategy.exit(ctx);
        self.strategy.reset_values();
    }

    fn frame_update(&mut self, ctx: &mut M::Context) -> Transition<M::Key> {
        self.strategy.frame_update(ctx)
    }

    fn physics_update(&mut self, ctx: &mut M::Context) -> Transition<M::Key> {
        self.strategy.physics_update(ctx)
    }

    fn animation_trigger(
        &mut self,
        trigger: M::Trigger,
        ctx: &mut M::Context,
    ) -> Transition<M::Key> {
        self.strategy.animation_trigger(trigger, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StateMachine;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        A,
        B,
    }

    #[derive(Default)]
    struct Ctx {
        log: Vec<&'static str>,
        ticks: u32,
    }

    struct Test;
    impl Machine for Test {
        type Key = Key;
        type Context = Ctx;
        type Trigger = ();
    }

    #[derive(Default)]
    struct Counting {
        ticks_this_activation: u32,
    }

    impl Strategy<Test> for Counting {
        fn initialize(&mut self, ctx: &mut Ctx) {
            ctx.log.push("init");
        }

        fn enter(&mut self, ctx: &mut Ctx) {
            ctx.log.push("enter");
        }

        fn exit(&mut self, ctx: &mut Ctx) {
            ctx.log.push("exit");
        }

        fn frame_update(&mut self, ctx: &mut Ctx) -> Transition<Key> {
            self.ticks_this_activation += 1;
            ctx.ticks = self.ticks_this_activation;
            Transition::Stay
        }

        fn reset_values(&mut self) {
            self.ticks_this_activation = 0;
        }
    }

    fn machine() -> StateMachine<Test> {
        StateMachine::builder()
            .strategy(Key::A, Counting::default())
            .strategy(Key::B, NoopStrategy)
            .build()
            .unwrap()
    }

    #[test]
    fn initialize_runs_once_across_activations() {
        let mut machine = machine();
        let mut ctx = Ctx::default();

        machine.initialize(Key::A, &mut ctx).unwrap();
        machine.change_state(Key::B, &mut ctx).unwrap();
        machine.change_state(Key::A, &mut ctx).unwrap();

        assert_eq!(ctx.log, ["init", "enter", "exit", "enter"]);
    }

    #[test]
    fn reset_values_runs_after_exit() {
        let mut machine = machine();
        let mut ctx = Ctx::default();
        machine.initialize(Key::A, &mut ctx).unwrap();

        machine.frame_update(&mut ctx).unwrap();
        machine.frame_update(&mut ctx).unwrap();
        assert_eq!(ctx.ticks, 2);

        machine.change_state(Key::B, &mut ctx).unwrap();
        machine.change_state(Key::A, &mut ctx).unwrap();
        machine.frame_update(&mut ctx).unwrap();
        assert_eq!(ctx.ticks, 1);
    }

    #[test]
    fn noop_strategy_never_requests_transitions() {
        let mut machine = machine();
        let mut ctx = Ctx::default();
        machine.initialize(Key::B, &mut ctx).unwrap();

        assert_eq!(machine.frame_update(&mut ctx), Ok(None));
        assert_eq!(machine.physics_update(&mut ctx), Ok(None));
        assert_eq!(machine.animation_trigger((), &mut ctx), Ok(None));
        assert!(ctx.log.is_empty());
    }

    #[test]
    fn activations_are_counted() {
        let mut state = StrategyState::<Test>::new(Box::new(NoopStrategy));
        let mut ctx = Ctx::default();

        state.enter(&mut ctx);
        state.exit(&mut ctx);
        state.enter(&mut ctx);

        assert_eq!(state.activations(), 2);
    }
}
