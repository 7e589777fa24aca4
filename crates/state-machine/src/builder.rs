//! Builder utilities for assembling state machines.
//!
//! Instead of registering states one by one and boxing every strategy by
//! hand, chain [`StateMachineBuilder::state`] and
//! [`StateMachineBuilder::strategy`] calls and finish with
//! [`StateMachineBuilder::build`].

use crate::error::{Result, StateMachineError};
use crate::{Machine, State, StateMachine, Strategy, StrategyState, SubStateMachine};

/// Collects states and validates them on [`build`](Self::build).
pub struct StateMachineBuilder<M: Machine> {
    states: Vec<(M::Key, Box<dyn State<M>>)>,
}

impl<M: Machine> StateMachineBuilder<M> {
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    /// Adds a plain state.
    pub fn state(mut self, key: M::Key, state: impl State<M> + 'static) -> Self {
        self.states.push((key, Box::new(state)));
        self
    }

    /// Adds a state that delegates to `strategy`.
    pub fn strategy(self, key: M::Key, strategy: impl Strategy<M> + 'static) -> Self {
        self.state(key, strategy_state(Box::new(strategy)))
    }

    /// Adds an already boxed strategy, e.g. one picked from configuration.
    pub fn boxed_strategy(self, key: M::Key, strategy: Box<dyn Strategy<M>>) -> Self {
        self.state(key, strategy_state(strategy))
    }

    /// Fails on duplicate keys or when no state was added.
    pub fn build(self) -> Result<StateMachine<M>> {
        if self.states.is_empty() {
            return Err(StateMachineError::Empty);
        }
        let mut machine = StateMachine::new();
        for (key, state) in self.states {
            machine.add_state(key, state)?;
        }
        Ok(machine)
    }
}

impl<M: Machine> Default for StateMachineBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps a strategy in a [`StrategyState`].
///
/// Shorthand for `StrategyState::new(strategy)`.
#[inline]
pub fn strategy_state<M: Machine>(strategy: Box<dyn Strategy<M>>) -> StrategyState<M> {
    StrategyState::new(strategy)
}

/// Creates a composite state around a child machine.
///
/// Shorthand for `SubStateMachine::new(child, initial)`.
#[inline]
pub fn sub_machine<M: Machine>(
    child: StateMachine<M>,
    initial: M::Key,
) -> Result<SubStateMachine<M>> {
    SubStateMachine::new(child, initial)
}
