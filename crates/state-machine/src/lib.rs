//! Hierarchical finite state machine with pluggable behaviour strategies.
//!
//! Built for frame-driven actors such as enemy AI: the host drives a machine
//! once per rendered frame, once per fixed physics step, and on animation
//! events. Only the current state sees these calls.
//!
//! - **Explicit transitions**: update hooks return a [`Transition`] instead of
//!   calling back into the machine, so a transition can never start while
//!   another is still running
//! - **Typed keys**: each machine family picks its own key, context and
//!   animation trigger types through [`Machine`]
//! - **Strategies**: a [`StrategyState`] delegates to a swappable
//!   [`Strategy`] picked when the machine is assembled
//!
//! # Architecture
//!
//! - [`State`]: hook trait every state implements
//! - [`StateMachine`]: state container and driver
//! - [`SubStateMachine`]: a state owning a nested machine
//! - [`StateMachineBuilder`]: fluent assembly with validation

pub mod builder;
pub mod error;
pub mod hierarchy;
pub mod machine;
pub mod state;
pub mod strategy;
pub mod transition;

pub use builder::{StateMachineBuilder, strategy_state, sub_machine};
pub use error::{Result, StateMachineError};
pub use hierarchy::SubStateMachine;
pub use machine::StateMachine;
pub use state::{Machine, State};
pub use strategy::{NoopStrategy, Strategy, StrategyState};
pub use transition::Transition;
