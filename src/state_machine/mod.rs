// Copyright (c) 2025 - Cowboy AI, Inc.
//! Finite State Machine Abstractions
//!
//! Generic state machine types for modeling lifecycles. Transitions are
//! pure functions: the machine decides whether a move is allowed and the
//! caller performs the side effects.
//!
//! # Mealy Machine
//!
//! Output depends on both current state and input:
//! ```text
//! (State, Input) → (State, Output)
//! ```
//!
//! # Example
//!
//! ```rust
//! use cim_inventory::state_machine::{StateMachine, TransitionError, TransitionResult};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Switch {
//!     Off,
//!     On,
//! }
//!
//! impl StateMachine for Switch {
//!     type Input = ();
//!     type Output = ();
//!
//!     fn transition(&self, _input: &()) -> TransitionResult<(Self, ())> {
//!         match self {
//!             Switch::Off => Ok((Switch::On, ())),
//!             Switch::On => Err(TransitionError::InvalidTransition {
//!                 from: "On".into(),
//!                 to: "On".into(),
//!             }),
//!         }
//!     }
//! }
//!
//! assert!(Switch::Off.can_transition(&()));
//! assert!(!Switch::On.can_transition(&()));
//! ```

pub mod connection_lifecycle;

pub use connection_lifecycle::{ConnectionState, LifecycleCommand};

/// Result of a state transition
pub type TransitionResult<S> = Result<S, TransitionError>;

/// Errors that can occur during state transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Transition from current state to target state is not allowed
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

/// Trait for finite state machines
///
/// Implement this trait to define a state machine with typed states,
/// inputs, and outputs.
pub trait StateMachine: Sized + Clone {
    /// Input type that triggers transitions
    type Input;

    /// Output type produced by transitions (use () if none)
    type Output;

    /// Attempt to transition to a new state given an input
    ///
    /// # Returns
    /// - Ok((new_state, output)) if transition is valid
    /// - Err(TransitionError) if transition is invalid
    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)>;

    /// Check if a transition is valid without performing it
    fn can_transition(&self, input: &Self::Input) -> bool {
        self.transition(input).is_ok()
    }

    /// Get all valid inputs from current state (if enumerable)
    fn valid_inputs(&self) -> Vec<Self::Input>
    where
        Self::Input: Clone,
    {
        Vec::new()
    }
}
