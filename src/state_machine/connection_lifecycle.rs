// Copyright (c) 2025 - Cowboy AI, Inc.
//! Connection Lifecycle State Machine
//!
//! Lifecycle of one (host, connection-name) pair. Opening is atomic from the
//! caller's perspective, so there is no connecting or error state.
//!
//! # States
//!
//! - Absent: no handle exists
//! - Open: a backend handle is live
//!
//! # Inputs
//!
//! - Open: Absent → Open
//! - Close: Open → Absent
//!
//! Anything else is misuse by the caller and is rejected.

use super::{StateMachine, TransitionError, TransitionResult};

/// State of a named connection on one host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Absent,
    Open,
}

/// Lifecycle command (FSM input)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleCommand {
    /// Open a new handle
    Open,

    /// Close the existing handle
    Close,
}

impl ConnectionState {
    /// State implied by whether a handle is registered
    pub fn of(is_open: bool) -> Self {
        if is_open {
            ConnectionState::Open
        } else {
            ConnectionState::Absent
        }
    }
}

impl StateMachine for ConnectionState {
    type Input = LifecycleCommand;
    type Output = ();

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use ConnectionState::*;

        match (self, input) {
            (Absent, LifecycleCommand::Open) => Ok((Open, ())),
            (Open, LifecycleCommand::Close) => Ok((Absent, ())),
            (Open, LifecycleCommand::Open) => Err(TransitionError::InvalidTransition {
                from: "Open".to_string(),
                to: "Open".to_string(),
            }),
            (Absent, LifecycleCommand::Close) => Err(TransitionError::InvalidTransition {
                from: "Absent".to_string(),
                to: "Absent".to_string(),
            }),
        }
    }

    fn valid_inputs(&self) -> Vec<Self::Input> {
        match self {
            ConnectionState::Absent => vec![LifecycleCommand::Open],
            ConnectionState::Open => vec![LifecycleCommand::Close],
        }
    }
}
