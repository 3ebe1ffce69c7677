//! State machine for the save flow.
//!
//! ```text
//! Idle -> PermissionRequested -> PermissionGranted -> ConfirmationRequested
//!                             \-> PermissionDenied    |-> ConfirmationAccepted -> Writing -> Saved
//!                                                     \-> ConfirmationDeclined            \-> WriteFailed
//! ```
//!
//! Every terminal state returns to `Idle`. A flow can also be abandoned from
//! any state when its action is cancelled.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaveFlowState {
    #[default]
    Idle,
    PermissionRequested,
    PermissionGranted,
    PermissionDenied,
    ConfirmationRequested,
    ConfirmationAccepted,
    ConfirmationDeclined,
    Writing,
    Saved,
    WriteFailed,
}

impl SaveFlowState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SaveFlowState::PermissionDenied
                | SaveFlowState::ConfirmationDeclined
                | SaveFlowState::Saved
                | SaveFlowState::WriteFailed
        )
    }

    pub fn can_transition_to(self, next: SaveFlowState) -> bool {
        use SaveFlowState::*;
        match (self, next) {
            (Idle, PermissionRequested) => true,
            (PermissionRequested, PermissionGranted | PermissionDenied) => true,
            (PermissionGranted, ConfirmationRequested) => true,
            (ConfirmationRequested, ConfirmationAccepted | ConfirmationDeclined) => true,
            (ConfirmationAccepted, Writing) => true,
            (Writing, Saved | WriteFailed) => true,
            (from, Idle) => from.is_terminal(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("save flow cannot move from {from:?} to {to:?}")]
pub struct TransitionError {
    pub from: SaveFlowState,
    pub to: SaveFlowState,
}

/// One run of the save flow with its visited states.
#[derive(Debug, Clone, Default)]
pub struct SaveFlow {
    state: SaveFlowState,
    history: Vec<SaveFlowState>,
}

impl SaveFlow {
    pub fn new() -> Self {
        Self {
            state: SaveFlowState::Idle,
            history: vec![SaveFlowState::Idle],
        }
    }

    pub fn state(&self) -> SaveFlowState {
        self.state
    }

    pub fn history(&self) -> &[SaveFlowState] {
        &self.history
    }

    pub fn advance(&mut self, next: SaveFlowState) -> Result<(), TransitionError> {
        if !self.state.can_transition_to(next) {
            return Err(TransitionError {
                from: self.state,
                to: next,
            });
        }
        debug!(from = ?self.state, to = ?next, "save flow transition");
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    /// Returns a terminal flow to `Idle`.
    pub fn finish(&mut self) -> Result<(), TransitionError> {
        self.advance(SaveFlowState::Idle)
    }

    /// Drops back to `Idle` from wherever the flow is, e.g. on cancellation.
    pub fn abandon(&mut self) {
        if self.state != SaveFlowState::Idle {
            debug!(from = ?self.state, "save flow abandoned");
            self.state = SaveFlowState::Idle;
            self.history.push(SaveFlowState::Idle);
        }
    }
}
