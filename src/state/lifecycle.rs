//! Lifecycle state of the check controller
//!
//! This module defines the phases a check moves through, from submission to
//! a published result or a classified failure.

use std::fmt;

/// Represents the current phase of the check controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    /// Nothing submitted, or the display was reset
    #[default]
    Idle,

    /// A check request is in flight
    Requesting,

    /// A result is being displayed
    Succeeded,

    /// The last check failed; a classified failure is being displayed
    Failed,
}

impl LifecycleState {
    /// Returns true if a check has finished (successfully or not)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Returns true while a request is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Requesting)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// `Requesting` is left for a terminal state, or for `Idle` when the check
    /// is abandoned. A new request can only start when none is in flight.
    pub fn can_transition_to(&self, next: LifecycleState) -> bool {
        match (self, next) {
            (Self::Requesting, Self::Succeeded | Self::Failed | Self::Idle) => true,
            (Self::Requesting, _) => false,
            (_, Self::Requesting) => true,
            (_, Self::Idle) => true,
            // History selection can display a result from any settled state
            (_, Self::Succeeded) => true,
            (_, Self::Failed) => false,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
