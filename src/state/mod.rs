//! State module for tracking check progress
//!
//! This module provides the state the check controller owns and exposes.
//!
//! # Components
//!
//! - `LifecycleState`: the controller's phase (idle, requesting, succeeded, failed)
//! - `Progress`: the perceived progress of the in-flight check
//! - `CheckFailure`: a failure message with its classified kind
//! - `Snapshot`: a read-only copy of all of the above for the UI

mod lifecycle;
mod snapshot;

// Re-export main types
pub use lifecycle::LifecycleState;
pub use snapshot::{CheckFailure, Progress, Snapshot};
