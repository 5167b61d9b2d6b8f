use crate::classify::ErrorKind;
use crate::model::CheckResult;
use crate::state::LifecycleState;
use std::fmt;

/// Perceived progress of the in-flight check
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Progress {
    /// 0-100
    pub percent: u8,

    /// Label of the current stage, if any
    pub stage: Option<String>,
}

impl Progress {
    /// No progress and no stage label
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn at(percent: u8, stage: impl Into<String>) -> Self {
        Self {
            percent: percent.min(100),
            stage: Some(stage.into()),
        }
    }
}

/// A failed check: the human-readable message plus its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    pub message: String,
    pub kind: ErrorKind,
}

impl CheckFailure {
    pub fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

/// Read-only view of the controller, handed to the UI
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub state: LifecycleState,

    /// The displayed result, if any
    pub result: Option<CheckResult>,

    /// The displayed failure, if any
    pub failure: Option<CheckFailure>,

    pub progress: Progress,

    /// The URL most recently accepted by `submit` (or loaded from history)
    pub last_url: Option<String>,
}
