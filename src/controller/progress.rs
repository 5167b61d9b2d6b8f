//! Synthetic progress for in-flight checks
//!
//! The remote service reports nothing until it is done, so progress is
//! simulated: a fixed list of stages fires at fixed offsets after start
//! (`1x`, `2x`, `3x`... a base unit), independent of the real request.
//! The controller cancels the simulation as soon as the request settles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Stage label shown once the real result has arrived
pub const COMPLETE_STAGE: &str = "Complete!";

/// One scripted progress step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressStage {
    pub label: String,
    pub percent: u8,
}

impl ProgressStage {
    pub fn new(label: impl Into<String>, percent: u8) -> Self {
        Self {
            label: label.into(),
            percent,
        }
    }
}

/// Ordered stages plus the base time unit between them
#[derive(Debug, Clone)]
pub struct ProgressSchedule {
    stages: Vec<ProgressStage>,
    base_unit: Duration,
}

impl ProgressSchedule {
    pub fn new(stages: Vec<ProgressStage>, base_unit: Duration) -> Self {
        Self { stages, base_unit }
    }

    /// The four stages shown for every check
    pub fn standard(base_unit: Duration) -> Self {
        Self::new(
            vec![
                ProgressStage::new("Fetching webpage...", 20),
                ProgressStage::new("Analyzing content...", 40),
                ProgressStage::new("Running compliance checks...", 70),
                ProgressStage::new("Generating recommendations...", 90),
            ],
            base_unit,
        )
    }

    pub fn stages(&self) -> &[ProgressStage] {
        &self.stages
    }

    /// Label displayed before the first stage fires
    pub fn initial_label(&self) -> Option<&str> {
        self.stages.first().map(|s| s.label.as_str())
    }

    /// Delay between start and the `index`-th stage
    pub fn offset(&self, index: usize) -> Duration {
        self.base_unit * (index as u32 + 1)
    }
}

/// Starts cancelable progress simulations from a schedule
#[derive(Debug, Clone)]
pub struct ProgressSimulator {
    schedule: Arc<ProgressSchedule>,
}

impl ProgressSimulator {
    pub fn new(schedule: ProgressSchedule) -> Self {
        Self {
            schedule: Arc::new(schedule),
        }
    }

    pub fn schedule(&self) -> &ProgressSchedule {
        &self.schedule
    }

    /// Spawns the simulation; `sink` receives each stage as it fires
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&self, sink: F) -> ProgressHandle
    where
        F: Fn(&ProgressStage) + Send + Sync + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let schedule = Arc::clone(&self.schedule);
        let flag = Arc::clone(&cancelled);

        let task = tokio::spawn(async move {
            let started = Instant::now();

            for (index, stage) in schedule.stages().iter().enumerate() {
                tokio::time::sleep_until(started + schedule.offset(index)).await;

                if flag.load(Ordering::SeqCst) {
                    return;
                }

                tracing::debug!("Progress: {}% {}", stage.percent, stage.label);
                sink(stage);
            }
        });

        ProgressHandle { cancelled, task }
    }
}

/// Handle to a running simulation; cancels it when dropped
#[derive(Debug)]
pub struct ProgressHandle {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl ProgressHandle {
    /// Stops the simulation. No stage fires after this returns.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// True once every stage has fired or the simulation was cancelled
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
