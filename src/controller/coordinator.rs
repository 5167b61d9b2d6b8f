//! Check controller - request lifecycle orchestration
//!
//! This module contains the state machine that drives a compliance check:
//! - Validating the submitted URL locally
//! - Guarding against concurrent checks
//! - Running the progress simulation next to the real request
//! - Classifying failures
//! - Publishing results to the history and the last-result cache

use crate::config::Config;
use crate::controller::client::ServiceClient;
use crate::controller::progress::{
    ProgressHandle, ProgressSchedule, ProgressSimulator, COMPLETE_STAGE,
};
use crate::model::{CheckResult, HistoryEntry, ServerCheckResult};
use crate::state::{CheckFailure, LifecycleState, Progress, Snapshot};
use crate::storage::{HistoryStore, KeyValueStore, ResultCache, StorageResult};
use crate::url::validate_check_url;
use crate::{ComplianceError, ValidationError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// What a call to `submit` did
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The URL failed local validation; nothing was sent
    Rejected(ValidationError),

    /// A check was already in flight; nothing changed
    Ignored,

    /// The check completed and its result is displayed
    Succeeded(CheckResult),

    /// The check failed and the classified failure is displayed
    Failed(CheckFailure),
}

/// Everything the controller owns, behind one lock
#[derive(Default)]
struct ControllerState {
    lifecycle: LifecycleState,
    result: Option<CheckResult>,
    failure: Option<CheckFailure>,
    progress: Progress,
    last_url: Option<String>,

    /// Incremented on every accepted submit; progress updates from older runs are dropped
    run: u64,

    simulation: Option<ProgressHandle>,
}

impl ControllerState {
    fn stop_simulation(&mut self) {
        if let Some(handle) = self.simulation.take() {
            handle.cancel();
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.lifecycle,
            result: self.result.clone(),
            failure: self.failure.clone(),
            progress: self.progress.clone(),
            last_url: self.last_url.clone(),
        }
    }
}

fn lock(state: &Mutex<ControllerState>) -> MutexGuard<'_, ControllerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the controller to `Idle` if a `submit` future is dropped mid-flight
///
/// Has no effect once the run has settled or a newer run has started.
struct RunGuard<'a> {
    state: &'a Mutex<ControllerState>,
    run: u64,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        if state.run != self.run || !state.lifecycle.is_busy() {
            return;
        }

        tracing::warn!("Check abandoned before it settled (run {})", self.run);
        state.stop_simulation();
        state.lifecycle = LifecycleState::Idle;
        state.result = None;
        state.failure = None;
        state.progress = Progress::cleared();
    }
}

/// Drives compliance checks and owns the lifecycle state
///
/// At most one check is in flight at a time. All state changes go through
/// this type; callers observe them with `snapshot()`.
pub struct CheckController {
    state: Arc<Mutex<ControllerState>>,
    client: ServiceClient,
    simulator: ProgressSimulator,
    history: HistoryStore,
    cache: ResultCache,
    settle_delay: Duration,
}

impl CheckController {
    /// Creates a controller from configuration and a persistence backend
    ///
    /// # Arguments
    ///
    /// * `config` - The application configuration
    /// * `store` - Backend for the history and the last-result cache
    ///
    /// # Returns
    ///
    /// * `Ok(CheckController)` - Ready controller, restored from the cache if possible
    /// * `Err(ComplianceError)` - The HTTP client could not be built
    pub fn new(config: &Config, store: Arc<dyn KeyValueStore>) -> Result<Self, ComplianceError> {
        let client = ServiceClient::new(&config.service)?;
        let schedule =
            ProgressSchedule::standard(Duration::from_millis(config.progress.base_unit_ms));

        Ok(Self::with_parts(
            client,
            ProgressSimulator::new(schedule),
            store,
            Duration::from_millis(config.progress.settle_delay_ms),
        ))
    }

    /// Creates a controller from already-built parts
    pub fn with_parts(
        client: ServiceClient,
        simulator: ProgressSimulator,
        store: Arc<dyn KeyValueStore>,
        settle_delay: Duration,
    ) -> Self {
        let history = HistoryStore::new(Arc::clone(&store));
        let cache = ResultCache::new(store);

        let mut initial = ControllerState::default();
        if let Some(result) = cache.load() {
            tracing::info!("Restored last result for {}", result.url);
            initial.lifecycle = LifecycleState::Succeeded;
            initial.last_url = Some(result.url.clone());
            initial.result = Some(result);
        }

        Self {
            state: Arc::new(Mutex::new(initial)),
            client,
            simulator,
            history,
            cache,
            settle_delay,
        }
    }

    /// Submits `url` for checking and waits for the check to settle
    ///
    /// Invalid URLs are rejected locally and a submit while another check is
    /// in flight is ignored; neither changes any state. Otherwise exactly one
    /// request is sent and the controller ends in `Succeeded` or `Failed`.
    /// Dropping the returned future before it resolves leaves the controller
    /// `Idle` with the last URL kept for `retry`.
    pub async fn submit(&self, url: &str) -> SubmitOutcome {
        let url = match validate_check_url(url) {
            Ok(url) => url,
            Err(reason) => {
                tracing::info!("Rejected submission: {}", reason);
                return SubmitOutcome::Rejected(reason);
            }
        };

        let run = match self.begin(url) {
            Some(run) => run,
            None => {
                tracing::debug!("Check already in flight, ignoring {}", url);
                return SubmitOutcome::Ignored;
            }
        };

        let _guard = RunGuard {
            state: &self.state,
            run,
        };
        tracing::info!("Checking {} (run {})", url, run);

        match self.client.check(url).await {
            Ok(server) => self.complete(server).await,
            Err(e) => self.fail(CheckFailure::new(e.message(), e.kind())),
        }
    }

    /// Re-submits the last submitted URL; `None` if nothing was ever submitted
    pub async fn retry(&self) -> Option<SubmitOutcome> {
        let url = lock(&self.state).last_url.clone()?;
        Some(self.submit(&url).await)
    }

    /// Clears the displayed result, failure and progress, and the cached result
    ///
    /// History is kept. Returns `false` (and does nothing) while a check is in flight.
    pub fn reset(&self) -> bool {
        {
            let mut state = lock(&self.state);
            if state.lifecycle.is_busy() {
                return false;
            }
            state.lifecycle = LifecycleState::Idle;
            state.result = None;
            state.failure = None;
            state.progress = Progress::cleared();
        }

        if let Err(e) = self.cache.clear() {
            tracing::error!("Failed to clear cached result: {}", e);
        }
        tracing::info!("Display reset");
        true
    }

    /// Displays a history entry without modifying the history
    ///
    /// Returns the entry, or `None` if the id is unknown or a check is in flight.
    pub fn select_history(&self, id: &str) -> Option<HistoryEntry> {
        if self.state().is_busy() {
            return None;
        }

        let entry = self.history.select(id)?;

        let mut state = lock(&self.state);
        if state.lifecycle.is_busy() {
            return None;
        }
        state.lifecycle = LifecycleState::Succeeded;
        state.result = Some(entry.clone());
        state.failure = None;
        state.progress = Progress::cleared();
        state.last_url = Some(entry.url.clone());

        tracing::info!("Showing history entry {} for {}", entry.id, entry.url);
        Some(entry)
    }

    /// A copy of the current controller state
    pub fn snapshot(&self) -> Snapshot {
        lock(&self.state).snapshot()
    }

    pub fn state(&self) -> LifecycleState {
        lock(&self.state).lifecycle
    }

    pub fn progress(&self) -> Progress {
        lock(&self.state).progress.clone()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn clear_history(&self) -> StorageResult<()> {
        self.history.clear()?;
        tracing::info!("History cleared");
        Ok(())
    }

    /// Moves to `Requesting` and starts the progress simulation
    ///
    /// Returns the new run number, or `None` if a check is already in flight.
    fn begin(&self, url: &str) -> Option<u64> {
        let mut state = lock(&self.state);
        if !state.lifecycle.can_transition_to(LifecycleState::Requesting) {
            return None;
        }

        state.run += 1;
        let run = state.run;

        state.lifecycle = LifecycleState::Requesting;
        state.result = None;
        state.failure = None;
        state.last_url = Some(url.to_string());
        state.progress = Progress {
            percent: 0,
            stage: self
                .simulator
                .schedule()
                .initial_label()
                .map(str::to_string),
        };

        let shared = Arc::clone(&self.state);
        state.simulation = Some(self.simulator.start(move |stage| {
            let mut state = lock(&shared);
            if state.run == run && state.lifecycle.is_busy() && state.simulation.is_some() {
                state.progress = Progress::at(stage.percent, stage.label.clone());
            }
        }));

        Some(run)
    }

    /// Success path: show 100%, settle, publish, persist
    async fn complete(&self, server: ServerCheckResult) -> SubmitOutcome {
        let result = CheckResult::from_server(server);

        {
            let mut state = lock(&self.state);
            state.stop_simulation();
            state.progress = Progress::at(100, COMPLETE_STAGE);
        }

        tokio::time::sleep(self.settle_delay).await;

        {
            let mut state = lock(&self.state);
            state.lifecycle = LifecycleState::Succeeded;
            state.result = Some(result.clone());
            state.failure = None;
        }

        if let Err(e) = self.cache.save(&result) {
            tracing::error!("Failed to cache result: {}", e);
        }
        if let Err(e) = self.history.append(result.clone()) {
            tracing::error!("Failed to save to history: {}", e);
        }

        lock(&self.state).progress = Progress::cleared();

        tracing::info!(
            "Check of {} completed: score {} ({}/{} passed)",
            result.url,
            result.score_label(),
            result.passed_count,
            result.total_count
        );
        SubmitOutcome::Succeeded(result)
    }

    /// Failure path: stop progress and display the classified failure
    fn fail(&self, failure: CheckFailure) -> SubmitOutcome {
        {
            let mut state = lock(&self.state);
            state.stop_simulation();
            state.lifecycle = LifecycleState::Failed;
            state.result = None;
            state.failure = Some(failure.clone());
            state.progress = Progress::cleared();
        }

        tracing::warn!("Check failed ({}): {}", failure.kind, failure.message);
        SubmitOutcome::Failed(failure)
    }
}
