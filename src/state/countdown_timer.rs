//! Countdown timer owner: shared state, the running task, and commands

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::timer_state::{TickOutcome, TimerState};
use crate::services::Alert;
use crate::tasks::countdown_task;

/// Fixed interval between two ticks of a run
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// State shared between the timer and its countdown task
#[derive(Debug)]
pub(crate) struct Shared {
    state: Mutex<TimerState>,
    update_tx: watch::Sender<TimerState>,
}

impl Shared {
    fn new() -> Self {
        let (update_tx, _) = watch::channel(TimerState::new());
        Self {
            state: Mutex::new(TimerState::new()),
            update_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `updater` under the lock and publish the new state if it changed.
    /// Publishing happens before the lock is released so watchers observe
    /// states in the order they were produced.
    fn update<R, F>(&self, updater: F) -> (R, TimerState)
    where
        F: FnOnce(&mut TimerState) -> R,
    {
        let mut state = self.lock();
        let result = updater(&mut state);
        let snapshot = state.clone();

        self.update_tx.send_if_modified(|published| {
            if *published != snapshot {
                *published = snapshot.clone();
                true
            } else {
                false
            }
        });
        drop(state);

        (result, snapshot)
    }

    /// Apply one tick for `run_id`
    pub(crate) fn apply_tick(&self, run_id: u64, step_ms: u64) -> TickOutcome {
        self.update(|state| state.tick(run_id, step_ms)).0
    }
}

/// Handle on the background task of one run
#[derive(Debug)]
struct RunHandle {
    cancel_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl RunHandle {
    fn stop(self) {
        // The task may already have finished, in which case nobody listens
        let _ = self.cancel_tx.send(());
        self.join.abort();
    }
}

/// A single countdown timer with at most one live countdown task
pub struct CountdownTimer {
    shared: Arc<Shared>,
    task: Mutex<Option<RunHandle>>,
    alert: Arc<dyn Alert>,
    tick_interval: Duration,
}

impl CountdownTimer {
    /// Create an idle timer that invokes `alert` when a run completes
    pub fn new(alert: Arc<dyn Alert>) -> Self {
        Self {
            shared: Arc::new(Shared::new()),
            task: Mutex::new(None),
            alert,
            tick_interval: TICK_INTERVAL,
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> TimerState {
        self.shared.lock().clone()
    }

    /// Watch every state published by commands and ticks
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.shared.update_tx.subscribe()
    }

    /// Store a clamped time selection. Ignored while a run is in progress.
    pub fn select_time(&self, hour: i64, minute: i64, second: i64) -> TimerState {
        let (applied, state) = self.shared.update(|state| state.select(hour, minute, second));
        if applied {
            debug!(
                "Selected {:02}:{:02}:{:02}",
                state.selected_hour, state.selected_minute, state.selected_second
            );
        } else {
            debug!("Ignoring time selection while the timer is running");
        }
        state
    }

    /// Start counting down the current selection.
    ///
    /// Does nothing when already running, when the selection is zero, or
    /// when called outside of a tokio runtime.
    pub fn start_timer(&self) -> TimerState {
        let mut task = self.lock_task();

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("Cannot start timer without a tokio runtime: {}", e);
                return self.state();
            }
        };

        let (run_id, state) = self.shared.update(TimerState::begin_run);

        let Some(run_id) = run_id else {
            debug!(
                "Start ignored: running={}, selected={}ms",
                state.is_running,
                state.selected_duration_ms()
            );
            return state;
        };

        // A finished run leaves its completed handle behind
        if let Some(previous) = task.take() {
            previous.stop();
        }

        let (cancel_tx, cancel_rx) = oneshot::channel();
        let join = runtime.spawn(countdown_task(
            Arc::downgrade(&self.shared),
            run_id,
            self.tick_interval,
            Arc::clone(&self.alert),
            cancel_rx,
        ));
        *task = Some(RunHandle { cancel_tx, join });

        info!("Timer started for {}ms", state.total_duration_ms);
        state
    }

    /// Cancel a running countdown. No-op while idle.
    pub fn cancel_timer(&self) -> TimerState {
        let mut task = self.lock_task();
        let (cancelled, state) = self.shared.update(TimerState::cancel);

        if cancelled {
            if let Some(handle) = task.take() {
                handle.stop();
            }
            info!("Timer cancelled");
        } else {
            debug!("Cancel ignored, timer is not running");
        }
        state
    }

    /// Stop any run and return to the all-zero idle state
    pub fn reset_timer(&self) -> TimerState {
        let mut task = self.lock_task();
        let ((), state) = self.shared.update(TimerState::reset);

        if let Some(handle) = task.take() {
            handle.stop();
        }
        info!("Timer reset");
        state
    }

    /// Wait until no run is in progress and return that state
    pub async fn wait_until_idle(&self) -> TimerState {
        let mut updates = self.subscribe();
        let idle = updates
            .wait_for(|state| !state.is_running)
            .await
            .map(|state| state.clone());

        // The sender lives as long as `self`, so the channel cannot close here
        idle.unwrap_or_else(|_| self.state())
    }

    /// Wait for the last run's task to finish, including any completion
    /// alert it is still playing. Returns at once when there is no task.
    pub async fn join_task(&self) {
        let Some(RunHandle { cancel_tx, join }) = self.lock_task().take() else {
            return;
        };

        // Keep the cancel sender alive, dropping it would stop the run
        let result = join.await;
        drop(cancel_tx);

        if let Err(e) = result {
            if !e.is_cancelled() {
                warn!("Countdown task failed: {}", e);
            }
        }
    }

    fn lock_task(&self) -> MutexGuard<'_, Option<RunHandle>> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }
}

impl std::fmt::Debug for CountdownTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownTimer")
            .field("state", &self.state())
            .field("tick_interval", &self.tick_interval)
            .finish_non_exhaustive()
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        let task = self
            .task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = task {
            debug!("Timer dropped, stopping countdown task");
            handle.stop();
        }
    }
}
