//! Timer state structure and transitions

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Largest selectable hour value
pub const MAX_HOUR: u32 = 99;
/// Largest selectable minute value
pub const MAX_MINUTE: u32 = 59;
/// Largest selectable second value
pub const MAX_SECOND: u32 = 59;

/// Last lifecycle transition a timer went through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Started,
    Completed,
    Cancelled,
    Reset,
}

/// Result of applying one tick to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belongs to a run that was cancelled, reset or replaced
    Stale,
    /// Still counting, with the new remaining milliseconds
    Counting(u64),
    /// Remaining time reached zero on this tick
    Completed,
}

/// Observable countdown timer state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerState {
    pub selected_hour: u32,
    pub selected_minute: u32,
    pub selected_second: u32,
    /// Duration snapshot taken when the current (or last) run started
    pub total_duration_ms: u64,
    /// Always within `0..=total_duration_ms`
    pub remaining_ms: u64,
    pub is_running: bool,
    pub last_transition: Option<Transition>,
    pub last_transition_time: Option<DateTime<Utc>>,
    /// Number of runs that counted all the way down
    pub completed_runs: u64,
    /// Generation of the current run; ticks carrying an older id are ignored
    #[serde(skip)]
    pub(crate) run_id: u64,
}

impl TimerState {
    /// Create an idle timer state with everything zeroed
    pub fn new() -> Self {
        Self {
            selected_hour: 0,
            selected_minute: 0,
            selected_second: 0,
            total_duration_ms: 0,
            remaining_ms: 0,
            is_running: false,
            last_transition: None,
            last_transition_time: None,
            completed_runs: 0,
            run_id: 0,
        }
    }

    /// Store a clamped selection. Returns false and leaves the state untouched
    /// while a run is in progress.
    pub fn select(&mut self, hour: i64, minute: i64, second: i64) -> bool {
        if self.is_running {
            return false;
        }

        self.selected_hour = clamp(hour, MAX_HOUR);
        self.selected_minute = clamp(minute, MAX_MINUTE);
        self.selected_second = clamp(second, MAX_SECOND);
        true
    }

    /// Duration of the current selection in milliseconds
    pub fn selected_duration_ms(&self) -> u64 {
        let seconds = u64::from(self.selected_hour) * 3600
            + u64::from(self.selected_minute) * 60
            + u64::from(self.selected_second);
        seconds * 1000
    }

    /// Begin a run from the current selection.
    ///
    /// Returns the new run id, or `None` when already running or when the
    /// selection adds up to zero.
    pub fn begin_run(&mut self) -> Option<u64> {
        if self.is_running {
            return None;
        }

        let total = self.selected_duration_ms();
        if total == 0 {
            return None;
        }

        self.total_duration_ms = total;
        self.remaining_ms = total;
        self.is_running = true;
        self.run_id += 1;
        self.record(Transition::Started);
        Some(self.run_id)
    }

    /// Apply one decrement of `step_ms` on behalf of run `run_id`
    pub fn tick(&mut self, run_id: u64, step_ms: u64) -> TickOutcome {
        if !self.is_running || self.run_id != run_id {
            return TickOutcome::Stale;
        }

        self.remaining_ms = self.remaining_ms.saturating_sub(step_ms);
        if self.remaining_ms > 0 {
            return TickOutcome::Counting(self.remaining_ms);
        }

        self.is_running = false;
        self.completed_runs += 1;
        self.record(Transition::Completed);
        TickOutcome::Completed
    }

    /// Stop a running countdown, keeping the selection. Returns false if idle.
    pub fn cancel(&mut self) -> bool {
        if !self.is_running {
            return false;
        }

        self.is_running = false;
        self.remaining_ms = 0;
        self.run_id += 1;
        self.record(Transition::Cancelled);
        true
    }

    /// Return to the all-zero idle state, whatever the current state is
    pub fn reset(&mut self) {
        self.selected_hour = 0;
        self.selected_minute = 0;
        self.selected_second = 0;
        self.total_duration_ms = 0;
        self.remaining_ms = 0;
        self.is_running = false;
        self.run_id += 1;
        self.record(Transition::Reset);
    }

    /// Check if the timer is counting down
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Fraction of the run still remaining, 0.0 when nothing was started
    pub fn progress(&self) -> f32 {
        crate::utils::format::progress(self.remaining_ms, self.total_duration_ms)
    }

    fn record(&mut self, transition: Transition) {
        self.last_transition = Some(transition);
        self.last_transition_time = Some(Utc::now());
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp(value: i64, max: u32) -> u32 {
    // Fits in u32 after clamping to 0..=max
    value.clamp(0, i64::from(max)) as u32
}
