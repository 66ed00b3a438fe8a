use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use countdown_timer::{format_hms, Alert, CountdownTimer, Transition};

#[derive(Default)]
struct CountingAlert(AtomicUsize);

impl Alert for CountingAlert {
    fn alert(&self) -> Option<tokio::task::JoinHandle<()>> {
        self.0.fetch_add(1, Ordering::SeqCst);
        None
    }
}

#[tokio::test(start_paused = true)]
async fn full_lifecycle() {
    let alert = Arc::new(CountingAlert::default());
    let timer = CountdownTimer::new(alert.clone());

    // Out-of-range selection is clamped
    let state = timer.select_time(150, 75, -1);
    assert_eq!((state.selected_hour, state.selected_minute, state.selected_second), (99, 59, 0));

    // Cancel part-way through a run
    timer.select_time(0, 0, 10);
    timer.start_timer();
    tokio::time::sleep(Duration::from_millis(4500)).await;
    assert_eq!(format_hms(timer.state().remaining_ms), "00:00:06");

    let cancelled = timer.cancel_timer();
    assert_eq!(cancelled.remaining_ms, 0);
    assert_eq!(cancelled.last_transition, Some(Transition::Cancelled));

    // Selection survives cancel, so the same run can start again and finish
    let restarted = timer.start_timer();
    assert_eq!(restarted.remaining_ms, 10_000);
    let done = timer.wait_until_idle().await;
    assert_eq!(done.last_transition, Some(Transition::Completed));
    assert_eq!(done.completed_runs, 1);
    assert_eq!(alert.0.load(Ordering::SeqCst), 1);

    // Reset clears everything
    let reset = timer.reset_timer();
    assert!(!reset.is_running);
    assert_eq!(reset.selected_second, 0);
    assert_eq!(reset.total_duration_ms, 0);
    assert_eq!(reset.remaining_ms, 0);
}

#[tokio::test(start_paused = true)]
async fn timers_are_independent() {
    let first = CountdownTimer::new(Arc::new(CountingAlert::default()));
    let second = CountdownTimer::new(Arc::new(CountingAlert::default()));

    first.select_time(0, 0, 2);
    second.select_time(0, 0, 5);
    first.start_timer();
    second.start_timer();

    first.cancel_timer();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(first.state().remaining_ms, 0);
    assert_eq!(second.state().remaining_ms, 4000);
    assert!(second.state().is_running);
}
