//! Countdown background task

use std::{sync::{Arc, Weak}, time::Duration};
use tokio::{
    sync::oneshot,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    services::Alert,
    state::{countdown_timer::Shared, TickOutcome},
};

/// Background task that decrements the remaining time of run `run_id` once
/// per `tick`, until it reaches zero, the run is superseded, or `cancel_rx`
/// fires.
///
/// Decrements are fixed-size; elapsed wall-clock time is not re-measured.
/// On completion the alert fires once and the task ends only after any
/// work the alert handed back has finished.
pub(crate) async fn countdown_task(
    shared: Weak<Shared>,
    run_id: u64,
    tick: Duration,
    alert: Arc<dyn Alert>,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    debug!("Starting countdown task for run {}", run_id);

    let step_ms = u64::try_from(tick.as_millis()).unwrap_or(u64::MAX);
    let mut interval = interval_at(Instant::now() + tick, tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut completed = false;

    loop {
        tokio::select! {
            biased;

            // Fires on an explicit cancel and when the owner drops the sender
            _ = &mut cancel_rx => {
                debug!("Countdown task for run {} cancelled", run_id);
                break;
            }

            _ = interval.tick() => {
                let Some(shared) = shared.upgrade() else {
                    debug!("Timer dropped, ending countdown task for run {}", run_id);
                    break;
                };

                match shared.apply_tick(run_id, step_ms) {
                    TickOutcome::Counting(remaining_ms) => {
                        debug!("Run {}: {}ms remaining", run_id, remaining_ms);
                    }
                    TickOutcome::Completed => {
                        info!("Countdown finished");
                        completed = true;
                        break;
                    }
                    TickOutcome::Stale => {
                        debug!("Run {} is no longer current, ending countdown task", run_id);
                        break;
                    }
                }
            }
        }
    }

    if completed {
        if let Some(pending) = alert.alert() {
            if let Err(e) = pending.await {
                warn!("Completion alert did not finish: {}", e);
            }
        }
    }
}
