//! Step screen ticker background task

use std::{sync::Weak, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Periodic clock for the step screen
///
/// Holds the running task; dropping the ticker cancels it.
#[derive(Debug)]
pub struct StepTicker {
    handle: JoinHandle<()>,
}

impl StepTicker {
    /// Spawn the ticker on the current tokio runtime
    pub fn spawn(state: Weak<AppState>, period: Duration) -> Self {
        let handle = tokio::spawn(step_ticker_task(state, period));
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for StepTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Call `tick_timers` once per period until cancelled or the state is gone
async fn step_ticker_task(state: Weak<AppState>, period: Duration) {
    info!("Starting step ticker task");

    // First tick lands one period after mount. Late ticks are not replayed:
    // a throttled host simply loses simulated seconds.
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let Some(state) = state.upgrade() else {
            debug!("Application state dropped, stopping step ticker");
            break;
        };

        if let Err(e) = state.tick_timers() {
            error!("Failed to advance step timers: {}", e);
        }
    }
}
