//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use super::{
    cooking_session::{CookingSession, CookingStatus, StepTransition, TimerAction},
    timer_engine::TimerCompleted,
};
use crate::{recipe::Recipe, tasks::StepTicker};

/// Broadcast to subscribers when a step timer runs out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionNotice {
    pub step_number: usize,
    pub timer_index: usize,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningTimer {
    pub index: usize,
    pub remaining_seconds: u64,
}

/// Remaining seconds of every running timer, published on change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub step_number: usize,
    pub running: Vec<RunningTimer>,
}

impl TimerSnapshot {
    fn of(session: &CookingSession) -> Self {
        let engine = session.engine();
        Self {
            step_number: session.current_step_index() + 1,
            running: engine
                .active_indices()
                .into_iter()
                .filter_map(|index| {
                    engine.remaining(index).map(|remaining_seconds| RunningTimer {
                        index,
                        remaining_seconds,
                    })
                })
                .collect(),
        }
    }
}

/// Shared state behind the HTTP handlers and the step ticker
#[derive(Debug)]
pub struct AppState {
    /// The cooking session for the loaded recipe
    pub session: Arc<Mutex<CookingSession>>,
    /// Host clock period, one simulated second per tick
    pub tick_period: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Timer completion notifications, streamed on `/events`
    pub completion_tx: broadcast::Sender<CompletionNotice>,
    /// Running timer countdowns, streamed on `/events`
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Periodic tick source, present while the step screen is mounted
    ticker: Mutex<Option<StepTicker>>,
}

impl AppState {
    pub fn new(recipe: Recipe, port: u16, host: String, tick_period: Duration) -> Self {
        let (completion_tx, _) = broadcast::channel(100);
        let (timer_update_tx, _) = watch::channel(TimerSnapshot::default());

        Self {
            session: Arc::new(Mutex::new(CookingSession::new(recipe))),
            tick_period,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            completion_tx,
            timer_update_tx,
            ticker: Mutex::new(None),
        }
    }

    /// Lock the session, apply `action` and record it as the last action
    fn with_session<T, F>(&self, action: &str, f: F) -> Result<(T, CookingStatus), String>
    where
        F: FnOnce(&mut CookingSession) -> T,
    {
        let mut session = self.session.lock()
            .map_err(|e| format!("Failed to lock cooking session: {}", e))?;

        let outcome = f(&mut *session);
        let status = session.status();
        let snapshot = TimerSnapshot::of(&session);
        drop(session); // Release the lock early

        self.record_action(action);
        self.publish_snapshot(snapshot);

        Ok((outcome, status))
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn publish_snapshot(&self, snapshot: TimerSnapshot) {
        self.timer_update_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    pub fn toggle_timer(&self, index: usize) -> Result<(TimerAction, CookingStatus), String> {
        let result = self.with_session(&format!("toggle-timer-{}", index), |s| s.toggle_timer(index))?;
        info!("Toggle timer {}: {:?}", index, result.0);
        Ok(result)
    }

    pub fn start_timer(&self, index: usize) -> Result<(TimerAction, CookingStatus), String> {
        let result = self.with_session(&format!("start-timer-{}", index), |s| s.start_timer(index))?;
        info!("Start timer {}: {:?}", index, result.0);
        Ok(result)
    }

    pub fn stop_timer(&self, index: usize) -> Result<(TimerAction, CookingStatus), String> {
        let result = self.with_session(&format!("stop-timer-{}", index), |s| s.stop_timer(index))?;
        info!("Stop timer {}: {:?}", index, result.0);
        Ok(result)
    }

    /// Next step, unmounting the step screen when cooking is finished
    pub fn next_step(&self) -> Result<(StepTransition, CookingStatus), String> {
        let result = self.with_session("next-step", |s| s.next_step())?;
        if result.0 == StepTransition::Finished {
            self.unmount_step_screen();
        }
        Ok(result)
    }

    /// Previous step, unmounting the step screen when leaving from the first step
    pub fn previous_step(&self) -> Result<(StepTransition, CookingStatus), String> {
        let result = self.with_session("previous-step", |s| s.previous_step())?;
        if result.0 == StepTransition::Exited {
            self.unmount_step_screen();
        }
        Ok(result)
    }

    pub fn exit_cooking(&self) -> Result<(StepTransition, CookingStatus), String> {
        let result = self.with_session("exit", |s| s.exit())?;
        self.unmount_step_screen();
        Ok(result)
    }

    /// Start the recipe over and mount a fresh step screen
    pub fn restart_cooking(self: &Arc<Self>) -> Result<CookingStatus, String> {
        let ((), status) = self.with_session("restart", |s| s.restart())?;
        self.mount_step_screen()?;
        Ok(status)
    }

    pub fn dismiss_alerts(&self) -> Result<(usize, CookingStatus), String> {
        self.with_session("dismiss-alerts", |s| s.dismiss_alerts())
    }

    /// Advance all running timers by one second and deliver completions
    pub fn tick_timers(&self) -> Result<bool, String> {
        let mut session = self.session.lock()
            .map_err(|e| format!("Failed to lock cooking session: {}", e))?;

        let mut completed = Vec::new();
        let changed = session.tick(&mut |event: TimerCompleted| completed.push(event));
        if !changed {
            return Ok(false);
        }

        let step_number = session.current_step_index() + 1;
        let notices: Vec<CompletionNotice> = completed
            .into_iter()
            .map(|event| CompletionNotice {
                step_number,
                timer_index: event.index,
                message: session.push_alert(event),
                timestamp: Utc::now(),
            })
            .collect();
        let snapshot = TimerSnapshot::of(&session);
        drop(session);

        for notice in notices {
            info!("{}", notice.message);
            // No subscribers is fine, the alert is already on the session
            let _ = self.completion_tx.send(notice);
        }
        self.publish_snapshot(snapshot);

        Ok(true)
    }

    /// Get the current cooking status
    pub fn get_status(&self) -> Result<CookingStatus, String> {
        self.session.lock()
            .map(|session| session.status())
            .map_err(|e| format!("Failed to lock cooking session: {}", e))
    }

    pub fn get_recipe(&self) -> Result<Recipe, String> {
        self.session.lock()
            .map(|session| session.recipe().clone())
            .map_err(|e| format!("Failed to lock cooking session: {}", e))
    }

    /// Acquire the periodic tick source for the step screen
    pub fn mount_step_screen(self: &Arc<Self>) -> Result<(), String> {
        let mut ticker = self.ticker.lock()
            .map_err(|e| format!("Failed to lock step ticker: {}", e))?;

        // Replacing an existing ticker drops it, which cancels its task
        *ticker = Some(StepTicker::spawn(Arc::downgrade(self), self.tick_period));
        info!("Step screen mounted, ticking every {:?}", self.tick_period);
        Ok(())
    }

    /// Release the tick source; safe to call when nothing is mounted
    pub fn unmount_step_screen(&self) {
        match self.ticker.lock() {
            Ok(mut ticker) => {
                if ticker.take().is_some() {
                    info!("Step screen unmounted, ticker cancelled");
                }
            }
            Err(e) => warn!("Failed to lock step ticker: {}", e),
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker
            .lock()
            .map(|ticker| ticker.as_ref().is_some_and(|t| !t.is_finished()))
            .unwrap_or(false)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Arc<AppState> {
        let recipe = Recipe::from_json(
            r#"{"title": "Eggs", "steps": [
                {"title": "Boil", "timers": [1, 2]},
                {"title": "Peel"}
            ]}"#,
        )
        .unwrap();
        Arc::new(AppState::new(recipe, 0, "127.0.0.1".to_string(), Duration::from_secs(1)))
    }

    #[test]
    fn completion_is_broadcast_and_alerted() {
        let state = state();
        let mut rx = state.completion_tx.subscribe();
        state.toggle_timer(0).unwrap();

        for _ in 0..59 {
            assert!(state.tick_timers().unwrap());
        }
        assert!(rx.try_recv().is_err());

        assert!(state.tick_timers().unwrap());
        let notice = rx.try_recv().unwrap();
        assert_eq!(notice.timer_index, 0);
        assert_eq!(notice.step_number, 1);

        let status = state.get_status().unwrap();
        assert_eq!(status.alerts, vec![notice.message]);
        assert!(!state.tick_timers().unwrap());
    }

    #[test]
    fn timer_snapshot_tracks_running_timers() {
        let state = state();
        let rx = state.timer_update_tx.subscribe();
        state.toggle_timer(1).unwrap();
        state.tick_timers().unwrap();
        assert_eq!(
            rx.borrow().running,
            vec![RunningTimer { index: 1, remaining_seconds: 119 }]
        );

        state.next_step().unwrap();
        assert!(rx.borrow().running.is_empty());
        assert_eq!(rx.borrow().step_number, 2);
    }

    #[test]
    fn actions_are_recorded() {
        let state = state();
        state.toggle_timer(0).unwrap();
        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("toggle-timer-0"));
        assert!(time.is_some());
    }

    #[test]
    fn uptime_is_formatted_in_seconds_at_start() {
        let state = state();
        assert!(state.get_uptime().ends_with('s'));
    }
}
