//! Step timer engine
//!
//! Owns the countdown timers of the step currently on screen. The engine has no
//! clock of its own: the host calls [`StepTimerEngine::tick`] once per second and
//! every call advances all running timers by exactly one second.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raised from within `tick()` when a running timer reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerCompleted {
    pub index: usize,
}

/// Receiver for completion events
///
/// Implementations must not call back into the engine.
pub trait CompletionSink {
    fn timer_completed(&mut self, event: TimerCompleted);
}

impl<F> CompletionSink for F
where
    F: FnMut(TimerCompleted),
{
    fn timer_completed(&mut self, event: TimerCompleted) {
        self(event)
    }
}

/// One running countdown, keyed by its position in the step's timer list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSlot {
    pub index: usize,
    pub duration_seconds: u64,
    pub remaining_seconds: u64,
}

impl TimerSlot {
    fn new(index: usize, duration_seconds: u64) -> Self {
        Self {
            index,
            duration_seconds,
            remaining_seconds: duration_seconds,
        }
    }
}

/// Set of running timers for a single recipe step
#[derive(Debug, Clone, Default)]
pub struct StepTimerEngine {
    slots: BTreeMap<usize, TimerSlot>,
}

impl StepTimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the timer at `index`.
    ///
    /// Returns `false` without touching state when the timer is already running
    /// or when the duration does not amount to at least one second.
    pub fn start(&mut self, index: usize, duration_minutes: f64) -> bool {
        if self.slots.contains_key(&index) {
            debug!("Timer {} already running, ignoring start", index);
            return false;
        }

        let Some(duration_seconds) = minutes_to_seconds(duration_minutes) else {
            debug!("Rejecting timer {} with duration {} min", index, duration_minutes);
            return false;
        };

        self.slots.insert(index, TimerSlot::new(index, duration_seconds));
        debug!("Timer {} started for {}s", index, duration_seconds);
        true
    }

    /// Remove the timer at `index` if it is running
    pub fn stop(&mut self, index: usize) -> bool {
        let removed = self.slots.remove(&index).is_some();
        if removed {
            debug!("Timer {} stopped", index);
        }
        removed
    }

    /// Stop the timer if running, otherwise start it. Returns the new running state.
    pub fn toggle(&mut self, index: usize, duration_minutes: f64) -> bool {
        if self.is_running(index) {
            self.stop(index);
            false
        } else {
            self.start(index, duration_minutes)
        }
    }

    /// Advance every running timer by one second.
    ///
    /// All slots are decremented first, then finished slots are reported to the
    /// sink in ascending index order and removed. Returns `false` when nothing was
    /// running, in which case no state was touched.
    pub fn tick<S>(&mut self, sink: &mut S) -> bool
    where
        S: CompletionSink + ?Sized,
    {
        if self.slots.is_empty() {
            return false;
        }

        let mut finished = Vec::new();
        for slot in self.slots.values_mut() {
            slot.remaining_seconds = slot.remaining_seconds.saturating_sub(1);
            if slot.remaining_seconds == 0 {
                finished.push(slot.index);
            }
        }

        for index in finished {
            sink.timer_completed(TimerCompleted { index });
            self.slots.remove(&index);
            debug!("Timer {} completed", index);
        }

        true
    }

    /// Drop every running timer
    pub fn reset(&mut self) {
        if !self.slots.is_empty() {
            debug!("Resetting {} running timer(s)", self.slots.len());
        }
        self.slots.clear();
    }

    pub fn is_running(&self, index: usize) -> bool {
        self.slots.contains_key(&index)
    }

    /// Seconds left on the timer at `index`, if it is running
    pub fn remaining(&self, index: usize) -> Option<u64> {
        self.slots.get(&index).map(|slot| slot.remaining_seconds)
    }

    pub fn slot(&self, index: usize) -> Option<&TimerSlot> {
        self.slots.get(&index)
    }

    pub fn active_indices(&self) -> Vec<usize> {
        self.slots.keys().copied().collect()
    }

    pub fn is_idle(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Render seconds as `M:SS`
pub fn format_remaining(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Whole seconds for a duration in minutes, `None` unless at least one second
pub fn minutes_to_seconds(minutes: f64) -> Option<u64> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return None;
    }
    let seconds = (minutes * 60.0).round();
    if seconds < 1.0 {
        return None;
    }
    Some(seconds as u64)
}
