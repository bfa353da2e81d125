//! Cooking session: step navigation around the timer engine

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::timer_engine::{format_remaining, CompletionSink, StepTimerEngine, TimerCompleted};
use crate::recipe::{Calories, Recipe, RecipeStep};

/// Outcome of a timer request against the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Running,
    Stopped,
    /// Index outside the step's timer list, already in the requested state,
    /// or the session is no longer on a step screen
    Ignored,
}

/// Outcome of a step navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTransition {
    Advanced,
    Finished,
    Retreated,
    Exited,
    /// The session already left the step screen
    Ignored,
}

/// Presentation of a single timer button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerChip {
    pub index: usize,
    pub minutes: f64,
    pub running: bool,
    pub remaining_seconds: Option<u64>,
    pub label: String,
}

/// What the "Bon Appetit" view shows once cooking is finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSummary {
    pub title: String,
    pub image: Option<String>,
    pub calories: Option<Calories>,
}

/// Serializable view of the session, read once per render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookingStatus {
    pub recipe_title: String,
    pub step_number: usize,
    pub step_count: usize,
    pub progress_percent: f64,
    pub step_title: String,
    pub description: String,
    pub image: Option<String>,
    pub timers: Vec<TimerChip>,
    pub timers_running: bool,
    pub primary_action: String,
    pub alerts: Vec<String>,
    pub finished: bool,
    pub exited: bool,
    pub summary: Option<MealSummary>,
}

#[derive(Debug, Clone)]
pub struct CookingSession {
    recipe: Recipe,
    current_step: usize,
    finished: bool,
    exited: bool,
    alerts: Vec<String>,
    engine: StepTimerEngine,
}

impl CookingSession {
    pub fn new(recipe: Recipe) -> Self {
        Self {
            recipe,
            current_step: 0,
            finished: false,
            exited: false,
            alerts: Vec::new(),
            engine: StepTimerEngine::new(),
        }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn engine(&self) -> &StepTimerEngine {
        &self.engine
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step
    }

    pub fn current_step(&self) -> Option<&RecipeStep> {
        self.recipe.step(self.current_step)
    }

    pub fn step_count(&self) -> usize {
        self.recipe.steps.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_exited(&self) -> bool {
        self.exited
    }

    /// Whether the step screen is showing and timers may run
    pub fn is_on_step(&self) -> bool {
        !self.finished && !self.exited
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 >= self.step_count()
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    fn timer_minutes(&self, index: usize) -> Option<f64> {
        if !self.is_on_step() {
            return None;
        }
        self.current_step().and_then(|step| step.timer_minutes(index))
    }

    pub fn toggle_timer(&mut self, index: usize) -> TimerAction {
        let Some(minutes) = self.timer_minutes(index) else {
            debug!("No timer {} on step {}", index, self.current_step + 1);
            return TimerAction::Ignored;
        };
        if self.engine.is_running(index) {
            self.engine.stop(index);
            TimerAction::Stopped
        } else if self.engine.start(index, minutes) {
            TimerAction::Running
        } else {
            TimerAction::Ignored
        }
    }

    pub fn start_timer(&mut self, index: usize) -> TimerAction {
        match self.timer_minutes(index) {
            Some(minutes) if self.engine.start(index, minutes) => TimerAction::Running,
            _ => TimerAction::Ignored,
        }
    }

    pub fn stop_timer(&mut self, index: usize) -> TimerAction {
        if self.timer_minutes(index).is_some() && self.engine.stop(index) {
            TimerAction::Stopped
        } else {
            TimerAction::Ignored
        }
    }

    /// Advance one second. Returns whether any timer changed.
    pub fn tick<S>(&mut self, sink: &mut S) -> bool
    where
        S: CompletionSink + ?Sized,
    {
        if !self.is_on_step() {
            return false;
        }
        self.engine.tick(sink)
    }

    /// Record a completion so the next render can surface it
    pub fn push_alert(&mut self, event: TimerCompleted) -> String {
        let alert = match self.current_step().and_then(|s| s.timer_minutes(event.index)) {
            Some(minutes) => format!(
                "{} min timer on step {} is done",
                minutes,
                self.current_step + 1
            ),
            None => format!("Timer {} on step {} is done", event.index + 1, self.current_step + 1),
        };
        self.alerts.push(alert.clone());
        alert
    }

    pub fn dismiss_alerts(&mut self) -> usize {
        let count = self.alerts.len();
        self.alerts.clear();
        count
    }

    fn leave_step(&mut self) {
        self.engine.reset();
        self.alerts.clear();
    }

    /// "Next Step", or "Finish Cooking" on the last step
    pub fn next_step(&mut self) -> StepTransition {
        if !self.is_on_step() {
            return StepTransition::Ignored;
        }
        self.leave_step();
        if self.is_last_step() {
            self.finished = true;
            info!("Finished cooking '{}'", self.recipe.title);
            StepTransition::Finished
        } else {
            self.current_step += 1;
            info!("Advanced to step {} of {}", self.current_step + 1, self.step_count());
            StepTransition::Advanced
        }
    }

    /// Back arrow: previous step, or leave cooking mode from the first step
    pub fn previous_step(&mut self) -> StepTransition {
        if !self.is_on_step() {
            return StepTransition::Ignored;
        }
        if self.current_step == 0 {
            return self.exit();
        }
        self.leave_step();
        self.current_step -= 1;
        info!("Back to step {} of {}", self.current_step + 1, self.step_count());
        StepTransition::Retreated
    }

    /// Close button
    pub fn exit(&mut self) -> StepTransition {
        if self.exited {
            return StepTransition::Ignored;
        }
        self.leave_step();
        self.exited = true;
        info!("Left cooking mode for '{}'", self.recipe.title);
        StepTransition::Exited
    }

    /// Start again from the first step with no timers running
    pub fn restart(&mut self) {
        self.current_step = 0;
        self.finished = false;
        self.exited = false;
        self.alerts.clear();
        self.engine = StepTimerEngine::new();
        info!("Restarted cooking '{}'", self.recipe.title);
    }

    pub fn timer_chips(&self) -> Vec<TimerChip> {
        let Some(step) = self.current_step() else {
            return Vec::new();
        };
        step.timers
            .iter()
            .enumerate()
            .map(|(index, &minutes)| {
                let remaining_seconds = self.engine.remaining(index);
                let label = match remaining_seconds {
                    Some(seconds) => format_remaining(seconds),
                    None => format!("Start {} Min", minutes),
                };
                TimerChip {
                    index,
                    minutes,
                    running: remaining_seconds.is_some(),
                    remaining_seconds,
                    label,
                }
            })
            .collect()
    }

    /// Recipes are validated to have at least one step
    pub fn progress_percent(&self) -> f64 {
        (self.current_step + 1) as f64 / self.step_count() as f64 * 100.0
    }

    pub fn status(&self) -> CookingStatus {
        let step = self.current_step();
        let summary = self.finished.then(|| MealSummary {
            title: self.recipe.title.clone(),
            image: self.recipe.image.clone(),
            calories: self.recipe.calories.clone(),
        });

        CookingStatus {
            recipe_title: self.recipe.title.clone(),
            step_number: self.current_step + 1,
            step_count: self.step_count(),
            progress_percent: self.progress_percent(),
            step_title: step
                .map(|s| s.display_title(self.current_step))
                .unwrap_or_default(),
            description: step.map(|s| s.description.clone()).unwrap_or_default(),
            image: step.and_then(|s| s.image.clone()),
            timers: self.timer_chips(),
            timers_running: !self.engine.is_idle(),
            primary_action: if self.is_last_step() {
                "Finish Cooking".to_string()
            } else {
                "Next Step".to_string()
            },
            alerts: self.alerts.clone(),
            finished: self.finished,
            exited: self.exited,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> CookingSession {
        let recipe = Recipe::from_json(
            r#"{
                "title": "Risotto",
                "image": "https://img.example/risotto.jpg",
                "calories": 610,
                "steps": [
                    {"title": "Toast rice", "description": "Toast the rice", "timers": [1, 3]},
                    {"description": "Add stock", "timers": [2]},
                    {"title": "Rest", "description": "Let it rest"}
                ]
            }"#,
        )
        .unwrap();
        CookingSession::new(recipe)
    }

    fn tick_n(session: &mut CookingSession, n: usize) -> Vec<usize> {
        let mut completed = Vec::new();
        for _ in 0..n {
            session.tick(&mut |event: TimerCompleted| completed.push(event.index));
        }
        completed
    }

    #[test]
    fn toggle_uses_step_durations() {
        let mut session = session();
        assert_eq!(session.toggle_timer(1), TimerAction::Running);
        assert_eq!(session.engine().remaining(1), Some(180));
        assert_eq!(session.toggle_timer(1), TimerAction::Stopped);
        assert!(!session.engine().is_running(1));
    }

    #[test]
    fn toggle_on_unstartable_timer_is_ignored() {
        // Built directly so the sub-second duration skips load-time filtering
        let recipe = Recipe {
            id: None,
            title: "Flash".to_string(),
            image: None,
            calories: None,
            steps: vec![RecipeStep {
                title: None,
                description: String::new(),
                image: None,
                timers: vec![0.001],
            }],
        };
        let mut session = CookingSession::new(recipe);

        assert_eq!(session.toggle_timer(0), TimerAction::Ignored);
        assert_eq!(session.toggle_timer(0), TimerAction::Ignored);
        let status = session.status();
        assert!(!status.timers[0].running);
        assert!(!status.timers_running);
    }

    #[test]
    fn status_reports_whether_any_timer_runs() {
        let mut session = session();
        assert!(!session.status().timers_running);
        session.toggle_timer(0);
        assert!(session.status().timers_running);
        session.next_step();
        assert!(!session.status().timers_running);
    }

    #[test]
    fn unknown_timer_index_is_ignored() {
        let mut session = session();
        assert_eq!(session.toggle_timer(5), TimerAction::Ignored);
        assert_eq!(session.start_timer(2), TimerAction::Ignored);
        assert_eq!(session.stop_timer(0), TimerAction::Ignored);
        assert!(session.engine().is_idle());
    }

    #[test]
    fn start_and_stop_are_not_toggles() {
        let mut session = session();
        assert_eq!(session.start_timer(0), TimerAction::Running);
        assert_eq!(session.start_timer(0), TimerAction::Ignored);
        assert_eq!(session.stop_timer(0), TimerAction::Stopped);
        assert_eq!(session.stop_timer(0), TimerAction::Ignored);
    }

    #[test]
    fn step_change_resets_running_timers() {
        let mut session = session();
        session.toggle_timer(0);
        session.toggle_timer(1);

        assert_eq!(session.next_step(), StepTransition::Advanced);
        assert!(session.engine().is_idle());
        assert!(session.timer_chips().iter().all(|chip| !chip.running));

        session.toggle_timer(0);
        assert_eq!(session.previous_step(), StepTransition::Retreated);
        assert!(session.engine().is_idle());
        assert_eq!(session.current_step_index(), 0);
    }

    #[test]
    fn finishing_on_last_step_shows_summary() {
        let mut session = session();
        session.next_step();
        assert_eq!(session.status().primary_action, "Next Step");
        session.next_step();
        assert_eq!(session.status().primary_action, "Finish Cooking");

        assert_eq!(session.next_step(), StepTransition::Finished);
        let status = session.status();
        assert!(status.finished);
        let summary = status.summary.unwrap();
        assert_eq!(summary.title, "Risotto");
        assert_eq!(summary.calories, Some(Calories::Count(610.0)));

        assert_eq!(session.next_step(), StepTransition::Ignored);
        assert_eq!(session.toggle_timer(0), TimerAction::Ignored);
    }

    #[test]
    fn back_from_first_step_exits() {
        let mut session = session();
        session.toggle_timer(0);
        assert_eq!(session.previous_step(), StepTransition::Exited);
        assert!(session.is_exited());
        assert!(session.engine().is_idle());
        assert_eq!(session.exit(), StepTransition::Ignored);
    }

    #[test]
    fn completed_timer_raises_alert_until_step_changes() {
        let mut session = session();
        session.toggle_timer(0);
        let completed = tick_n(&mut session, 60);
        assert_eq!(completed, vec![0]);

        let alert = session.push_alert(TimerCompleted { index: 0 });
        assert_eq!(alert, "1 min timer on step 1 is done");
        assert_eq!(session.status().alerts.len(), 1);

        session.next_step();
        assert!(session.alerts().is_empty());
    }

    #[test]
    fn chips_show_countdown_or_start_label() {
        let mut session = session();
        session.toggle_timer(1);
        tick_n(&mut session, 55);

        let chips = session.timer_chips();
        assert_eq!(chips[0].label, "Start 1 Min");
        assert!(!chips[0].running);
        assert_eq!(chips[1].label, "2:05");
        assert_eq!(chips[1].remaining_seconds, Some(125));
    }

    #[test]
    fn status_reports_progress_and_fallback_title() {
        let mut session = session();
        session.next_step();
        let status = session.status();
        assert_eq!(status.step_number, 2);
        assert_eq!(status.step_count, 3);
        assert_eq!(status.step_title, "Step 2");
        assert!((status.progress_percent - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn restart_returns_to_first_step() {
        let mut session = session();
        session.next_step();
        session.next_step();
        session.next_step();
        assert!(session.is_finished());

        session.restart();
        assert!(session.is_on_step());
        assert_eq!(session.current_step_index(), 0);
        assert_eq!(session.toggle_timer(0), TimerAction::Running);
    }

    #[test]
    fn ticks_are_ignored_off_the_step_screen() {
        let mut session = session();
        session.toggle_timer(0);
        session.exit();
        assert!(tick_n(&mut session, 120).is_empty());
    }
}
