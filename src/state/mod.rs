//! State management module
//! 
//! The timer engine, the cooking session wrapped around it, and the shared
//! application state the HTTP layer and the ticker operate on.

pub mod timer_engine;
pub mod cooking_session;
pub mod app_state;

// Re-export main types
pub use timer_engine::{format_remaining, minutes_to_seconds, CompletionSink, StepTimerEngine, TimerCompleted, TimerSlot};
pub use cooking_session::{CookingSession, CookingStatus, MealSummary, StepTransition, TimerAction, TimerChip};
pub use app_state::{AppState, CompletionNotice, RunningTimer, TimerSnapshot};
