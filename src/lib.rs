//! Plan Eats cooking mode - recipe steps with per-step countdown timers
//! 
//! This library loads a recipe, walks through its steps and runs the timers
//! declared on the current step, exposing the session over HTTP.

pub mod config;
pub mod recipe;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use recipe::Recipe;
pub use state::{AppState, StepTimerEngine};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
