//! Recipe step source
//!
//! Loads the recipe document that cooking mode walks through. Recipes are
//! read-only input: the server never writes them back.

pub mod error;
pub mod model;

pub use error::RecipeError;
pub use model::{Calories, Recipe, RecipeStep, MAX_TIMERS_PER_STEP};
