//! Recipe loading errors.

use thiserror::Error;

/// Errors that can occur while loading a recipe document
#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Failed to read recipe file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse recipe JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),
}

pub type Result<T, E = RecipeError> = std::result::Result<T, E>;
