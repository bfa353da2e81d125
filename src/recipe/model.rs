//! Recipe document structures

use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::{RecipeError, Result};
use crate::state::minutes_to_seconds;

/// A step may declare at most this many timers
pub const MAX_TIMERS_PER_STEP: usize = 3;

/// Calorie figure as stored by the recipe form, either a number or free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Calories {
    Count(f64),
    Text(String),
}

impl fmt::Display for Calories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Calories::Count(count) => write!(f, "{}", count),
            Calories::Text(text) => f.write_str(text),
        }
    }
}

/// One ordered instruction within a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeStep {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Timer durations in minutes
    #[serde(default)]
    pub timers: Vec<f64>,
}

impl RecipeStep {
    /// Title to show for this step, falling back to its position
    pub fn display_title(&self, position: usize) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!("Step {}", position + 1),
        }
    }

    /// Duration in minutes of the timer at `index`
    pub fn timer_minutes(&self, index: usize) -> Option<f64> {
        self.timers.get(index).copied()
    }

    /// Drop durations that cannot form a countdown of at least one second
    fn discard_invalid_timers(&mut self) -> usize {
        let before = self.timers.len();
        self.timers.retain(|&minutes| minutes_to_seconds(minutes).is_some());
        before - self.timers.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default, alias = "cover_image")]
    pub image: Option<String>,
    #[serde(default, alias = "total_calories")]
    pub calories: Option<Calories>,
    pub steps: Vec<RecipeStep>,
}

impl Recipe {
    /// Load and validate a recipe document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading recipe from {}", path.display());
        let raw = fs::read_to_string(path)?;
        let recipe = Self::from_json(&raw)?;
        info!(
            "Loaded recipe '{}' with {} step(s) from {}",
            recipe.title,
            recipe.steps.len(),
            path.display()
        );
        Ok(recipe)
    }

    /// Parse, normalise and validate a recipe document
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut recipe: Recipe = serde_json::from_str(raw)?;
        recipe.normalize();
        recipe.validate()?;
        Ok(recipe)
    }

    pub fn step(&self, position: usize) -> Option<&RecipeStep> {
        self.steps.get(position)
    }

    fn normalize(&mut self) {
        self.title = self.title.trim().to_string();
        for (position, step) in self.steps.iter_mut().enumerate() {
            let dropped = step.discard_invalid_timers();
            if dropped > 0 {
                warn!("Discarded {} timer(s) shorter than a second on step {}", dropped, position + 1);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.title.is_empty() {
            return Err(RecipeError::InvalidRecipe("recipe has no title".to_string()));
        }
        if self.steps.is_empty() {
            return Err(RecipeError::InvalidRecipe(format!(
                "recipe '{}' has no steps",
                self.title
            )));
        }
        for (position, step) in self.steps.iter().enumerate() {
            if step.timers.len() > MAX_TIMERS_PER_STEP {
                return Err(RecipeError::InvalidRecipe(format!(
                    "step {} declares {} timers, at most {} allowed",
                    position + 1,
                    step.timers.len(),
                    MAX_TIMERS_PER_STEP
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PASTA: &str = r#"{
        "title": "Tomato Pasta",
        "cover_image": "https://img.example/pasta.jpg",
        "total_calories": 540,
        "ingredients": [{"name": "spaghetti", "grams": 200}],
        "steps": [
            {"step_number": 1, "title": "Boil", "description": "Boil the water", "timers": [10, 0, -2]},
            {"step_number": 2, "title": "", "description": "Make the sauce", "timers": [0.5, 3]},
            {"step_number": 3, "description": "Serve"}
        ]
    }"#;

    #[test]
    fn parses_form_payload_and_discards_invalid_timers() {
        let recipe = Recipe::from_json(PASTA).unwrap();
        assert_eq!(recipe.title, "Tomato Pasta");
        assert_eq!(recipe.image.as_deref(), Some("https://img.example/pasta.jpg"));
        assert_eq!(recipe.calories, Some(Calories::Count(540.0)));
        assert_eq!(recipe.steps.len(), 3);
        assert_eq!(recipe.steps[0].timers, vec![10.0]);
        assert_eq!(recipe.steps[1].timers, vec![0.5, 3.0]);
        assert!(recipe.steps[2].timers.is_empty());
    }

    #[test]
    fn sub_second_timers_are_dropped_at_load() {
        let recipe = Recipe::from_json(
            r#"{"title": "Toast", "steps": [{"timers": [0.001, 0.005, 0.02, 2]}]}"#,
        )
        .unwrap();
        // 0.02 min rounds to one second and is kept
        assert_eq!(recipe.steps[0].timers, vec![0.02, 2.0]);
    }

    #[test]
    fn step_title_falls_back_to_position() {
        let recipe = Recipe::from_json(PASTA).unwrap();
        assert_eq!(recipe.steps[0].display_title(0), "Boil");
        assert_eq!(recipe.steps[1].display_title(1), "Step 2");
        assert_eq!(recipe.steps[2].display_title(2), "Step 3");
    }

    #[test]
    fn calories_accept_text() {
        let recipe = Recipe::from_json(
            r#"{"title": "Salad", "calories": "320 kcal", "steps": [{"description": "Toss"}]}"#,
        )
        .unwrap();
        assert_eq!(recipe.calories.map(|c| c.to_string()).as_deref(), Some("320 kcal"));
    }

    #[test]
    fn rejects_recipe_without_steps() {
        let err = Recipe::from_json(r#"{"title": "Air", "steps": []}"#).unwrap_err();
        assert!(matches!(err, RecipeError::InvalidRecipe(_)));
    }

    #[test]
    fn rejects_blank_title() {
        let err = Recipe::from_json(r#"{"title": "  ", "steps": [{}]}"#).unwrap_err();
        assert!(matches!(err, RecipeError::InvalidRecipe(_)));
    }

    #[test]
    fn rejects_too_many_timers() {
        let err = Recipe::from_json(
            r#"{"title": "Stew", "steps": [{"timers": [1, 2, 3, 4]}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("at most 3"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Recipe::from_json("{ not json").unwrap_err();
        assert!(matches!(err, RecipeError::ParseError(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PASTA.as_bytes()).unwrap();
        let recipe = Recipe::load(file.path()).unwrap();
        assert_eq!(recipe.step(0).and_then(|s| s.timer_minutes(0)), Some(10.0));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Recipe::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, RecipeError::IoError(_)));
    }
}
