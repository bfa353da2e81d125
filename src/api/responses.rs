//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{CookingStatus, StepTransition, TimerAction};

/// API response structure for action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub cooking: CookingStatus,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, cooking: CookingStatus) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            cooking,
        }
    }

    /// Response for a timer request
    pub fn timer(index: usize, action: TimerAction, cooking: CookingStatus) -> Self {
        let (status, message) = match action {
            TimerAction::Running => ("running", format!("Timer {} running", index)),
            TimerAction::Stopped => ("stopped", format!("Timer {} stopped", index)),
            TimerAction::Ignored => ("ignored", format!("Timer {} unchanged", index)),
        };
        Self::new(status, message, cooking)
    }

    /// Response for a step navigation request
    pub fn step(transition: StepTransition, cooking: CookingStatus) -> Self {
        let (status, message) = match transition {
            StepTransition::Advanced => (
                "advanced",
                format!("Step {} of {}", cooking.step_number, cooking.step_count),
            ),
            StepTransition::Retreated => (
                "retreated",
                format!("Step {} of {}", cooking.step_number, cooking.step_count),
            ),
            StepTransition::Finished => ("finished", "Bon Appetit!".to_string()),
            StepTransition::Exited => ("exited", "Left cooking mode".to_string()),
            StepTransition::Ignored => ("ignored", "Not on a step screen".to_string()),
        };
        Self::new(status, message, cooking)
    }
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub cooking: CookingStatus,
    pub ticker_active: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
