//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod events;
pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use events::events_handler;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/recipe", get(recipe_handler))
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/timers/:index/toggle", post(toggle_timer_handler))
        .route("/timers/:index/start", post(start_timer_handler))
        .route("/timers/:index/stop", post(stop_timer_handler))
        .route("/step/next", post(next_step_handler))
        .route("/step/back", post(previous_step_handler))
        .route("/cooking/exit", post(exit_handler))
        .route("/cooking/restart", post(restart_handler))
        .route("/alerts", delete(dismiss_alerts_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
