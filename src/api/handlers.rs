//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{
    recipe::Recipe,
    state::{AppState, CookingStatus, StepTransition, TimerAction},
};
use super::responses::{ApiResponse, StatusResponse, HealthResponse};

fn timer_response(
    index: usize,
    result: Result<(TimerAction, CookingStatus), String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok((action, cooking)) => Ok(Json(ApiResponse::timer(index, action, cooking))),
        Err(e) => {
            error!("Failed to update timer {}: {}", index, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn step_response(
    result: Result<(StepTransition, CookingStatus), String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok((transition, cooking)) => {
            info!("Step request: {:?}", transition);
            Ok(Json(ApiResponse::step(transition, cooking)))
        }
        Err(e) => {
            error!("Failed to change step: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timers/:index/toggle - Start or stop a timer on the current step
pub async fn toggle_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<ApiResponse>, StatusCode> {
    timer_response(index, state.toggle_timer(index))
}

/// Handle POST /timers/:index/start
pub async fn start_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<ApiResponse>, StatusCode> {
    timer_response(index, state.start_timer(index))
}

/// Handle POST /timers/:index/stop
pub async fn stop_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<ApiResponse>, StatusCode> {
    timer_response(index, state.stop_timer(index))
}

/// Handle POST /step/next - Next step, or finish on the last one
pub async fn next_step_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    step_response(state.next_step())
}

/// Handle POST /step/back - Previous step, or leave on the first one
pub async fn previous_step_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    step_response(state.previous_step())
}

/// Handle POST /cooking/exit - Close cooking mode
pub async fn exit_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    step_response(state.exit_cooking())
}

/// Handle POST /cooking/restart - Cook the recipe again from step 1
pub async fn restart_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.restart_cooking() {
        Ok(cooking) => {
            info!("Restart endpoint called - cooking from step 1");
            Ok(Json(ApiResponse::new("restarted", "Cooking restarted".to_string(), cooking)))
        }
        Err(e) => {
            error!("Failed to restart cooking: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle DELETE /alerts - Dismiss timer completion alerts
pub async fn dismiss_alerts_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.dismiss_alerts() {
        Ok((count, cooking)) => Ok(Json(ApiResponse::new(
            "dismissed",
            format!("Dismissed {} alert(s)", count),
            cooking,
        ))),
        Err(e) => {
            error!("Failed to dismiss alerts: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /recipe - Return the recipe being cooked
pub async fn recipe_handler(State(state): State<Arc<AppState>>) -> Result<Json<Recipe>, StatusCode> {
    state.get_recipe().map(Json).map_err(|e| {
        error!("Failed to read recipe: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle GET /status - Return current cooking status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let cooking = match state.get_status() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get cooking status: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        cooking,
        ticker_active: state.is_ticking(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
