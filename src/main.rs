//! Plan Eats cooking mode server
//!
//! This is the main entry point for the plan-eats application.

use std::{future::IntoFuture, sync::Arc};
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use plan_eats::{
    api::create_router,
    config::Config,
    recipe::Recipe,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("plan_eats={},tower_http=info", config.log_level()))
        .init();

    info!("Starting plan-eats cooking server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, recipe={}, tick={}ms",
          config.host, config.port, config.recipe.display(), config.tick_millis);

    let recipe = Recipe::load(&config.recipe)
        .with_context(|| format!("Failed to load recipe from {}", config.recipe.display()))?;

    // Create application state and mount the first step screen
    let state = Arc::new(AppState::new(
        recipe,
        config.port,
        config.host.clone(),
        config.tick_period(),
    ));
    state.mount_step_screen().map_err(anyhow::Error::msg)?;

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /recipe                - Recipe being cooked");
    info!("  GET    /status                - Current step, timers and alerts");
    info!("  GET    /events                - Live timer and completion events");
    info!("  POST   /timers/:index/toggle  - Start or stop a step timer");
    info!("  POST   /timers/:index/start   - Start a step timer");
    info!("  POST   /timers/:index/stop    - Stop a step timer");
    info!("  POST   /step/next             - Next step or finish cooking");
    info!("  POST   /step/back             - Previous step or leave");
    info!("  POST   /cooking/exit          - Leave cooking mode");
    info!("  POST   /cooking/restart       - Cook again from step 1");
    info!("  DELETE /alerts                - Dismiss timer alerts");
    info!("  GET    /health                - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app).into_future();

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.unmount_step_screen();
    info!("Server shutdown complete");
    Ok(())
}
