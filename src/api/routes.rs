//! Route Definitions

use super::handlers::*;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the API router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/mensaje", get(greeting_handler))
        // Game session
        .route("/api/game/start", post(start_game_handler))
        .route("/api/game/guess", post(guess_handler))
        .route("/api/game/status", get(status_handler))
        .route("/api/game/reset", post(reset_handler))
        // Match history
        .route(
            "/api/game/history",
            get(history_handler).delete(clear_history_handler),
        )
        .route("/api/history", get(history_handler))
        .with_state(state)
}
