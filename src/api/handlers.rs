//! Request Handlers

use super::{errors::ApiError, middleware::RequestId, models::*};
use crate::services::GameService;
use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use std::sync::Arc;
use tracing::error;

/// Shared application state
pub struct AppState {
    pub service: Arc<GameService>,
}

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /api/mensaje
pub async fn greeting_handler() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        mensaje: "Hello from the guess duel backend 😎".to_string(),
    })
}

/// POST /api/game/start
pub async fn start_game_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<StartResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::invalid_json(&request_id, e))?;

    let view = state
        .service
        .start_game(
            body.player1.as_deref().unwrap_or_default(),
            body.player2.as_deref().unwrap_or_default(),
        )
        .await
        .map_err(|e| ApiError::game(&request_id, e))?;

    Ok(Json(StartResponse {
        message: "Game started".to_string(),
        game_state: view,
    }))
}

/// POST /api/game/guess
pub async fn guess_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GuessRequest>, JsonRejection>,
) -> Result<Json<GuessResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::invalid_json(&request_id, e))?;

    let outcome = state
        .service
        .submit_guess(body.guess.as_ref())
        .await
        .map_err(|e| ApiError::game(&request_id, e))?;

    Ok(Json(outcome.into()))
}

/// GET /api/game/status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let response = match state.service.status().await {
        Some(view) => StatusResponse {
            game_state: Some(view),
            message: None,
        },
        None => StatusResponse {
            game_state: None,
            message: Some("No active game".to_string()),
        },
    };

    Json(response)
}

/// POST /api/game/reset
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<MessageResponse> {
    state.service.reset().await;
    Json(MessageResponse {
        message: "Game reset".to_string(),
    })
}

/// GET /api/game/history and GET /api/history
pub async fn history_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let history = state.service.history().await.map_err(|e| {
        error!(request_id = %request_id.0, error = %e, "Failed to load match history");
        ApiError::from_duel(&request_id, e)
    })?;

    Ok(Json(HistoryResponse {
        success: true,
        total_games: history.len(),
        history,
    }))
}

/// DELETE /api/game/history
pub async fn clear_history_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearHistoryResponse>, ApiError> {
    state.service.clear_history().await.map_err(|e| {
        error!(request_id = %request_id.0, error = %e, "Failed to clear match history");
        ApiError::from_duel(&request_id, e)
    })?;

    Ok(Json(ClearHistoryResponse {
        success: true,
        message: "History cleared".to_string(),
    }))
}
