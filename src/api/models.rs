//! API Request and Response Models

use crate::{
    games::{FinalResult, GuessOutcome, Hint, SessionView},
    history::HistoryRecord,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// POST /api/game/start
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub player1: Option<String>,
    #[serde(default)]
    pub player2: Option<String>,
}

/// POST /api/game/guess; the value is validated by the engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuessRequest {
    #[serde(default)]
    pub guess: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub message: String,
    pub game_state: SessionView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessResponse {
    /// Display text for the hint
    pub result: String,
    pub hint: Hint,
    pub round_complete: bool,
    pub game_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub game_state: Option<SessionView>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub final_result: Option<FinalResult>,
}

impl From<GuessOutcome> for GuessResponse {
    fn from(outcome: GuessOutcome) -> Self {
        match outcome {
            GuessOutcome::InProgress {
                hint,
                round_complete,
                view,
            } => Self {
                result: hint.message().to_string(),
                hint,
                round_complete,
                game_complete: false,
                game_state: Some(view),
                final_result: None,
            },
            GuessOutcome::Finished { hint, result, .. } => Self {
                result: hint.message().to_string(),
                hint,
                round_complete: true,
                game_complete: true,
                game_state: None,
                final_result: Some(result),
            },
        }
    }
}

/// `{gameState}` while a match is live, `{message}` otherwise
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub game_state: Option<SessionView>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<HistoryRecord>,
    pub total_games: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearHistoryResponse {
    pub success: bool,
    pub message: String,
}

/// GET /api/mensaje, the greeting the browser client fetches on load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetingResponse {
    pub mensaje: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
