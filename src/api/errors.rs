//! API Error Handling
//!
//! Every failure is a JSON body `{error, code, requestId}` with a 4xx/5xx status.

use super::middleware::RequestId;
use crate::errors::{DuelError, GameError};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error body returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Stable machine-readable code (NO_ACTIVE_GAME, INVALID_GUESS, ...)
    pub code: String,
    pub request_id: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub request_id: String,
}

#[derive(Debug)]
pub enum ApiErrorKind {
    BadRequest { code: &'static str, message: String },
    InternalError(String),
}

impl ApiError {
    pub fn bad_request(request_id: &RequestId, code: &'static str, message: String) -> Self {
        Self {
            kind: ApiErrorKind::BadRequest { code, message },
            request_id: request_id.0.clone(),
        }
    }

    pub fn internal_error(request_id: &RequestId, message: String) -> Self {
        Self {
            kind: ApiErrorKind::InternalError(message),
            request_id: request_id.0.clone(),
        }
    }

    pub fn game(request_id: &RequestId, error: GameError) -> Self {
        let code = match error {
            GameError::MissingPlayerName => "MISSING_PLAYER_NAME",
            GameError::InvalidGuess { .. } => "INVALID_GUESS",
            GameError::NoActiveGame => "NO_ACTIVE_GAME",
            GameError::NotPlaying => "NOT_PLAYING",
        };
        Self::bad_request(request_id, code, error.to_string())
    }

    /// Storage and configuration failures are server-side; game errors stay 400
    pub fn from_duel(request_id: &RequestId, error: DuelError) -> Self {
        match error {
            DuelError::Game(e) => Self::game(request_id, e),
            other => Self::internal_error(request_id, other.to_string()),
        }
    }

    pub fn invalid_json(request_id: &RequestId, rejection: JsonRejection) -> Self {
        Self::bad_request(
            request_id,
            "INVALID_JSON",
            format!("Invalid JSON body: {}", rejection.body_text()),
        )
    }

    pub fn status(&self) -> StatusCode {
        match self.kind {
            ApiErrorKind::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiErrorKind::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ApiErrorKind::BadRequest { message, .. } => {
                write!(f, "[{}] Bad Request: {}", self.request_id, message)
            }
            ApiErrorKind::InternalError(msg) => {
                write!(f, "[{}] Internal Error: {}", self.request_id, msg)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self.kind {
            ApiErrorKind::BadRequest { code, message } => (code, message),
            ApiErrorKind::InternalError(message) => ("INTERNAL_ERROR", message),
        };

        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
            request_id: self.request_id,
        });

        (status, body).into_response()
    }
}
