//! API request and response structures

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineError, FlowError, TimerError},
    flow::Round,
    state::{EngineSnapshot, TimerMode},
};

/// API response structure for timer and flow commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub snapshot: EngineSnapshot,
}

impl ApiResponse {
    pub fn ok(message: String, snapshot: EngineSnapshot) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            snapshot,
        }
    }
}

/// Status response with the live snapshot and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub snapshot: EngineSnapshot,
    pub ticking: bool,
    pub audio_unlocked: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// The round list and session cursor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundsResponse {
    pub rounds: Vec<Round>,
    pub current_index: Option<usize>,
    pub session_active: bool,
}

/// Duration presets offered for the standalone standard timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetsResponse {
    pub standard_minutes: Vec<u32>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeRequest {
    pub mode: TimerMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationRequest {
    pub minutes: i64,
}

/// Error body returned with every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A rejected request
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let status = match &err {
            EngineError::Flow(FlowError::InvalidRound(_)) => StatusCode::BAD_REQUEST,
            EngineError::Flow(FlowError::UnknownRound(_)) => StatusCode::NOT_FOUND,
            EngineError::Flow(FlowError::DuplicateRound(_) | FlowError::EmptySequence) => {
                StatusCode::CONFLICT
            }
            EngineError::Timer(TimerError::InvalidMinutes(_)) => StatusCode::BAD_REQUEST,
            EngineError::Timer(TimerError::DurationLocked)
            | EngineError::WrongTimer { .. }
            | EngineError::SessionActive => StatusCode::CONFLICT,
            EngineError::Poisoned(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        EngineError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.message,
            timestamp: Utc::now(),
        };
        (self.status, Json(body)).into_response()
    }
}
