//! HTTP endpoint handlers
//!
//! Every POST is a user interaction, so it primes the audio output before
//! applying its command.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use tracing::{error, info, warn};

use super::responses::{
    ApiError, ApiResponse, DurationRequest, HealthResponse, ModeRequest, PresetsResponse,
    RoundsResponse, StatusResponse,
};
use crate::{
    flow::{Direction, RoundConfig},
    state::{AppState, Command, EngineSnapshot},
    timer::Side,
};

/// Standalone durations offered to the user, in minutes
pub const STANDARD_PRESETS: [u32; 5] = [3, 4, 5, 7, 10];

type CommandResult = Result<Json<ApiResponse>, ApiError>;
type RoundsResult = Result<Json<RoundsResponse>, ApiError>;

fn apply(
    state: &Arc<AppState>,
    command: Command,
    message: &str,
) -> Result<EngineSnapshot, ApiError> {
    state.audio.prime();
    let action = command.name();
    match state.dispatch(command) {
        Ok(snapshot) => {
            info!("{}: {}", action, message);
            Ok(snapshot)
        }
        Err(e) => {
            warn!("Command {} rejected: {}", action, e);
            Err(e.into())
        }
    }
}

fn run(state: &Arc<AppState>, command: Command, message: &str) -> CommandResult {
    let snapshot = apply(state, command, message)?;
    Ok(Json(ApiResponse::ok(message.to_string(), snapshot)))
}

fn rounds_view(state: &AppState) -> RoundsResult {
    let response = state.with_engine(|engine| {
        let sequencer = engine.sequencer();
        RoundsResponse {
            rounds: sequencer.rounds().to_vec(),
            current_index: sequencer.current_index(),
            session_active: sequencer.is_session_active(),
        }
    })?;
    Ok(Json(response))
}

fn parse_side(side: &str) -> Result<Side, ApiError> {
    Side::parse(side).ok_or_else(|| ApiError::bad_request(format!("Unknown side: {}", side)))
}

/// Handle POST /mode - Switch the standalone timer between standard and chess
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ModeRequest>, JsonRejection>,
) -> CommandResult {
    let Json(request) = payload?;
    run(&state, Command::SelectMode(request.mode), "Timer mode selected")
}

/// Handle POST /standard/toggle - Start or pause the standard timer
pub async fn standard_toggle_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    run(&state, Command::StandardToggle, "Standard timer toggled")
}

/// Handle POST /standard/reset
pub async fn standard_reset_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    run(&state, Command::StandardReset, "Standard timer reset")
}

/// Handle POST /standard/duration - Re-time the standalone standard timer
pub async fn standard_duration_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DurationRequest>, JsonRejection>,
) -> CommandResult {
    let Json(request) = payload?;
    run(
        &state,
        Command::StandardSetDuration(request.minutes),
        "Standard timer duration set",
    )
}

/// Handle POST /chess/tap/:side - A speaker ends their turn (or starts the clock)
pub async fn chess_tap_handler(
    State(state): State<Arc<AppState>>,
    Path(side): Path<String>,
) -> CommandResult {
    let side = parse_side(&side)?;
    run(&state, Command::ChessTap(side), "Chess clock tapped")
}

/// Handle POST /chess/pause - Moderator pause/resume
pub async fn chess_pause_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    run(&state, Command::ChessPause, "Chess clock paused or resumed")
}

/// Handle POST /chess/reset
pub async fn chess_reset_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    run(&state, Command::ChessReset, "Chess clock reset")
}

/// Handle GET /rounds
pub async fn list_rounds_handler(State(state): State<Arc<AppState>>) -> RoundsResult {
    rounds_view(&state)
}

/// Handle POST /rounds - Append a round
pub async fn append_round_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RoundConfig>, JsonRejection>,
) -> RoundsResult {
    let Json(config) = payload?;
    let round = config.into_round()?;
    apply(&state, Command::AppendRound(round), "Round appended")?;
    rounds_view(&state)
}

/// Handle PUT /rounds - Replace the whole round list
pub async fn replace_rounds_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Vec<RoundConfig>>, JsonRejection>,
) -> RoundsResult {
    let Json(configs) = payload?;
    let rounds = configs
        .into_iter()
        .map(RoundConfig::into_round)
        .collect::<Result<Vec<_>, _>>()?;
    apply(&state, Command::ReplaceRounds(rounds), "Round list replaced")?;
    rounds_view(&state)
}

/// Handle POST /rounds/template - Load the standard debate format
pub async fn template_handler(State(state): State<Arc<AppState>>) -> RoundsResult {
    apply(&state, Command::LoadTemplate, "Standard template loaded")?;
    rounds_view(&state)
}

/// Handle DELETE /rounds/:id
pub async fn remove_round_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> RoundsResult {
    apply(&state, Command::RemoveRound(id), "Round removed")?;
    rounds_view(&state)
}

/// Handle POST /rounds/:id/up
pub async fn move_round_up_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> RoundsResult {
    apply(&state, Command::MoveRound(id, Direction::Up), "Round moved up")?;
    rounds_view(&state)
}

/// Handle POST /rounds/:id/down
pub async fn move_round_down_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> RoundsResult {
    apply(&state, Command::MoveRound(id, Direction::Down), "Round moved down")?;
    rounds_view(&state)
}

/// Handle POST /flow/start - Begin the round session at the first round
pub async fn flow_start_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    run(&state, Command::StartSession, "Round session started")
}

/// Handle POST /flow/next
pub async fn flow_next_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    run(&state, Command::NextRound, "Moved to next round")
}

/// Handle POST /flow/prev
pub async fn flow_prev_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    run(&state, Command::PreviousRound, "Moved to previous round")
}

/// Handle GET /presets
pub async fn presets_handler() -> Json<PresetsResponse> {
    Json(PresetsResponse {
        standard_minutes: STANDARD_PRESETS.to_vec(),
    })
}

/// Handle GET /status - Return the live snapshot and server metadata
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let snapshot = state.snapshot().map_err(|e| {
        error!("Failed to get engine snapshot: {}", e);
        ApiError::from(e)
    })?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        snapshot,
        ticking: state.is_ticking(),
        audio_unlocked: state.audio.is_unlocked(),
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
