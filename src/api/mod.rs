//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;
pub mod sse;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/mode", post(mode_handler))
        .route("/standard/toggle", post(standard_toggle_handler))
        .route("/standard/reset", post(standard_reset_handler))
        .route("/standard/duration", post(standard_duration_handler))
        .route("/chess/tap/:side", post(chess_tap_handler))
        .route("/chess/pause", post(chess_pause_handler))
        .route("/chess/reset", post(chess_reset_handler))
        .route(
            "/rounds",
            get(list_rounds_handler)
                .post(append_round_handler)
                .put(replace_rounds_handler),
        )
        .route("/rounds/template", post(template_handler))
        .route("/rounds/:id", delete(remove_round_handler))
        .route("/rounds/:id/up", post(move_round_up_handler))
        .route("/rounds/:id/down", post(move_round_down_handler))
        .route("/flow/start", post(flow_start_handler))
        .route("/flow/next", post(flow_next_handler))
        .route("/flow/prev", post(flow_prev_handler))
        .route("/presets", get(presets_handler))
        .route("/events", get(sse::event_stream))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
