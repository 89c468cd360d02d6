//! Server-Sent Events stream for display clients
//!
//! Clients receive the latest snapshot on connect, a fresh one after every
//! change, and an `alert` event whenever an alert fires.

use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use tokio_stream::wrappers::{BroadcastStream, WatchStream};
use tracing::{debug, warn};

use crate::state::{AppState, TimerEvent};

/// GET /events - SSE event stream
pub async fn event_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("New SSE client connected");

    let snapshots = WatchStream::new(state.subscribe_snapshots())
        .map(|snapshot| TimerEvent::Snapshot { snapshot });

    let alerts = BroadcastStream::new(state.subscribe_events()).filter_map(|result| async move {
        match result {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("SSE alert stream error: {:?}", e);
                None
            }
        }
    });

    let stream = stream::select(snapshots, alerts).filter_map(|event| async move {
        match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(Event::default().event(event.event_type()).data(json))),
            Err(e) => {
                warn!("Failed to serialize event: {}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
