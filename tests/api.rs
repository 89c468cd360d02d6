use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use futures::{Stream, StreamExt};
use serde_json::{json, Value};
use tower::ServiceExt;

use debate_timer::{
    audio::AudioEmitter,
    create_router,
    state::{AppState, TimerDefaults, TimerEvent},
    timer::{Alert, Side},
};

fn app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(
        0,
        "127.0.0.1".to_string(),
        TimerDefaults::default(),
        AudioEmitter::muted(),
    ));
    (create_router(Arc::clone(&state)), state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::POST, uri, None).await
}

async fn set_duration(app: &Router, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, "/standard/duration", Some(body)).await
}

async fn next_frame<S, E>(body: &mut S) -> String
where
    S: Stream<Item = Result<axum::body::Bytes, E>> + Unpin,
    E: std::fmt::Debug,
{
    let chunk = tokio::time::timeout(Duration::from_secs(1), body.next())
        .await
        .expect("no SSE frame within a second")
        .expect("SSE stream ended")
        .unwrap();
    String::from_utf8(chunk.to_vec()).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn status_starts_with_standalone_standard_timer() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    let snapshot = &body["snapshot"];
    assert_eq!(snapshot["mode"], "standalone");
    assert_eq!(snapshot["timer"]["kind"], "standard");
    assert_eq!(snapshot["timer"]["display"], "04:00");
    assert_eq!(snapshot["timer"]["run_state"], "stopped");
    assert_eq!(snapshot["timer"]["duration_adjustable"], true);
    assert_eq!(body["ticking"], false);
}

#[tokio::test]
async fn control_requests_unlock_audio() {
    let (app, state) = app();
    post(&app, "/standard/reset").await;
    // The muted worker unlocks asynchronously
    for _ in 0..50 {
        if state.audio.is_unlocked() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(state.audio.is_unlocked());
}

#[tokio::test]
async fn set_duration_in_standalone_mode() {
    let (app, _) = app();
    post(&app, "/standard/toggle").await;
    let (status, body) = set_duration(&app, json!({"minutes": 5})).await;
    assert_eq!(status, StatusCode::OK);
    let timer = &body["snapshot"]["timer"];
    assert_eq!(timer["duration_ms"], 300_000);
    assert_eq!(timer["remaining_ms"], 300_000);
    assert_eq!(timer["run_state"], "stopped");
}

#[tokio::test]
async fn invalid_duration_is_rejected() {
    let (app, _) = app();
    let (status, body) = set_duration(&app, json!({"minutes": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn malformed_bodies_get_json_errors() {
    let (app, _) = app();
    let (status, body) = set_duration(&app, json!({"minutes": "five"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, body) = send(&app, Method::POST, "/mode", Some(json!({"mode": "sprint"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, body) = send(&app, Method::PUT, "/rounds", Some(json!({"rounds": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn chess_commands_need_the_chess_timer() {
    let (app, _) = app();
    let (status, _) = post(&app, "/chess/pause").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::POST, "/mode", Some(json!({"mode": "chess"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(&app, "/chess/tap/a").await;
    assert_eq!(status, StatusCode::OK);
    let timer = &body["snapshot"]["timer"];
    assert_eq!(timer["kind"], "chess");
    assert_eq!(timer["status"]["state"], "running");
    assert_eq!(timer["status"]["side"], "A");
    assert_eq!(timer["side_a"]["active"], true);

    let (status, body) = post(&app, "/chess/tap/b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["timer"]["status"]["side"], "A");

    let (status, body) = post(&app, "/chess/pause").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["timer"]["status"]["state"], "paused");

    let (status, _) = post(&app, "/chess/tap/c").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn round_list_editing() {
    let (app, _) = app();
    let (status, body) = post(&app, "/rounds/template").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rounds"].as_array().unwrap().len(), 5);
    assert_eq!(body["session_active"], false);

    let (status, body) = send(
        &app,
        Method::POST,
        "/rounds",
        Some(json!({
            "title": "Cross Examination",
            "type": "NORMAL",
            "durationMinutes": 2,
            "speaker": "B"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rounds = body["rounds"].as_array().unwrap();
    assert_eq!(rounds.len(), 6);
    assert_eq!(rounds[5]["speaker"], "B");

    let (status, body) = post(&app, "/rounds/1/down").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rounds"][0]["id"], "2");
    assert_eq!(body["rounds"][1]["id"], "1");

    let (status, body) = send(&app, Method::DELETE, "/rounds/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rounds"].as_array().unwrap().len(), 5);

    let (status, _) = send(&app, Method::DELETE, "/rounds/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        "/rounds",
        Some(json!({"title": "Bad", "type": "CHESS", "durationMinutes": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn flow_navigation_clamps_at_the_ends() {
    let (app, _) = app();
    let (status, _) = post(&app, "/flow/start").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let rounds = json!([
        {"id": "a", "title": "Opening", "type": "NORMAL", "durationMinutes": 4, "speaker": "A"},
        {"id": "b", "title": "Free Debate", "type": "CHESS", "durationMinutes": 3},
        {"id": "c", "title": "Closing", "type": "NORMAL", "durationMinutes": 2, "speaker": "B"}
    ]);
    let (status, _) = send(&app, Method::PUT, "/rounds", Some(rounds)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = post(&app, "/flow/start").await;
    assert_eq!(body["snapshot"]["mode"], "sequenced");
    assert_eq!(body["snapshot"]["round"]["index"], 0);
    assert_eq!(body["snapshot"]["timer"]["speaker"], "A");
    assert_eq!(body["snapshot"]["timer"]["duration_adjustable"], false);

    let (status, _) = set_duration(&app, json!({"minutes": 5})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = post(&app, "/flow/next").await;
    assert_eq!(body["snapshot"]["timer"]["kind"], "chess");
    assert_eq!(body["snapshot"]["timer"]["per_side_ms"], 180_000);

    post(&app, "/flow/next").await;
    let (status, body) = post(&app, "/flow/next").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["round"]["index"], 2);
    assert_eq!(body["snapshot"]["round"]["has_next"], false);
    assert_eq!(body["snapshot"]["timer"]["display"], "02:00");

    let (status, _) = send(&app, Method::POST, "/mode", Some(json!({"mode": "chess"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, Method::GET, "/rounds", None).await;
    assert_eq!(body["current_index"], 2);
    assert_eq!(body["session_active"], true);
}

#[tokio::test]
async fn presets_match_standalone_choices() {
    let (app, _) = app();
    let (_, body) = send(&app, Method::GET, "/presets", None).await;
    assert_eq!(body["standard_minutes"], json!([3, 4, 5, 7, 10]));
}

#[tokio::test]
async fn event_stream_sends_snapshots_and_alerts() {
    let (app, state) = app();
    let request = Request::builder().uri("/events").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/event-stream");
    let mut body = response.into_body().into_data_stream();

    let frame = next_frame(&mut body).await;
    assert!(frame.contains("event: snapshot"), "{}", frame);
    assert!(frame.contains(r#""display":"04:00""#), "{}", frame);

    state
        .event_tx
        .send(TimerEvent::alert(Alert::Warning, Some(Side::B)))
        .unwrap();
    let frame = next_frame(&mut body).await;
    assert!(frame.contains("event: alert"), "{}", frame);
    assert!(frame.contains(r#""alert":"warning""#), "{}", frame);
    assert!(frame.contains(r#""side":"B""#), "{}", frame);

    set_duration(&app, json!({"minutes": 7})).await;
    let frame = next_frame(&mut body).await;
    assert!(frame.contains("event: snapshot"), "{}", frame);
    assert!(frame.contains(r#""display":"07:00""#), "{}", frame);
}
