//! HTTP contract tests driving the full router (middleware included)

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use guess_duel::{
    api::create_app,
    config::{ApiConfig, GameConfig},
    games::{GameEngine, SystemClock},
    history::{HistoryStore, JsonFileHistoryStore, MemoryHistoryStore},
    services::GameService,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(store: Arc<dyn HistoryStore>, rounds: u32) -> Router {
    let game = GameConfig {
        rounds,
        seed: Some(7),
        ..Default::default()
    };
    let engine = GameEngine::new(game, Arc::new(SystemClock));
    let service = Arc::new(GameService::new(engine, store));
    create_app(service, &ApiConfig::default())
}

fn app() -> Router {
    app_with(Arc::new(MemoryHistoryStore::new(25)), 6)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn start(app: &Router) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/game/start",
        Some(json!({"player1": "Ana", "player2": "Beto"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

/// Win the current round by following the hints
async fn solve_round(app: &Router) -> Value {
    let (mut lo, mut hi) = (1, 100);
    loop {
        let mid = (lo + hi) / 2;
        let (status, body) = send(app, Method::POST, "/api/game/guess", Some(json!({"guess": mid}))).await;
        assert_eq!(status, StatusCode::OK, "unexpected response: {}", body);

        match body["hint"].as_str() {
            Some("correct") => return body,
            Some("higher") => lo = mid + 1,
            Some("lower") => hi = mid - 1,
            other => panic!("unexpected hint {:?}", other),
        }
        assert!(lo <= hi, "hints contradicted each other");
    }
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_greeting_answers_client_on_load() {
    let (status, body) = send(&app(), Method::GET, "/api/mensaje", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["mensaje"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn test_start_returns_fresh_session() {
    let app = app();
    let body = start(&app).await;

    assert!(body["message"].is_string());
    let state = &body["gameState"];
    let mut players: Vec<&str> = state["players"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    players.sort();
    assert_eq!(players, vec!["Ana", "Beto"]);
    assert_eq!(state["currentRound"], 1);
    assert_eq!(state["activePlayer"], 0);
    assert_eq!(state["activePlayerName"], state["players"][0]);
    assert_eq!(state["status"], "playing");
    assert_eq!(state["attempts"], json!([]));
    assert_eq!(state["currentScores"], json!([0, 0]));
}

#[tokio::test]
async fn test_start_requires_both_names() {
    let app = app();
    for body in [json!({"player1": "Ana"}), json!({"player1": "", "player2": "Beto"}), json!({})] {
        let (status, error) = send(&app, Method::POST, "/api/game/start", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "MISSING_PLAYER_NAME");
        assert!(error["error"].is_string());
        assert!(error["requestId"].is_string());
    }
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/game/guess")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-request-id", "trace-me")
        .body(Body::from(json!({"guess": 50}).to_string()))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["x-request-id"], "trace-me");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["requestId"], "trace-me");
    assert_eq!(body["code"], "NO_ACTIVE_GAME");
}

#[tokio::test]
async fn test_invalid_guesses_are_rejected_without_recording() {
    let app = app();
    start(&app).await;

    for body in [json!({"guess": 0}), json!({"guess": 101}), json!({"guess": "abc"}), json!({})] {
        let (status, error) = send(&app, Method::POST, "/api/game/guess", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "INVALID_GUESS");
    }

    let (_, status) = send(&app, Method::GET, "/api/game/status", None).await;
    assert_eq!(status["gameState"]["attempts"], json!([]));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/game/start")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ player1: "))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "INVALID_JSON");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_status_and_reset() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/game/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
    assert!(body.get("gameState").is_none());

    start(&app).await;
    let (_, body) = send(&app, Method::GET, "/api/game/status", None).await;
    let state = &body["gameState"];
    assert_eq!(state["currentTimes"], json!([0, 0]));
    assert!(state["currentRoundTime"].is_u64());
    assert!(state["currentRoundTimeFormatted"].is_string());
    assert_eq!(state["gameHistory"], json!([]));

    let (status, body) = send(&app, Method::POST, "/api/game/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (_, body) = send(&app, Method::GET, "/api/game/status", None).await;
    assert!(body.get("gameState").is_none());

    // Idempotent
    let (status, _) = send(&app, Method::POST, "/api/game/reset", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_round_win_flips_active_player() {
    let app = app();
    let started = start(&app).await;

    let body = solve_round(&app).await;
    assert_eq!(body["roundComplete"], true);
    assert_eq!(body["gameComplete"], false);
    assert!(body["result"].is_string());

    let state = &body["gameState"];
    assert_eq!(state["currentRound"], 2);
    assert_eq!(state["activePlayer"], 1);
    assert_eq!(state["activePlayerName"], started["gameState"]["players"][1]);
    assert_eq!(state["attempts"], json!([]));
}

#[tokio::test]
async fn test_full_match_is_recorded_in_history() {
    let app = app();
    start(&app).await;

    let mut last = Value::Null;
    for _ in 0..6 {
        last = solve_round(&app).await;
    }

    assert_eq!(last["gameComplete"], true);
    assert_eq!(last["roundComplete"], true);
    let result = &last["finalResult"];
    assert_eq!(result["status"], "finished");
    assert!(result["winner"].is_string());
    assert!(result["isExactTie"].is_boolean());
    assert_eq!(result["playersSummary"].as_array().unwrap().len(), 2);
    assert_eq!(result["playersSummary"][0]["roundsPlayed"].as_array().unwrap().len(), 3);

    // Session is gone after the last round
    let (status, error) = send(&app, Method::POST, "/api/game/guess", Some(json!({"guess": 50}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "NO_ACTIVE_GAME");

    for uri in ["/api/game/history", "/api/history"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["totalGames"], 1);
        assert_eq!(body["history"][0]["winner"], result["winner"]);
        assert!(body["history"][0]["date"].is_string());
        assert!(body["history"][0]["dateFormatted"].is_string());
    }

    let (status, body) = send(&app, Method::DELETE, "/api/game/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, body) = send(&app, Method::GET, "/api/game/history", None).await;
    assert_eq!(body["totalGames"], 0);
    assert_eq!(body["history"], json!([]));
}

#[tokio::test]
async fn test_corrupt_history_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    std::fs::write(&path, "not json at all").unwrap();
    let app = app_with(Arc::new(JsonFileHistoryStore::new(&path, 25)), 1);

    let (status, body) = send(&app, Method::GET, "/api/game/history", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_ERROR");

    // Gameplay still delivers the result when persisting fails
    start(&app).await;
    let last = solve_round(&app).await;
    assert_eq!(last["gameComplete"], true);
    assert!(last["finalResult"]["winner"].is_string());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json at all");
}

#[tokio::test]
async fn test_cors_preflight_allows_delete() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/game/history")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .to_string();
    assert!(methods.contains("DELETE"));
}
