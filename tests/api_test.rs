//! HTTP route tests driven through the router without a socket.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tictactoe_server::{GameStore, MemoryStore, router};
use tower::ServiceExt;

fn app() -> Router {
    let store: Arc<dyn GameStore> = Arc::new(MemoryStore::new());
    router(store)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(text) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(text.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("Valid request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Readable body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, value)
}

async fn create(app: &Router) -> i64 {
    let (status, body) = send(app, Method::POST, "/games", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("numeric id")
}

async fn play(app: &Router, id: i64, position: i64) -> (StatusCode, Value) {
    send(
        app,
        Method::PUT,
        &format!("/games/{id}/move"),
        Some(&json!({ "position": position }).to_string()),
    )
    .await
}

#[tokio::test]
async fn test_create_game() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/games", None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_i64());
    assert_eq!(body["board"], json!([null, null, null, null, null, null, null, null, null]));
    assert_eq!(body["current_player"], json!("X"));
    assert_eq!(body["winner"], Value::Null);
    assert_eq!(body["is_draw"], json!(false));
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_get_game() {
    let app = app();
    let id = create(&app).await;

    let (status, body) = send(&app, Method::GET, &format!("/games/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(id));
}

#[tokio::test]
async fn test_unknown_game_is_not_found() {
    let app = app();
    for uri in ["/games/999", "/games/abc", "/games/1.5"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["kind"], json!("not_found"));
        assert_eq!(body["error"], json!("Game not found."));
    }
}

#[tokio::test]
async fn test_move_updates_game() {
    let app = app();
    let id = create(&app).await;

    let (status, body) = play(&app, id, 0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["board"][0], json!("X"));
    assert_eq!(body["current_player"], json!("O"));

    let (_, fetched) = send(&app, Method::GET, &format!("/games/{id}"), None).await;
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_winning_game() {
    let app = app();
    let id = create(&app).await;
    for position in [0, 3, 1, 4] {
        assert_eq!(play(&app, id, position).await.0, StatusCode::OK);
    }

    let (status, body) = play(&app, id, 2).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["winner"], json!("X"));
    assert_eq!(body["current_player"], json!("X"));
    assert_eq!(body["is_draw"], json!(false));

    let (status, body) = play(&app, id, 8).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], json!("game_over"));
}

#[tokio::test]
async fn test_draw_game() {
    let app = app();
    let id = create(&app).await;
    let mut last = Value::Null;
    for position in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
        let (status, body) = play(&app, id, position).await;
        assert_eq!(status, StatusCode::OK);
        last = body;
    }
    assert_eq!(last["is_draw"], json!(true));
    assert_eq!(last["winner"], Value::Null);
}

#[tokio::test]
async fn test_occupied_cell_rejected() {
    let app = app();
    let id = create(&app).await;
    play(&app, id, 4).await;

    let (status, body) = play(&app, id, 4).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], json!("cell_occupied"));

    let (_, game) = send(&app, Method::GET, &format!("/games/{id}"), None).await;
    assert_eq!(game["current_player"], json!("O"));
}

#[tokio::test]
async fn test_invalid_positions_rejected() {
    let app = app();
    let id = create(&app).await;
    let uri = format!("/games/{id}/move");

    for body in [
        r#"{"position": 9}"#,
        r#"{"position": -1}"#,
        r#"{"position": "5"}"#,
        r#"{"position": 1.5}"#,
        r#"{}"#,
    ] {
        let (status, response) = send(&app, Method::PUT, &uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response["kind"], json!("invalid_position"), "{body}");
    }
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = app();
    let id = create(&app).await;
    let uri = format!("/games/{id}/move");

    for body in ["not json", "[4]", ""] {
        let (status, response) = send(&app, Method::PUT, &uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body:?}");
        assert_eq!(response["kind"], json!("malformed_request"), "{body:?}");
    }
}

#[tokio::test]
async fn test_move_on_unknown_game_is_not_found_before_body_check() {
    let app = app();
    let (status, body) = send(&app, Method::PUT, "/games/42/move", Some("not json")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], json!("not_found"));
}

#[tokio::test]
async fn test_delete_game() {
    let app = app();
    let id = create(&app).await;
    let uri = format!("/games/{id}");

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    assert_eq!(send(&app, Method::GET, &uri, None).await.0, StatusCode::NOT_FOUND);
    assert_eq!(send(&app, Method::DELETE, &uri, None).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_games_are_independent() {
    let app = app();
    let first = create(&app).await;
    let second = create(&app).await;
    assert_ne!(first, second);

    play(&app, first, 0).await;
    let (_, other) = send(&app, Method::GET, &format!("/games/{second}"), None).await;
    assert_eq!(other["board"][0], Value::Null);
    assert_eq!(other["current_player"], json!("X"));
}
