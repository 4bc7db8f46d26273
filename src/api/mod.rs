//! REST API over a [`GameStore`].
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | `POST` | `/games` | 201 with the new game |
//! | `GET` | `/games/{id}` | 200 with the game |
//! | `PUT` | `/games/{id}/move` | 200 with the updated game |
//! | `DELETE` | `/games/{id}` | 204 |
//!
//! Every failure is answered with an [`ErrorBody`].

mod error;
mod wire;

pub use error::ApiError;
pub use wire::{ErrorBody, GameView, MoveRequest};

use crate::games::tictactoe::{GameState, Position};
use crate::store::{GameId, GameStore, StoreError};
use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::{debug, info, instrument};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<dyn GameStore>,
}

/// Builds the game routes on top of `store`.
#[instrument(skip(store))]
pub fn router(store: Arc<dyn GameStore>) -> Router {
    Router::new()
        .route("/games", post(create_game))
        .route("/games/{id}", get(get_game).delete(delete_game))
        .route("/games/{id}/move", put(make_move))
        .layer(
            ServiceBuilder::new()
                .map_request(log_request)
                .map_response(log_response),
        )
        .with_state(AppState { store })
}

fn log_request(req: Request<Body>) -> Request<Body> {
    info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
    req
}

fn log_response(resp: Response) -> Response {
    debug!(status = %resp.status(), "Response sent");
    resp
}

/// Runs a blocking store call off the async executor.
async fn blocking<T, F>(call: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| ApiError::Internal(format!("Store task failed: {}", e)))?
        .map_err(ApiError::from)
}

fn parse_id(raw: &str) -> Result<GameId, ApiError> {
    raw.parse().map_err(|_| {
        debug!(raw, "Path segment is not a game id");
        ApiError::NotFound
    })
}

/// Reads the target position from a move request body.
///
/// Anything other than a JSON object is malformed; a missing, non-integer
/// or out-of-range `position` is an invalid position.
fn parse_move_body(body: &[u8]) -> Result<Position, ApiError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| ApiError::MalformedRequest(e.to_string()))?;
    let fields = value
        .as_object()
        .ok_or_else(|| ApiError::MalformedRequest("expected a JSON object".to_string()))?;
    let position = fields
        .get("position")
        .unwrap_or(&serde_json::Value::Null);
    Ok(Position::from_json(position)?)
}

#[instrument(skip(state))]
async fn create_game(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<GameView>), ApiError> {
    let store = state.store.clone();
    let record = blocking(move || store.create()).await?;
    info!(game_id = %record.id(), "New game started");
    Ok((StatusCode::CREATED, Json(GameView::from(&record))))
}

#[instrument(skip(state))]
async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let id = parse_id(&id)?;
    let store = state.store.clone();
    let record = blocking(move || store.load(id)).await?;
    Ok(Json(GameView::from(&record)))
}

#[instrument(skip(state, body), fields(body_len = body.len()))]
async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<GameView>, ApiError> {
    let id = parse_id(&id)?;

    // Unknown games are reported before the body is looked at.
    let store = state.store.clone();
    blocking(move || store.load(id)).await?;

    let position = parse_move_body(&body)?;
    let store = state.store.clone();
    let record = blocking(move || {
        store.update(id, &mut |game: &GameState| game.place(position))
    })
    .await?;

    info!(
        game_id = %id,
        %position,
        status = ?record.state().status(),
        "Move accepted"
    );
    Ok(Json(GameView::from(&record)))
}

#[instrument(skip(state))]
async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let store = state.store.clone();
    blocking(move || store.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::MoveError;

    #[test]
    fn test_parse_move_body() {
        assert_eq!(
            parse_move_body(br#"{"position": 4}"#).unwrap(),
            Position::Center
        );
    }

    #[test]
    fn test_parse_move_body_malformed() {
        for body in [&b""[..], b"{", b"[4]", b"4", b"\"position\""] {
            assert!(
                matches!(parse_move_body(body), Err(ApiError::MalformedRequest(_))),
                "{:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_parse_move_body_invalid_position() {
        for body in [
            &br#"{}"#[..],
            br#"{"position": null}"#,
            br#"{"position": "5"}"#,
            br#"{"position": -1}"#,
            br#"{"position": 9}"#,
            br#"{"position": 2.5}"#,
        ] {
            assert!(
                matches!(
                    parse_move_body(body),
                    Err(ApiError::Move(MoveError::InvalidPosition(_)))
                ),
                "{:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), GameId::from(12));
        assert!(matches!(parse_id("twelve"), Err(ApiError::NotFound)));
    }
}
