//! Typed HTTP client for the game API.

use crate::api::{ErrorBody, GameView, MoveRequest};
use crate::store::GameId;
use derive_more::Display;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

/// Failure talking to the game server.
#[derive(Debug, Display)]
pub enum ClientError {
    /// The request never got a response, or the body was unreadable.
    #[display("HTTP error: {}", _0)]
    Http(reqwest::Error),

    /// The server answered with an error status.
    #[display("Server returned {}: {}", status, message)]
    Server {
        /// HTTP status code.
        status: StatusCode,
        /// The server's `error` message.
        message: String,
        /// The server's error kind, when it sent one.
        kind: Option<String>,
    },
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Http(err) => Some(err),
            ClientError::Server { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

/// Client for a running game server.
#[derive(Debug, Clone)]
pub struct GameClient {
    base_url: String,
    http: reqwest::Client,
}

impl GameClient {
    /// Creates a client for the server at `base_url` (e.g. `http://127.0.0.1:3000`).
    #[instrument(skip(base_url), fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Starts a new game.
    #[instrument(skip(self))]
    pub async fn new_game(&self) -> Result<GameView, ClientError> {
        let response = self
            .http
            .post(format!("{}/games", self.base_url))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Plays `position` for the game's current player.
    #[instrument(skip(self))]
    pub async fn make_move(&self, id: GameId, position: i64) -> Result<GameView, ClientError> {
        let response = self
            .http
            .put(format!("{}/games/{}/move", self.base_url, id))
            .json(&MoveRequest { position })
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Fetches a game.
    #[instrument(skip(self))]
    pub async fn get_game(&self, id: GameId) -> Result<GameView, ClientError> {
        let response = self
            .http
            .get(format!("{}/games/{}", self.base_url, id))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Deletes a game.
    #[instrument(skip(self))]
    pub async fn delete_game(&self, id: GameId) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(format!("{}/games/{}", self.base_url, id))
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        debug!(%status, "Server responded");
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        let (message, kind) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.error, Some(body.kind)),
            Err(_) => (text, None),
        };
        warn!(%status, %message, "Server rejected request");
        Err(ClientError::Server {
            status,
            message,
            kind,
        })
    }
}
