//! Mapping of failures onto HTTP responses.

use super::wire::ErrorBody;
use crate::games::tictactoe::MoveError;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::Display;
use tracing::{error, instrument, warn};

/// Error returned by an HTTP handler.
#[derive(Debug, Clone, Display)]
pub enum ApiError {
    /// Unknown game id, or a path segment that is not an id.
    #[display("Game not found.")]
    NotFound,

    /// Request body could not be understood.
    #[display("Invalid request data: {}", _0)]
    MalformedRequest(String),

    /// The engine refused the move.
    #[display("{}", _0)]
    Move(MoveError),

    /// Store failure; the only server-side error.
    #[display("Internal server error")]
    Internal(String),
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Move(MoveError::CorruptState(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Move(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable snake_case kind reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound => "not_found",
            ApiError::MalformedRequest(_) => "malformed_request",
            ApiError::Move(err) => err.kind(),
            ApiError::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Rejected(err) => ApiError::Move(err),
            StoreError::Database(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<MoveError> for ApiError {
    fn from(err: MoveError) -> Self {
        ApiError::Move(err)
    }
}

impl IntoResponse for ApiError {
    #[instrument(skip(self), fields(kind = self.kind()))]
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(detail) => error!(%detail, "Request failed"),
            other if status.is_server_error() => error!(error = %other, "Request failed"),
            other => warn!(%status, error = %other, "Request rejected"),
        }

        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::Position;
    use crate::store::{DbError, GameId};

    #[test]
    fn test_client_errors_are_4xx() {
        let cases = [
            (ApiError::from(StoreError::NotFound(GameId::from(1))), 404),
            (ApiError::MalformedRequest("eof".to_string()), 400),
            (ApiError::from(MoveError::InvalidPosition("9".to_string())), 400),
            (ApiError::from(MoveError::CellOccupied(Position::Center)), 400),
            (ApiError::from(MoveError::GameOver), 400),
        ];
        for (err, status) in cases {
            assert_eq!(err.status().as_u16(), status, "{err:?}");
        }
    }

    #[test]
    fn test_database_errors_are_5xx() {
        let err = ApiError::from(StoreError::Database(DbError::new("disk full")));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind(), "internal");
        // Backend details stay out of the client message.
        assert!(!err.to_string().contains("disk full"));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(ApiError::from(MoveError::GameOver).kind(), "game_over");
        assert_eq!(
            ApiError::from(MoveError::CellOccupied(Position::TopLeft)).kind(),
            "cell_occupied"
        );
        assert_eq!(ApiError::NotFound.kind(), "not_found");
    }
}
