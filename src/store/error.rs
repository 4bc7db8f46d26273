//! Store error types.

use super::GameId;
use crate::games::tictactoe::MoveError;
use derive_more::{Display, Error};
use tracing::instrument;

/// Backend failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Database error: {} at {}:{}", message, file, line)]
pub struct DbError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a new database error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}

/// Failure of a store operation.
#[derive(Debug, Clone, Display)]
pub enum StoreError {
    /// No game with this id.
    #[display("Game not found: {}", _0)]
    NotFound(GameId),

    /// The engine refused the move; nothing was saved.
    #[display("{}", _0)]
    Rejected(MoveError),

    /// The backing store failed.
    #[display("{}", _0)]
    Database(DbError),
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::NotFound(_) => None,
            StoreError::Rejected(err) => Some(err),
            StoreError::Database(err) => Some(err),
        }
    }
}

impl From<MoveError> for StoreError {
    fn from(err: MoveError) -> Self {
        Self::Rejected(err)
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        Self::Database(err)
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::Database(DbError::from(err))
    }
}
