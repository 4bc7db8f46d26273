//! Persistence for game records.
//!
//! The engine only transforms [`GameState`] values. A [`GameStore`] owns
//! identity, creation time, and the serialization of concurrent moves
//! against the same game.

mod error;
mod memory;
mod models;
mod schema; // Diesel generated schema - internal use only
mod sqlite;

pub use error::{DbError, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::games::tictactoe::{GameState, MoveError};
use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Identifier of a stored game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct GameId(i64);

impl GameId {
    /// Raw numeric value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::str::FromStr for GameId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A game as the store keeps it: identity, metadata, and engine state.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct GameRecord {
    id: GameId,
    created_at: NaiveDateTime,
    state: GameState,
}

/// Storage contract for games.
///
/// Implementations serialize [`GameStore::update`] calls per game id so
/// the load, transition, save cycle is atomic from the caller's view.
pub trait GameStore: Send + Sync + std::fmt::Debug {
    /// Creates a new game with a fresh id and an empty board.
    fn create(&self) -> Result<GameRecord, StoreError>;

    /// Loads a game.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no game has this id.
    fn load(&self, id: GameId) -> Result<GameRecord, StoreError>;

    /// Overwrites the state of an existing game.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no game has this id.
    fn save(&self, id: GameId, state: &GameState) -> Result<(), StoreError>;

    /// Removes a game.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no game has this id.
    fn delete(&self, id: GameId) -> Result<(), StoreError>;

    /// Loads a game, runs `transition` on its state, and saves the result,
    /// holding the game's exclusion for the whole cycle.
    ///
    /// A transition error leaves the stored game unchanged and comes back
    /// as [`StoreError::Rejected`].
    fn update(
        &self,
        id: GameId,
        transition: &mut dyn FnMut(&GameState) -> Result<GameState, MoveError>,
    ) -> Result<GameRecord, StoreError>;

    /// Applies a move for the game's current player.
    #[instrument(skip(self))]
    fn apply_move(&self, id: GameId, position: i64) -> Result<GameRecord, StoreError> {
        self.update(id, &mut |state: &GameState| state.apply_move(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_id_parses() {
        assert_eq!("42".parse::<GameId>().unwrap(), GameId::from(42));
        assert!("abc".parse::<GameId>().is_err());
        assert!("1.5".parse::<GameId>().is_err());
    }

    #[test]
    fn test_game_id_serializes_as_number() {
        let json = serde_json::to_string(&GameId::from(7)).unwrap();
        assert_eq!(json, "7");
    }
}
