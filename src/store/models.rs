//! Database models and their mapping to engine types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use diesel::prelude::*;
use tracing::instrument;

use super::{DbError, GameId, GameRecord, schema};
use crate::games::tictactoe::{Board, Cell, GameState, Mark};

/// Character stored for an empty cell.
const EMPTY_CELL: char = '-';

/// Game row as stored in the `games` table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRow {
    id: i64,
    board: String,
    current_player: String,
    winner: Option<String>,
    is_draw: bool,
    created_at: NaiveDateTime,
}

impl GameRow {
    /// Decodes the row into a record, validating the stored state.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any column holds an unexpected value or the
    /// columns together do not describe a reachable game.
    #[instrument(skip(self), fields(game_id = self.id))]
    pub fn into_record(self) -> Result<GameRecord, DbError> {
        let board = decode_board(&self.board)?;
        let current_player = decode_mark(&self.current_player)?;
        let winner = self.winner.as_deref().map(decode_mark).transpose()?;

        let state = GameState::from_parts(board, current_player, winner, self.is_draw)
            .map_err(|e| DbError::new(format!("Corrupt game row {}: {}", self.id, e)))?;

        Ok(GameRecord::new(GameId::from(self.id), self.created_at, state))
    }
}

/// Mutable columns of a game; used both to insert and to update rows.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = schema::games)]
#[diesel(treat_none_as_null = true)]
pub struct GameChanges {
    board: String,
    current_player: String,
    winner: Option<String>,
    is_draw: bool,
}

impl From<&GameState> for GameChanges {
    fn from(state: &GameState) -> Self {
        Self {
            board: encode_board(state.board()),
            current_player: state.current_player().to_string(),
            winner: state.winner().map(|mark| mark.to_string()),
            is_draw: state.is_draw(),
        }
    }
}

/// Encodes a board as nine characters: `X`, `O` or `-`.
pub fn encode_board(board: &Board) -> String {
    board
        .cells()
        .iter()
        .map(|cell| cell.mark().map_or(EMPTY_CELL, Mark::as_char))
        .collect()
}

/// Decodes a board written by [`encode_board`].
///
/// # Errors
///
/// Returns [`DbError`] if the text is not exactly nine valid characters.
#[instrument]
pub fn decode_board(text: &str) -> Result<Board, DbError> {
    let mut cells = [Cell::Empty; 9];
    let mut chars = text.chars();
    for cell in cells.iter_mut() {
        *cell = match chars.next() {
            Some('X') => Cell::Occupied(Mark::X),
            Some('O') => Cell::Occupied(Mark::O),
            Some(EMPTY_CELL) => Cell::Empty,
            _ => return Err(DbError::new(format!("Invalid board encoding: '{}'", text))),
        };
    }
    if chars.next().is_some() {
        return Err(DbError::new(format!("Invalid board encoding: '{}'", text)));
    }
    Ok(Board::from_cells(cells))
}

fn decode_mark(text: &str) -> Result<Mark, DbError> {
    text.parse()
        .map_err(|_| DbError::new(format!("Invalid mark: '{}'", text)))
}
