//! JSON bodies exchanged over HTTP.

use crate::games::tictactoe::{Board, Cell, GameState, Mark, MoveError};
use crate::store::{GameId, GameRecord};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Serialized game as returned by every successful game endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    /// Game id.
    pub id: GameId,
    /// Nine cells, row-major; `null`, `"X"` or `"O"`.
    pub board: Vec<Option<Mark>>,
    /// Whose turn is next.
    pub current_player: Mark,
    /// Winner, once a line is complete.
    pub winner: Option<Mark>,
    /// Board full with no winner.
    pub is_draw: bool,
    /// When the game was created.
    pub created_at: NaiveDateTime,
}

impl GameView {
    /// Rebuilds the engine state described by this view.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::CorruptState`] if the board does not have
    /// nine cells or the fields are inconsistent.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn to_state(&self) -> Result<GameState, MoveError> {
        let cells: [Cell; 9] = self
            .board
            .iter()
            .map(|mark| Cell::from(*mark))
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|cells: Vec<Cell>| {
                MoveError::CorruptState(format!("board has {} cells", cells.len()))
            })?;
        GameState::from_parts(
            Board::from_cells(cells),
            self.current_player,
            self.winner,
            self.is_draw,
        )
    }
}

impl From<&GameRecord> for GameView {
    fn from(record: &GameRecord) -> Self {
        let state = record.state();
        Self {
            id: *record.id(),
            board: state.board().cells().iter().map(|c| c.mark()).collect(),
            current_player: state.current_player(),
            winner: state.winner(),
            is_draw: state.is_draw(),
            created_at: *record.created_at(),
        }
    }
}

/// Body of `PUT /games/{id}/move` as sent by clients.
///
/// The server reads the body as raw JSON so it can tell malformed
/// bodies apart from bad positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Board index, 0-8.
    pub position: i64,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Stable snake_case error kind.
    pub kind: String,
}
