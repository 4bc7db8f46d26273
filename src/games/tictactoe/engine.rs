//! Game state and the move transition.
//!
//! [`GameState`] is a plain value. Applying a move never touches the
//! state it was called on; it returns the next state or a [`MoveError`]
//! explaining why the move was refused. Persisting the result is the
//! store's job.

use super::error::MoveError;
use super::position::Position;
use super::rules::{check_winner, has_line, is_full};
use super::types::{Board, Cell, GameStatus, Mark};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Complete game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GameState {
    board: Board,
    current_player: Mark,
    winner: Option<Mark>,
    is_draw: bool,
}

impl GameState {
    /// Creates a new game: empty board, X to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Mark::X,
            winner: None,
            is_draw: false,
        }
    }

    /// Rebuilds a state from stored parts.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::CorruptState`] if the parts could not have
    /// been produced by legal play.
    #[instrument]
    pub fn from_parts(
        board: Board,
        current_player: Mark,
        winner: Option<Mark>,
        is_draw: bool,
    ) -> Result<Self, MoveError> {
        let xs = board.count(Mark::X);
        let os = board.count(Mark::O);
        if xs != os && xs != os + 1 {
            return Err(MoveError::CorruptState(format!(
                "{xs} X marks against {os} O marks"
            )));
        }

        match (winner, is_draw) {
            (Some(_), true) => {
                return Err(MoveError::CorruptState(
                    "game is both won and drawn".to_string(),
                ));
            }
            (Some(mark), false) if !has_line(&board, mark) => {
                return Err(MoveError::CorruptState(format!(
                    "{mark} is recorded as winner without a line"
                )));
            }
            (Some(mark), false) if has_line(&board, mark.opponent()) => {
                return Err(MoveError::CorruptState(format!(
                    "both {mark} and {} hold a line",
                    mark.opponent()
                )));
            }
            // The winner made the last move, so play stopped right after it.
            (Some(Mark::X), false) if xs != os + 1 => {
                return Err(MoveError::CorruptState(format!(
                    "X won but {xs} X marks against {os} O marks"
                )));
            }
            (Some(Mark::O), false) if xs != os => {
                return Err(MoveError::CorruptState(format!(
                    "O won but {xs} X marks against {os} O marks"
                )));
            }
            (None, true) if !is_full(&board) || check_winner(&board).is_some() => {
                return Err(MoveError::CorruptState(
                    "draw recorded on a board that is not drawn".to_string(),
                ));
            }
            (None, false) if check_winner(&board).is_some() || is_full(&board) => {
                return Err(MoveError::CorruptState(
                    "finished board recorded as in progress".to_string(),
                ));
            }
            _ => {}
        }

        let terminal = winner.is_some() || is_draw;
        let expected = match (terminal, xs > os) {
            // The mover stays current once the game ends.
            (true, true) => Mark::X,
            (true, false) => Mark::O,
            (false, true) => Mark::O,
            (false, false) => Mark::X,
        };
        if current_player != expected {
            return Err(MoveError::CorruptState(format!(
                "{current_player} recorded to move, expected {expected}"
            )));
        }

        Ok(Self {
            board,
            current_player,
            winner,
            is_draw,
        })
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player whose turn is next.
    pub fn current_player(&self) -> Mark {
        self.current_player
    }

    /// Returns the winner, if a line has been completed.
    pub fn winner(&self) -> Option<Mark> {
        self.winner
    }

    /// True iff the board is full without a winner.
    pub fn is_draw(&self) -> bool {
        self.is_draw
    }

    /// Classifies the game as in progress, won, or drawn.
    pub fn status(&self) -> GameStatus {
        match (self.winner, self.is_draw) {
            (Some(mark), _) => GameStatus::Won(mark),
            (None, true) => GameStatus::Draw,
            (None, false) => GameStatus::InProgress,
        }
    }

    /// Checks whether the game accepts no further moves.
    pub fn is_terminal(&self) -> bool {
        self.status() != GameStatus::InProgress
    }

    /// Number of marks on the board.
    pub fn moves_played(&self) -> usize {
        9 - self.board.empty_positions().len()
    }

    /// Read accessor; returns the state unchanged.
    pub fn get_state(&self) -> GameState {
        *self
    }

    /// Applies a move for the current player at a raw board index.
    ///
    /// # Errors
    ///
    /// - [`MoveError::InvalidPosition`] if `position` is outside `0..9`
    /// - [`MoveError::GameOver`] if the game already ended
    /// - [`MoveError::CellOccupied`] if the cell already holds a mark
    #[instrument(skip(self), fields(player = %self.current_player))]
    pub fn apply_move(&self, position: i64) -> Result<GameState, MoveError> {
        let pos = Position::try_from(position)?;
        self.place(pos)
    }

    /// Places the current player's mark at an already validated position.
    ///
    /// # Errors
    ///
    /// Same as [`GameState::apply_move`], minus position validation.
    #[instrument(skip(self), fields(player = %self.current_player))]
    pub fn place(&self, pos: Position) -> Result<GameState, MoveError> {
        if self.is_terminal() {
            warn!(status = ?self.status(), "Move submitted after game over");
            return Err(MoveError::GameOver);
        }

        if !self.board.is_empty(pos) {
            warn!(%pos, "Move targets an occupied cell");
            return Err(MoveError::CellOccupied(pos));
        }

        let mut next = *self;
        next.board.set(pos, Cell::Occupied(self.current_player));

        if let Some(winner) = check_winner(&next.board) {
            next.winner = Some(winner);
        } else if is_full(&next.board) {
            next.is_draw = true;
        } else {
            next.current_player = self.current_player.opponent();
        }

        debug!(status = ?next.status(), next_player = %next.current_player, "Move applied");
        Ok(next)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Starts a new game.
pub fn new_game() -> GameState {
    GameState::new()
}

/// Applies a move for `state`'s current player, returning the next state.
///
/// # Errors
///
/// See [`GameState::apply_move`].
pub fn apply_move(state: &GameState, position: i64) -> Result<GameState, MoveError> {
    state.apply_move(position)
}

/// Returns `state` unchanged.
pub fn get_state(state: &GameState) -> GameState {
    state.get_state()
}
