//! Errors raised when a move is rejected.

use super::position::Position;

/// Reason a move could not be applied.
///
/// Every variant is a client input problem; none of them leave the game
/// state changed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Position is not an integer in `0..9`.
    #[display("Invalid move position: {}", _0)]
    InvalidPosition(String),

    /// The target cell already holds a mark.
    #[display("That position is already taken: {}", _0)]
    CellOccupied(Position),

    /// The game already has a winner or ended in a draw.
    #[display("Game is already over")]
    GameOver,

    /// Stored parts do not describe a reachable game.
    #[display("Inconsistent game state: {}", _0)]
    CorruptState(String),
}

impl MoveError {
    /// Stable snake_case name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            MoveError::InvalidPosition(_) => "invalid_position",
            MoveError::CellOccupied(_) => "cell_occupied",
            MoveError::GameOver => "game_over",
            MoveError::CorruptState(_) => "corrupt_state",
        }
    }
}

impl std::error::Error for MoveError {}
