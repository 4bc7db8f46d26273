//! Tic-tac-toe engine: pure state transitions over [`GameState`] values.

mod engine;
mod error;
mod position;
pub mod rules;
mod types;

pub use engine::{GameState, apply_move, get_state, new_game};
pub use error::MoveError;
pub use position::Position;
pub use types::{Board, Cell, GameStatus, Mark};
