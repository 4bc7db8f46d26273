//! Win detection logic for tic-tac-toe.

use super::super::{Board, Cell, Mark, Position};
use tracing::instrument;

/// The 8 winning lines in scan order: rows top-to-bottom, columns
/// left-to-right, then the diagonals from top-left and from top-right.
pub const WINNING_LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
    ],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [
        Position::TopLeft,
        Position::MiddleLeft,
        Position::BottomLeft,
    ],
    [
        Position::TopCenter,
        Position::Center,
        Position::BottomCenter,
    ],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Checks if there is a winner on the board.
///
/// Returns the mark of the first uniformly marked line in
/// [`WINNING_LINES`] order, `None` otherwise.
#[instrument]
pub fn check_winner(board: &Board) -> Option<Mark> {
    WINNING_LINES
        .iter()
        .find_map(|line| line_owner(board, line))
}

/// Checks whether `mark` holds at least one complete line.
pub fn has_line(board: &Board, mark: Mark) -> bool {
    WINNING_LINES
        .iter()
        .any(|line| line_owner(board, line) == Some(mark))
}

fn line_owner(board: &Board, [a, b, c]: &[Position; 3]) -> Option<Mark> {
    let cell = board.get(*a);
    if cell != Cell::Empty && cell == board.get(*b) && cell == board.get(*c) {
        cell.mark()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(marks: &[(Position, Mark)]) -> Board {
        let mut board = Board::new();
        for (pos, mark) in marks {
            board.set(*pos, Cell::Occupied(*mark));
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board = board_with(&[
            (Position::TopLeft, Mark::X),
            (Position::TopCenter, Mark::X),
            (Position::TopRight, Mark::X),
        ]);
        assert_eq!(check_winner(&board), Some(Mark::X));
    }

    #[test]
    fn test_winner_diagonal() {
        let board = board_with(&[
            (Position::TopLeft, Mark::O),
            (Position::Center, Mark::O),
            (Position::BottomRight, Mark::O),
        ]);
        assert_eq!(check_winner(&board), Some(Mark::O));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = board_with(&[
            (Position::TopLeft, Mark::X),
            (Position::TopCenter, Mark::X),
        ]);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board = board_with(&[
            (Position::TopLeft, Mark::X),
            (Position::TopCenter, Mark::O),
            (Position::TopRight, Mark::X),
        ]);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_first_line_in_scan_order_wins_tie() {
        // Left column for X and right column for O; only reachable by
        // building the board directly.
        let board = board_with(&[
            (Position::TopLeft, Mark::X),
            (Position::MiddleLeft, Mark::X),
            (Position::BottomLeft, Mark::X),
            (Position::TopRight, Mark::O),
            (Position::MiddleRight, Mark::O),
            (Position::BottomRight, Mark::O),
        ]);
        // Rows are scanned before columns, but neither row is complete;
        // the left column comes before the right column.
        assert_eq!(check_winner(&board), Some(Mark::X));
        assert!(has_line(&board, Mark::O));
    }
}
