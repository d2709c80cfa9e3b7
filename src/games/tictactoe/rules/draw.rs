//! Draw detection.

use super::super::{Board, Square};
use super::win::check_winner;

/// Whether every square is occupied.
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

/// A full board with no winning line.
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && check_winner(board).is_none()
}
