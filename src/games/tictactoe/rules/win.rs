//! Win detection.

use tracing::instrument;

use super::super::{Board, Mark, Position, Square};

/// The 8 winning triples: rows, columns, then diagonals.
pub const WINNING_LINES: [[Position; 3]; 8] = [
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// First line held entirely by one side, scanning [`WINNING_LINES`] in order.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<(Mark, [Position; 3])> {
    WINNING_LINES.into_iter().find_map(|line| {
        let [a, b, c] = line;
        match board.get(a) {
            Square::Occupied(mark) if board.get(b) == board.get(a) && board.get(c) == board.get(a) => {
                Some((mark, line))
            }
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(mark: Mark, positions: &[Position]) -> Board {
        let mut board = Board::new();
        for pos in positions {
            board.set(*pos, Square::Occupied(mark));
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::new()), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board = board_with(
            Mark::Player,
            &[Position::TopLeft, Position::TopCenter, Position::TopRight],
        );
        assert_eq!(
            check_winner(&board),
            Some((Mark::Player, WINNING_LINES[0]))
        );
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = board_with(
            Mark::Computer,
            &[Position::TopRight, Position::Center, Position::BottomLeft],
        );
        assert_eq!(
            check_winner(&board).map(|(mark, _)| mark),
            Some(Mark::Computer)
        );
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = board_with(Mark::Player, &[Position::TopLeft, Position::TopCenter]);
        assert_eq!(check_winner(&board), None);
    }
}
