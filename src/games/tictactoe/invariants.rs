//! Structural properties of a Tic-Tac-Toe board.

use super::rules::{check_winner, is_draw};
use super::{Board, Mark, Outcome, Square, TicTacToeBoard};
use crate::games::invariants::Invariant;

/// Replaying the history onto an empty grid gives the current grid, and no
/// square was ever claimed twice.
pub struct HistoryMatchesBoard;

impl Invariant<TicTacToeBoard> for HistoryMatchesBoard {
    fn holds(game: &TicTacToeBoard) -> bool {
        let mut replayed = Board::new();
        for mov in game.history() {
            if !replayed.is_empty(mov.position) {
                return false;
            }
            replayed.set(mov.position, Square::Occupied(mov.mark));
        }
        replayed == *game.board()
    }

    fn description() -> &'static str {
        "Move history replays to the current board"
    }
}

/// The recorded outcome agrees with the grid.
pub struct OutcomeConsistent;

impl Invariant<TicTacToeBoard> for OutcomeConsistent {
    fn holds(game: &TicTacToeBoard) -> bool {
        let expected = match check_winner(game.board()) {
            Some((Mark::Player, _)) => Some(Outcome::PlayerWin),
            Some((Mark::Computer, _)) => Some(Outcome::ComputerWin),
            None if is_draw(game.board()) => Some(Outcome::Draw),
            None => None,
        };
        expected == game.outcome()
            && game.winning_line() == check_winner(game.board()).map(|(_, line)| line)
    }

    fn description() -> &'static str {
        "Outcome matches the board"
    }
}

/// The computer only thinks on its own turn of a running game.
pub struct ThinkingOnComputerTurn;

impl Invariant<TicTacToeBoard> for ThinkingOnComputerTurn {
    fn holds(game: &TicTacToeBoard) -> bool {
        !game.is_thinking() || (game.turn() == Mark::Computer && !game.is_over())
    }

    fn description() -> &'static str {
        "Thinking only during the computer's turn"
    }
}

/// Every invariant a Tic-Tac-Toe board maintains.
pub type TicTacToeInvariants = (HistoryMatchesBoard, OutcomeConsistent, ThinkingOnComputerTurn);
