//! Quiz Tic-Tac-Toe against a computer opponent.

mod action;
mod board;
mod invariants;
mod opponent;
mod position;
pub mod rules;
mod types;

pub use action::Move;
pub use board::{
    COMPUTER_MOVE_PENALTY, COMPUTER_WIN_PENALTY, CORRECT_ANSWER_POINTS, PLAYER_WIN_BONUS,
    SQUARE_COUNT, TicTacToeBoard, WRONG_ANSWER_PENALTY,
};
pub use invariants::{
    HistoryMatchesBoard, OutcomeConsistent, ThinkingOnComputerTurn, TicTacToeInvariants,
};
pub use opponent::{FirstAvailable, OpponentKind, OpponentStrategy, RandomOpponent};
pub use position::Position;
pub use types::{Board, GameStatus, Mark, Outcome, Square, TicTacToeAnswerReport, TicTacToeEvent};
