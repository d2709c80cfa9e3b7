//! Core domain types for Tic-Tac-Toe.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::games::round::Resolution;

/// Side of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Mark {
    /// The human, drawn as X.
    #[strum(to_string = "X")]
    Player,
    /// The CPU, drawn as O.
    #[strum(to_string = "O")]
    Computer,
}

impl Mark {
    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Mark::Player => Mark::Computer,
            Mark::Computer => Mark::Player,
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Nobody has claimed it.
    #[default]
    Empty,
    /// Claimed by a side.
    Occupied(Mark),
}

/// 3×3 grid of marks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    squares: [Square; 9],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// The square at `pos`.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Overwrites the square at `pos`.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Whether nobody occupies `pos`.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Squares in row-major order.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Renders the grid with 1-based numbers on empty squares.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => (pos + 1).to_string(),
                    Square::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Outcome {
    /// Three player marks in a row.
    #[strum(to_string = "You win!")]
    PlayerWin,
    /// Three computer marks in a row.
    #[strum(to_string = "Computer wins!")]
    ComputerWin,
    /// Full board, no line.
    #[strum(to_string = "It's a draw!")]
    Draw,
}

/// Whether the game is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Moves are still being made; the mark is whose turn it is.
    InProgress(Mark),
    /// The game has ended.
    Finished(Outcome),
}

/// Effect of one settled question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct TicTacToeAnswerReport {
    position: Position,
    resolution: Resolution,
    delta: i32,
    score: u32,
}

impl TicTacToeAnswerReport {
    pub(super) fn new(position: Position, resolution: Resolution, delta: i32, score: u32) -> Self {
        Self {
            position,
            resolution,
            delta,
            score,
        }
    }
}

/// Notifications for the host, drained with `take_events`.
#[derive(Debug, Clone, PartialEq)]
pub enum TicTacToeEvent {
    /// A question was settled and its square claimed.
    AnswerResolved(TicTacToeAnswerReport),
    /// The computer placed its mark.
    ComputerMoved {
        /// Square taken.
        position: Position,
        /// Score after the move penalty.
        score: u32,
    },
    /// The game reached a terminal state.
    GameEnded {
        /// How it ended.
        outcome: Outcome,
        /// Final score.
        score: u32,
    },
}
