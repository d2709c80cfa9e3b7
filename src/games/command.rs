//! Command results and board construction errors.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Why a board ignored a command.
///
/// Ignored commands never change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Rejection {
    /// The board is not accepting moves in its current phase.
    #[display("board is not in play")]
    NotPlaying,
    /// The game has reached a terminal state.
    #[display("game is over")]
    GameOver,
    /// Another question is already open.
    #[display("a question is already open")]
    RoundOpen,
    /// No question is open.
    #[display("no question is open")]
    NoOpenRound,
    /// The cell index is outside the board.
    #[display("cell {} is off the board", _0)]
    OutOfRange(usize),
    /// The cell is already revealed.
    #[display("cell {} is already revealed", _0)]
    CellRevealed(usize),
    /// The cell's single attempt was already used.
    #[display("cell {} has already been attempted", _0)]
    CellSpent(usize),
    /// The cell is already occupied.
    #[display("cell {} is already occupied", _0)]
    CellOccupied(usize),
    /// It is not the player's turn.
    #[display("it is not the player's turn")]
    NotPlayersTurn,
    /// It is not the computer's turn.
    #[display("it is not the computer's turn")]
    NotComputersTurn,
    /// The computer is still thinking.
    #[display("the computer is thinking")]
    ComputerThinking,
    /// The power-up was already consumed.
    #[display("power-up already used")]
    PowerUpUnavailable,
    /// The timer key belongs to a superseded round or turn.
    #[display("stale timer")]
    StaleTimer,
    /// The opponent strategy found no empty cell.
    #[display("no move available")]
    NoMoveAvailable,
}

/// Result of a board command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// The command changed the board.
    Accepted,
    /// The command was ignored.
    Ignored(Rejection),
}

impl CommandOutcome {
    /// Whether the command took effect.
    pub fn is_accepted(self) -> bool {
        matches!(self, CommandOutcome::Accepted)
    }

    /// The rejection reason, if ignored.
    pub fn rejection(self) -> Option<Rejection> {
        match self {
            CommandOutcome::Accepted => None,
            CommandOutcome::Ignored(reason) => Some(reason),
        }
    }
}

impl From<Result<(), Rejection>> for CommandOutcome {
    fn from(result: Result<(), Rejection>) -> Self {
        match result {
            Ok(()) => CommandOutcome::Accepted,
            Err(reason) => CommandOutcome::Ignored(reason),
        }
    }
}

/// Board construction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// The question draw was shorter than the board.
    #[display("need {required} questions to build the board, got {available}")]
    InsufficientQuestions {
        /// Questions the board needs.
        required: usize,
        /// Questions supplied.
        available: usize,
    },
}
