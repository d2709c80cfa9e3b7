//! The two board games and the pieces they share.

pub mod bingo;
mod command;
mod invariants;
mod round;
pub mod tictactoe;

pub use command::{BoardError, CommandOutcome, Rejection};
pub use invariants::{Invariant, InvariantSet, InvariantViolation};
pub use round::{AnswerTally, EXTRA_TIME_SECS, QuestionRound, Resolution};
