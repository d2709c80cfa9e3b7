//! Football Bingo: a 5×5 board with one question per cell.
//!
//! A correct answer reveals the cell; a wrong answer, a timeout or a skip
//! spends it for good. Rows, columns and diagonals pay a one-off line bonus
//! and revealing every cell pays the completion bonus.

mod board;
mod invariants;
mod lines;
mod types;

pub use board::{BingoBoard, COMPLETION_BONUS, LINE_BONUS, MYSTERY_BONUS};
pub use invariants::{
    BingoInvariants, CompletedLinesRevealed, FreeCellRevealed, RevealedCellsNotSpent,
};
pub use lines::{BOARD_SIZE, BingoLine, CELL_COUNT, FREE_CELL_INDEX};
pub use types::{
    BingoAnswerReport, BingoCell, BingoEvent, BingoPhase, SPECIAL_CELL_CHANCE, SpecialCell,
};
