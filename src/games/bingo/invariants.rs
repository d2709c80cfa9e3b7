//! Structural properties of a Bingo board.

use super::BingoBoard;
use super::lines::{BingoLine, FREE_CELL_INDEX};
use crate::games::invariants::Invariant;

/// The center cell is revealed on every board.
pub struct FreeCellRevealed;

impl Invariant<BingoBoard> for FreeCellRevealed {
    fn holds(board: &BingoBoard) -> bool {
        board
            .cells()
            .get(FREE_CELL_INDEX)
            .is_some_and(|cell| *cell.revealed())
    }

    fn description() -> &'static str {
        "Free cell is revealed"
    }
}

/// The completed set is exactly the set of fully revealed lines.
pub struct CompletedLinesRevealed;

impl Invariant<BingoBoard> for CompletedLinesRevealed {
    fn holds(board: &BingoBoard) -> bool {
        let revealed = BingoLine::completed(|i| *board.cells()[i].revealed());
        revealed.len() == board.completed_lines().len()
            && revealed.iter().all(|line| board.completed_lines().contains(line))
    }

    fn description() -> &'static str {
        "Completed lines match the revealed cells"
    }
}

/// A cell is never both revealed and spent.
pub struct RevealedCellsNotSpent;

impl Invariant<BingoBoard> for RevealedCellsNotSpent {
    fn holds(board: &BingoBoard) -> bool {
        board
            .cells()
            .iter()
            .all(|cell| !(*cell.revealed() && *cell.spent()))
    }

    fn description() -> &'static str {
        "Revealed cells are never spent"
    }
}

/// Every invariant a Bingo board maintains.
pub type BingoInvariants = (FreeCellRevealed, CompletedLinesRevealed, RevealedCellsNotSpent);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::invariants::InvariantSet;
    use crate::power_ups::PowerUps;
    use crate::questions::{GameMode, QuestionBank};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_fresh_board_holds() {
        let bank = QuestionBank::bundled().expect("bundled pool");
        let mut rng = StdRng::seed_from_u64(1);
        let questions = bank.draw(GameMode::Bingo, &mut rng);
        let board = BingoBoard::build(questions, PowerUps::all(), rng).expect("board");
        assert!(BingoInvariants::check_all(&board).is_ok());
    }
}
