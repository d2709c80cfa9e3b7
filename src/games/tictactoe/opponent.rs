//! Computer opponent strategies.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{Board, Position};

/// Picks the computer's square.
pub trait OpponentStrategy: std::fmt::Debug + Send {
    /// Chooses an empty square, or `None` when the board is full.
    fn choose_move(&mut self, board: &Board) -> Option<Position>;

    /// Display name.
    fn name(&self) -> &str;
}

/// Uniformly random choice among empty squares.
#[derive(Debug)]
pub struct RandomOpponent {
    rng: StdRng,
}

impl RandomOpponent {
    /// Seeds the choice stream for reproducible games.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeds from the OS.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl OpponentStrategy for RandomOpponent {
    #[instrument(skip(self, board))]
    fn choose_move(&mut self, board: &Board) -> Option<Position> {
        let choice = Position::valid_moves(board).choose(&mut self.rng).copied();
        debug!(?choice, "Random opponent chose");
        choice
    }

    fn name(&self) -> &str {
        "Random"
    }
}

/// Always the lowest-numbered empty square.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstAvailable;

impl OpponentStrategy for FirstAvailable {
    fn choose_move(&mut self, board: &Board) -> Option<Position> {
        Position::ALL.iter().copied().find(|&pos| board.is_empty(pos))
    }

    fn name(&self) -> &str {
        "First available"
    }
}

/// Strategy selector used in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OpponentKind {
    /// [`RandomOpponent`].
    #[default]
    Random,
    /// [`FirstAvailable`].
    FirstAvailable,
}

impl OpponentKind {
    /// Builds the strategy, seeding random play when `seed` is set.
    pub fn build(self, seed: Option<u64>) -> Box<dyn OpponentStrategy> {
        match self {
            OpponentKind::Random => match seed {
                Some(seed) => Box::new(RandomOpponent::seeded(seed)),
                None => Box::new(RandomOpponent::from_entropy()),
            },
            OpponentKind::FirstAvailable => Box::new(FirstAvailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::{Mark, Square};

    #[test]
    fn test_first_available_skips_occupied() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(Mark::Player));
        assert_eq!(FirstAvailable.choose_move(&board), Some(Position::TopCenter));
    }

    #[test]
    fn test_random_only_picks_empty_squares() {
        let mut board = Board::new();
        for pos in &Position::ALL[..7] {
            board.set(*pos, Square::Occupied(Mark::Player));
        }
        let mut opponent = RandomOpponent::seeded(11);
        for _ in 0..20 {
            let choice = opponent.choose_move(&board).expect("move");
            assert!(board.is_empty(choice));
        }
    }

    #[test]
    fn test_full_board_has_no_move() {
        let mut board = Board::new();
        for pos in Position::ALL {
            board.set(pos, Square::Occupied(Mark::Computer));
        }
        assert_eq!(OpponentKind::Random.build(Some(1)).choose_move(&board), None);
        assert_eq!(FirstAvailable.choose_move(&board), None);
    }

    #[test]
    fn test_kind_parses_kebab_case() {
        let kind: OpponentKind = serde_json::from_str("\"first-available\"").expect("kind");
        assert_eq!(kind, OpponentKind::FirstAvailable);
        assert_eq!(kind.to_string(), "first-available");
    }
}
