//! Bingo cells, phases and events.

use std::sync::Arc;

use derive_getters::Getters;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use super::lines::BingoLine;
use crate::games::round::Resolution;
use crate::power_ups::PowerUpKind;
use crate::questions::Question;
use crate::scoring::ScoreBreakdown;

/// Probability that a non-free cell is tagged special.
pub const SPECIAL_CELL_CHANCE: f64 = 0.15;

/// Tag rolled onto a cell at construction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SpecialCell {
    /// Doubles the points earned on the cell.
    Bonus,
    /// Adds a random 10–50 points.
    Mystery,
    /// Marked on the board, no scoring effect.
    Wildcard,
}

impl SpecialCell {
    /// Rolls the special tag for one non-free cell.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Option<Self> {
        if !rng.gen_bool(SPECIAL_CELL_CHANCE) {
            return None;
        }
        let kinds: Vec<Self> = Self::iter().collect();
        Some(kinds[rng.gen_range(0..kinds.len())])
    }
}

/// One square of the Bingo board.
#[derive(Debug, Clone, Getters)]
pub struct BingoCell {
    question: Arc<Question>,
    revealed: bool,
    spent: bool,
    special: Option<SpecialCell>,
}

impl BingoCell {
    pub(super) fn new(question: Arc<Question>, special: Option<SpecialCell>) -> Self {
        Self {
            question,
            revealed: false,
            spent: false,
            special,
        }
    }

    pub(super) fn free(question: Arc<Question>) -> Self {
        Self {
            question,
            revealed: true,
            spent: false,
            special: None,
        }
    }

    /// Whether the cell can still be opened.
    pub fn is_playable(&self) -> bool {
        !self.revealed && !self.spent
    }

    pub(super) fn reveal(&mut self) {
        self.revealed = true;
    }

    pub(super) fn spend(&mut self) {
        self.spent = true;
    }
}

/// Lifecycle of a Bingo board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum BingoPhase {
    /// Built, waiting for `start`.
    Building,
    /// Accepting questions.
    Playing,
    /// Every cell revealed.
    Complete,
}

/// Everything that happened when a round was settled.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct BingoAnswerReport {
    cell: usize,
    resolution: Resolution,
    breakdown: ScoreBreakdown,
    special: Option<SpecialCell>,
    special_bonus: u32,
    new_lines: Vec<BingoLine>,
    line_bonus: u32,
    completion_bonus: u32,
    earned_power_up: Option<PowerUpKind>,
    score: u32,
    streak: u32,
}

impl BingoAnswerReport {
    pub(super) fn missed(cell: usize, resolution: Resolution, score: u32) -> Self {
        Self {
            cell,
            resolution,
            breakdown: ScoreBreakdown::default(),
            special: None,
            special_bonus: 0,
            new_lines: Vec::new(),
            line_bonus: 0,
            completion_bonus: 0,
            earned_power_up: None,
            score,
            streak: 0,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn correct(
        cell: usize,
        breakdown: ScoreBreakdown,
        special: Option<SpecialCell>,
        special_bonus: u32,
        new_lines: Vec<BingoLine>,
        line_bonus: u32,
        completion_bonus: u32,
        earned_power_up: Option<PowerUpKind>,
        score: u32,
        streak: u32,
    ) -> Self {
        Self {
            cell,
            resolution: Resolution::Correct,
            breakdown,
            special,
            special_bonus,
            new_lines,
            line_bonus,
            completion_bonus,
            earned_power_up,
            score,
            streak,
        }
    }

    /// Points this answer added to the board, bonuses included.
    pub fn points(&self) -> u32 {
        self.breakdown.total() + self.special_bonus + self.line_bonus + self.completion_bonus
    }
}

/// Notifications for the host, drained with `take_events`.
#[derive(Debug, Clone, PartialEq)]
pub enum BingoEvent {
    /// A round was settled.
    AnswerResolved(Box<BingoAnswerReport>),
    /// The score moved after a correct answer.
    ScoreChanged {
        /// New cumulative score.
        score: u32,
    },
    /// One or more lines were completed for the first time.
    LinesCompleted {
        /// The new lines.
        lines: Vec<BingoLine>,
        /// Points awarded for them.
        bonus: u32,
    },
    /// The last unrevealed cell was revealed.
    BoardCompleted {
        /// Final score.
        score: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_special_roll_rate() {
        let mut rng = StdRng::seed_from_u64(99);
        let trials = 10_000;
        let special = (0..trials)
            .filter(|_| SpecialCell::roll(&mut rng).is_some())
            .count();
        let rate = special as f64 / trials as f64;
        assert!((0.12..0.18).contains(&rate), "rate was {}", rate);
    }

    #[test]
    fn test_roll_produces_every_kind() {
        let mut rng = StdRng::seed_from_u64(3);
        let rolled: Vec<SpecialCell> = (0..2_000).filter_map(|_| SpecialCell::roll(&mut rng)).collect();
        for kind in SpecialCell::iter() {
            assert!(rolled.contains(&kind), "{} never rolled", kind);
        }
    }
}
