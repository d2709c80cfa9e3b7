//! The Bingo board state machine.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument};

use super::invariants::BingoInvariants;
use super::lines::{BingoLine, CELL_COUNT, FREE_CELL_INDEX};
use super::types::{BingoAnswerReport, BingoCell, BingoEvent, BingoPhase, SpecialCell};
use crate::games::command::{BoardError, CommandOutcome, Rejection};
use crate::games::invariants::{InvariantSet, describe};
use crate::games::round::{AnswerTally, QuestionRound, Resolution};
use crate::power_ups::{PowerUpKind, PowerUps};
use crate::questions::Question;
use crate::scoring::{AnswerContext, score_response};
use crate::timers::{KeyClock, TimerKey};

/// Points for each newly completed line.
pub const LINE_BONUS: u32 = 50;
/// Points for revealing the whole board.
pub const COMPLETION_BONUS: u32 = 100;
/// Inclusive range of the mystery cell bonus.
pub const MYSTERY_BONUS: std::ops::RangeInclusive<u32> = 10..=50;

/// A 5×5 Bingo board.
///
/// Commands never fail: anything invalid in the current state is ignored and
/// reported as [`CommandOutcome::Ignored`].
#[derive(Debug)]
pub struct BingoBoard {
    cells: Vec<BingoCell>,
    phase: BingoPhase,
    completed: BTreeSet<BingoLine>,
    score: u32,
    streak: u32,
    power_ups: PowerUps,
    initial_power_ups: PowerUps,
    round: Option<QuestionRound>,
    keys: KeyClock,
    rng: StdRng,
    tally: AnswerTally,
    last_report: Option<BingoAnswerReport>,
    events: Vec<BingoEvent>,
}

impl BingoBoard {
    /// Builds a board from the first 25 questions, rolling special cells.
    #[instrument(skip(questions, power_ups, rng), fields(count = questions.len()))]
    pub fn build(
        questions: Vec<Arc<Question>>,
        power_ups: PowerUps,
        mut rng: StdRng,
    ) -> Result<Self, BoardError> {
        let specials = roll_specials(&mut rng);
        Self::with_layout(questions, specials, power_ups, rng)
    }

    /// Builds a board with a fixed special-cell layout.
    ///
    /// Any special tag on the free cell is dropped.
    #[instrument(skip_all, fields(count = questions.len()))]
    pub fn with_layout(
        questions: Vec<Arc<Question>>,
        specials: [Option<SpecialCell>; CELL_COUNT],
        power_ups: PowerUps,
        rng: StdRng,
    ) -> Result<Self, BoardError> {
        let cells = layout_cells(questions, &specials)?;
        let board = Self {
            cells,
            phase: BingoPhase::Building,
            completed: BTreeSet::new(),
            score: 0,
            streak: 0,
            power_ups,
            initial_power_ups: power_ups,
            round: None,
            keys: KeyClock::new(),
            rng,
            tally: AnswerTally::default(),
            last_report: None,
            events: Vec::new(),
        };
        info!(
            specials = board.cells.iter().filter(|c| c.special().is_some()).count(),
            "Bingo board built"
        );
        board.assert_invariants();
        Ok(board)
    }

    /// Moves a freshly built board into play.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CommandOutcome {
        let result = if self.phase == BingoPhase::Building {
            self.phase = BingoPhase::Playing;
            info!("Bingo started");
            Ok(())
        } else {
            Err(Rejection::NotPlaying)
        };
        self.outcome(result)
    }

    /// Opens the question on `index`.
    #[instrument(skip(self))]
    pub fn open(&mut self, index: usize) -> CommandOutcome {
        let result = self.try_open(index);
        self.outcome(result)
    }

    fn try_open(&mut self, index: usize) -> Result<(), Rejection> {
        self.ensure_playing()?;
        if self.round.is_some() {
            return Err(Rejection::RoundOpen);
        }
        let cell = self.cells.get(index).ok_or(Rejection::OutOfRange(index))?;
        if *cell.revealed() {
            return Err(Rejection::CellRevealed(index));
        }
        if *cell.spent() {
            return Err(Rejection::CellSpent(index));
        }
        let question = Arc::clone(cell.question());
        let key = self.keys.advance();
        self.round = Some(QuestionRound::new(key, index, question));
        debug!(%key, index, "Question opened");
        Ok(())
    }

    /// Spends a board power-up on the open question.
    #[instrument(skip(self))]
    pub fn use_power_up(&mut self, kind: PowerUpKind) -> CommandOutcome {
        let result = self.try_use_power_up(kind);
        self.outcome(result)
    }

    fn try_use_power_up(&mut self, kind: PowerUpKind) -> Result<(), Rejection> {
        self.ensure_playing()?;
        let round = self.round.as_mut().ok_or(Rejection::NoOpenRound)?;
        if !self.power_ups.is_available(kind) {
            return Err(Rejection::PowerUpUnavailable);
        }
        if !round.apply_power_up(kind, &mut self.rng) {
            return Err(Rejection::PowerUpUnavailable);
        }
        self.power_ups.consume(kind);
        if round.is_resolved() {
            self.settle();
        }
        Ok(())
    }

    /// Runs the open question's countdown, if `key` still names it.
    #[instrument(skip(self))]
    pub fn tick(&mut self, key: TimerKey, elapsed: Duration) -> CommandOutcome {
        let result = self.try_tick(key, elapsed);
        self.outcome(result)
    }

    fn try_tick(&mut self, key: TimerKey, elapsed: Duration) -> Result<(), Rejection> {
        self.ensure_playing()?;
        if !self.keys.is_current(key) {
            return Err(Rejection::StaleTimer);
        }
        let round = self.round.as_mut().ok_or(Rejection::NoOpenRound)?;
        if round.tick(elapsed).is_some() {
            self.settle();
        }
        Ok(())
    }

    /// Answers the open question.
    #[instrument(skip(self))]
    pub fn submit_answer(&mut self, choice: &str) -> CommandOutcome {
        let result = self.try_submit(choice);
        self.outcome(result)
    }

    fn try_submit(&mut self, choice: &str) -> Result<(), Rejection> {
        self.ensure_playing()?;
        let round = self.round.as_mut().ok_or(Rejection::NoOpenRound)?;
        round.submit(choice);
        self.settle();
        Ok(())
    }

    /// Rebuilds the board from fresh questions, keeping the RNG stream.
    ///
    /// The new board is in [`BingoPhase::Building`]. Timer keys issued before
    /// the reset stay stale.
    #[instrument(skip(self, questions), fields(count = questions.len()))]
    pub fn reset(&mut self, questions: Vec<Arc<Question>>) -> Result<(), BoardError> {
        let specials = roll_specials(&mut self.rng);
        self.cells = layout_cells(questions, &specials)?;
        self.keys.advance();
        self.phase = BingoPhase::Building;
        self.completed.clear();
        self.score = 0;
        self.streak = 0;
        self.power_ups = self.initial_power_ups;
        self.round = None;
        self.tally = AnswerTally::default();
        self.last_report = None;
        self.events.clear();
        info!("Bingo board reset");
        self.assert_invariants();
        Ok(())
    }

    /// Drains pending events in emission order.
    pub fn take_events(&mut self) -> Vec<BingoEvent> {
        std::mem::take(&mut self.events)
    }

    // ─────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────

    /// Cells in row-major order.
    pub fn cells(&self) -> &[BingoCell] {
        &self.cells
    }

    /// Current phase.
    pub fn phase(&self) -> BingoPhase {
        self.phase
    }

    /// Lines completed so far.
    pub fn completed_lines(&self) -> &BTreeSet<BingoLine> {
        &self.completed
    }

    /// Cumulative score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Consecutive correct answers.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Remaining power-ups.
    pub fn power_ups(&self) -> &PowerUps {
        &self.power_ups
    }

    /// The open question, if any.
    pub fn round(&self) -> Option<&QuestionRound> {
        self.round.as_ref()
    }

    /// Correct and answered counts.
    pub fn tally(&self) -> AnswerTally {
        self.tally
    }

    /// Report for the most recently settled round.
    pub fn last_report(&self) -> Option<&BingoAnswerReport> {
        self.last_report.as_ref()
    }

    /// Whether any cell can still be opened.
    pub fn has_playable_cells(&self) -> bool {
        self.cells.iter().any(BingoCell::is_playable)
    }

    /// Whether the game cannot progress any further.
    pub fn is_finished(&self) -> bool {
        self.phase == BingoPhase::Complete
            || (self.phase == BingoPhase::Playing
                && self.round.is_none()
                && !self.has_playable_cells())
    }

    // ─────────────────────────────────────────────────────────────
    // Resolution
    // ─────────────────────────────────────────────────────────────

    fn settle(&mut self) {
        let Some(round) = self.round.take() else {
            return;
        };
        let Some(resolution) = round.resolution() else {
            self.round = Some(round);
            return;
        };
        self.tally.record(resolution);
        let index = round.cell();

        let report = if resolution.is_correct() {
            self.settle_correct(&round)
        } else {
            self.settle_missed(index, resolution)
        };
        info!(
            index,
            %resolution,
            points = report.points(),
            score = self.score,
            streak = self.streak,
            "Question settled"
        );

        self.events
            .push(BingoEvent::AnswerResolved(Box::new(report.clone())));
        if resolution.is_correct() {
            self.events
                .push(BingoEvent::ScoreChanged { score: self.score });
            if !report.new_lines().is_empty() {
                self.events.push(BingoEvent::LinesCompleted {
                    lines: report.new_lines().clone(),
                    bonus: *report.line_bonus(),
                });
            }
            if *report.completion_bonus() > 0 {
                self.events
                    .push(BingoEvent::BoardCompleted { score: self.score });
            }
        }
        self.last_report = Some(report);
        self.assert_invariants();
    }

    fn settle_missed(&mut self, index: usize, resolution: Resolution) -> BingoAnswerReport {
        self.streak = 0;
        self.cells[index].spend();
        BingoAnswerReport::missed(index, resolution, self.score)
    }

    fn settle_correct(&mut self, round: &QuestionRound) -> BingoAnswerReport {
        let index = round.cell();
        let ctx = AnswerContext::new(
            *round.question().difficulty(),
            round.time_remaining_secs(),
            round.time_limit_secs(),
            self.streak,
            true,
        );
        let scored = score_response(&ctx, &mut self.rng);
        self.streak += 1;

        let earned = scored.total();
        let special = *self.cells[index].special();
        let special_bonus = match special {
            Some(SpecialCell::Bonus) => earned,
            Some(SpecialCell::Mystery) => self.rng.gen_range(MYSTERY_BONUS),
            Some(SpecialCell::Wildcard) | None => 0,
        };
        self.cells[index].reveal();
        self.score += earned + special_bonus;

        let new_lines: Vec<BingoLine> = BingoLine::completed(|i| *self.cells[i].revealed())
            .into_iter()
            .filter(|line| !self.completed.contains(line))
            .collect();
        let line_bonus = LINE_BONUS * new_lines.len() as u32;
        self.completed.extend(new_lines.iter().copied());
        self.score += line_bonus;
        for line in &new_lines {
            info!(%line, "Line completed");
        }

        let completion_bonus = if self.cells.iter().all(|cell| *cell.revealed()) {
            self.phase = BingoPhase::Complete;
            info!(score = self.score + COMPLETION_BONUS, "Board completed");
            COMPLETION_BONUS
        } else {
            0
        };
        self.score += completion_bonus;

        BingoAnswerReport::correct(
            index,
            *scored.breakdown(),
            special,
            special_bonus,
            new_lines,
            line_bonus,
            completion_bonus,
            *scored.earned_power_up(),
            self.score,
            self.streak,
        )
    }

    // ─────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────

    fn ensure_playing(&self) -> Result<(), Rejection> {
        match self.phase {
            BingoPhase::Playing => Ok(()),
            BingoPhase::Building => Err(Rejection::NotPlaying),
            BingoPhase::Complete => Err(Rejection::GameOver),
        }
    }

    fn outcome(&self, result: Result<(), Rejection>) -> CommandOutcome {
        if let Err(reason) = &result {
            debug!(%reason, phase = %self.phase, "Command ignored");
        }
        result.into()
    }

    fn assert_invariants(&self) {
        if cfg!(debug_assertions) {
            if let Err(violations) = BingoInvariants::check_all(self) {
                panic!("Bingo invariants violated: {}", describe(&violations));
            }
        }
    }
}

fn roll_specials<R: Rng + ?Sized>(rng: &mut R) -> [Option<SpecialCell>; CELL_COUNT] {
    let mut specials = [None; CELL_COUNT];
    for (index, special) in specials.iter_mut().enumerate() {
        if index != FREE_CELL_INDEX {
            *special = SpecialCell::roll(rng);
        }
    }
    specials
}

fn layout_cells(
    questions: Vec<Arc<Question>>,
    specials: &[Option<SpecialCell>; CELL_COUNT],
) -> Result<Vec<BingoCell>, BoardError> {
    if questions.len() < CELL_COUNT {
        return Err(BoardError::InsufficientQuestions {
            required: CELL_COUNT,
            available: questions.len(),
        });
    }
    Ok(questions
        .into_iter()
        .take(CELL_COUNT)
        .zip(specials.iter())
        .enumerate()
        .map(|(index, (question, special))| {
            if index == FREE_CELL_INDEX {
                BingoCell::free(question)
            } else {
                BingoCell::new(question, *special)
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::{Category, Difficulty};
    use rand::SeedableRng;

    fn questions(count: usize) -> Vec<Arc<Question>> {
        (0..count)
            .map(|i| {
                Arc::new(Question::new(
                    format!("q{}", i),
                    format!("Question {}?", i),
                    vec!["right".to_string(), "wrong".to_string()],
                    "right".to_string(),
                    Difficulty::Easy,
                    Category::Trivia,
                ))
            })
            .collect()
    }

    fn plain_board() -> BingoBoard {
        let mut board = BingoBoard::with_layout(
            questions(CELL_COUNT),
            [None; CELL_COUNT],
            PowerUps::all(),
            StdRng::seed_from_u64(7),
        )
        .expect("board");
        board.start();
        board
    }

    fn answer(board: &mut BingoBoard, index: usize, choice: &str) {
        assert!(board.open(index).is_accepted(), "open {}", index);
        assert!(board.submit_answer(choice).is_accepted());
    }

    #[test]
    fn test_build_rejects_short_pool() {
        let err = BingoBoard::build(questions(24), PowerUps::all(), StdRng::seed_from_u64(1))
            .expect_err("too few questions");
        assert_eq!(
            err,
            BoardError::InsufficientQuestions {
                required: 25,
                available: 24
            }
        );
    }

    #[test]
    fn test_free_cell_starts_revealed_and_unspecial() {
        let board =
            BingoBoard::build(questions(30), PowerUps::all(), StdRng::seed_from_u64(2)).expect("board");
        let free = &board.cells()[FREE_CELL_INDEX];
        assert!(*free.revealed());
        assert!(free.special().is_none());
        assert_eq!(board.phase(), BingoPhase::Building);
    }

    #[test]
    fn test_commands_ignored_before_start() {
        let mut board =
            BingoBoard::build(questions(25), PowerUps::all(), StdRng::seed_from_u64(2)).expect("board");
        assert_eq!(board.open(0).rejection(), Some(Rejection::NotPlaying));
        assert!(board.start().is_accepted());
        assert_eq!(board.start().rejection(), Some(Rejection::NotPlaying));
    }

    #[test]
    fn test_open_rejections() {
        let mut board = plain_board();
        assert_eq!(board.open(25).rejection(), Some(Rejection::OutOfRange(25)));
        assert_eq!(
            board.open(FREE_CELL_INDEX).rejection(),
            Some(Rejection::CellRevealed(FREE_CELL_INDEX))
        );
        assert!(board.open(0).is_accepted());
        assert_eq!(board.open(1).rejection(), Some(Rejection::RoundOpen));
    }

    #[test]
    fn test_wrong_answer_spends_cell_and_resets_streak() {
        let mut board = plain_board();
        answer(&mut board, 0, "right");
        answer(&mut board, 1, "right");
        assert_eq!(board.streak(), 2);
        answer(&mut board, 2, "wrong");
        assert_eq!(board.streak(), 0);
        assert!(*board.cells()[2].spent());
        assert!(!*board.cells()[2].revealed());
        assert_eq!(board.open(2).rejection(), Some(Rejection::CellSpent(2)));
    }

    #[test]
    fn test_score_only_rises_on_correct_answers() {
        let mut board = plain_board();
        answer(&mut board, 0, "right");
        let after_correct = board.score();
        assert!(after_correct > 0);
        answer(&mut board, 1, "wrong");
        assert_eq!(board.score(), after_correct);
    }

    #[test]
    fn test_line_awarded_once() {
        let mut board = plain_board();
        for index in 0..5 {
            answer(&mut board, index, "right");
        }
        assert!(board.completed_lines().contains(&BingoLine::Row(0)));
        assert_eq!(board.completed_lines().len(), 1);
        let report = board.last_report().expect("report");
        assert_eq!(report.new_lines(), &vec![BingoLine::Row(0)]);
        assert_eq!(*report.line_bonus(), LINE_BONUS);

        answer(&mut board, 5, "right");
        assert_eq!(*board.last_report().expect("report").line_bonus(), 0);
    }

    #[test]
    fn test_full_board_completes_once() {
        let mut board = plain_board();
        for index in (0..CELL_COUNT).filter(|i| *i != FREE_CELL_INDEX) {
            answer(&mut board, index, "right");
        }
        assert_eq!(board.phase(), BingoPhase::Complete);
        assert_eq!(board.completed_lines().len(), 12);

        let completions = board
            .take_events()
            .into_iter()
            .filter(|event| matches!(event, BingoEvent::BoardCompleted { .. }))
            .count();
        assert_eq!(completions, 1);
        assert_eq!(board.open(0).rejection(), Some(Rejection::GameOver));
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let mut board = plain_board();
        board.open(0);
        let stale = board.round().expect("round").key();
        board.submit_answer("right");
        board.open(1);
        assert_eq!(
            board.tick(stale, Duration::from_secs(60)).rejection(),
            Some(Rejection::StaleTimer)
        );
        assert!(board.round().is_some());
    }

    #[test]
    fn test_timeout_spends_cell() {
        let mut board = plain_board();
        board.open(3);
        let key = board.round().expect("round").key();
        assert!(board.tick(key, Duration::from_secs(25)).is_accepted());
        assert!(board.round().is_none());
        assert_eq!(
            *board.last_report().expect("report").resolution(),
            Resolution::TimedOut
        );
        assert!(*board.cells()[3].spent());
    }

    #[test]
    fn test_power_up_is_single_use() {
        let mut board = plain_board();
        assert_eq!(
            board.use_power_up(PowerUpKind::Hint).rejection(),
            Some(Rejection::NoOpenRound)
        );
        board.open(0);
        assert!(board.use_power_up(PowerUpKind::Hint).is_accepted());
        board.submit_answer("right");
        board.open(1);
        assert_eq!(
            board.use_power_up(PowerUpKind::Hint).rejection(),
            Some(Rejection::PowerUpUnavailable)
        );
    }

    #[test]
    fn test_skip_settles_as_missed() {
        let mut board = plain_board();
        board.open(4);
        assert!(board.use_power_up(PowerUpKind::Skip).is_accepted());
        assert!(board.round().is_none());
        assert!(*board.cells()[4].spent());
        assert_eq!(board.tally().answered, 1);
        assert_eq!(board.tally().correct, 0);
    }

    #[test]
    fn test_reset_restores_power_ups() {
        let mut board = plain_board();
        board.open(0);
        board.use_power_up(PowerUpKind::Skip);
        board.reset(questions(25)).expect("reset");
        assert_eq!(board.phase(), BingoPhase::Building);
        assert_eq!(board.score(), 0);
        assert!(board.power_ups().is_available(PowerUpKind::Skip));
        assert!(board.cells().iter().all(|c| !*c.spent()));
    }
}
