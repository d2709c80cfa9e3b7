//! The Tic-Tac-Toe board state machine.
//!
//! The player claims a square by answering its question. A miss hands the
//! square to the computer and keeps the turn with the player; a hit passes
//! the turn to the computer, which moves after a host-scheduled delay.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::action::Move;
use super::invariants::TicTacToeInvariants;
use super::opponent::OpponentStrategy;
use super::rules::{check_winner, is_full};
use super::types::{Board, GameStatus, Mark, Outcome, Square, TicTacToeAnswerReport, TicTacToeEvent};
use super::Position;
use crate::games::command::{BoardError, CommandOutcome, Rejection};
use crate::games::invariants::{InvariantSet, describe};
use crate::games::round::{AnswerTally, QuestionRound};
use crate::questions::Question;
use crate::timers::{KeyClock, TimerKey};

/// Squares on the board.
pub const SQUARE_COUNT: usize = 9;
/// Points for a correct answer.
pub const CORRECT_ANSWER_POINTS: u32 = 10;
/// Points lost for a wrong or timed-out answer.
pub const WRONG_ANSWER_PENALTY: u32 = 10;
/// Points lost each time the computer moves.
pub const COMPUTER_MOVE_PENALTY: u32 = 5;
/// Points for completing a line.
pub const PLAYER_WIN_BONUS: u32 = 50;
/// Points lost when the computer completes a line.
pub const COMPUTER_WIN_PENALTY: u32 = 20;

/// A 3×3 board with one question per square.
#[derive(Debug)]
pub struct TicTacToeBoard {
    questions: Vec<Arc<Question>>,
    board: Board,
    turn: Mark,
    score: u32,
    outcome: Option<Outcome>,
    winning_line: Option<[Position; 3]>,
    history: Vec<Move>,
    round: Option<QuestionRound>,
    thinking: bool,
    keys: KeyClock,
    tally: AnswerTally,
    last_report: Option<TicTacToeAnswerReport>,
    events: Vec<TicTacToeEvent>,
}

impl TicTacToeBoard {
    /// Builds a board from the first 9 questions. The player moves first.
    #[instrument(skip(questions), fields(count = questions.len()))]
    pub fn new(questions: Vec<Arc<Question>>) -> Result<Self, BoardError> {
        let questions = take_questions(questions)?;
        info!("Tic-Tac-Toe board built");
        Ok(Self {
            questions,
            board: Board::new(),
            turn: Mark::Player,
            score: 0,
            outcome: None,
            winning_line: None,
            history: Vec::new(),
            round: None,
            thinking: false,
            keys: KeyClock::new(),
            tally: AnswerTally::default(),
            last_report: None,
            events: Vec::new(),
        })
    }

    // ─────────────────────────────────────────────────────────────
    // Player commands
    // ─────────────────────────────────────────────────────────────

    /// Opens the question on square `index` (0–8).
    #[instrument(skip(self))]
    pub fn open(&mut self, index: usize) -> CommandOutcome {
        let result = self.try_open(index);
        self.outcome_of(result)
    }

    fn try_open(&mut self, index: usize) -> Result<(), Rejection> {
        self.ensure_running()?;
        if self.thinking {
            return Err(Rejection::ComputerThinking);
        }
        if self.turn != Mark::Player {
            return Err(Rejection::NotPlayersTurn);
        }
        if self.round.is_some() {
            return Err(Rejection::RoundOpen);
        }
        let position = Position::from_index(index).ok_or(Rejection::OutOfRange(index))?;
        if !self.board.is_empty(position) {
            return Err(Rejection::CellOccupied(index));
        }
        let key = self.keys.advance();
        let question = Arc::clone(&self.questions[index]);
        self.round = Some(QuestionRound::new(key, index, question));
        debug!(%key, %position, "Question opened");
        Ok(())
    }

    /// Runs the open question's countdown, if `key` still names it.
    #[instrument(skip(self))]
    pub fn tick(&mut self, key: TimerKey, elapsed: Duration) -> CommandOutcome {
        let result = self.try_tick(key, elapsed);
        self.outcome_of(result)
    }

    fn try_tick(&mut self, key: TimerKey, elapsed: Duration) -> Result<(), Rejection> {
        self.ensure_running()?;
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
        self.outcome_of(result)
    }

    fn try_submit(&mut self, choice: &str) -> Result<(), Rejection> {
        self.ensure_running()?;
        let round = self.round.as_mut().ok_or(Rejection::NoOpenRound)?;
        round.submit(choice);
        self.settle();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    // Computer turn
    // ─────────────────────────────────────────────────────────────

    /// Starts the computer's thinking phase.
    ///
    /// Returns the key the host schedules the move and the safety deadline
    /// under, or `None` when it is not the computer's turn to start.
    #[instrument(skip(self))]
    pub fn begin_computer_turn(&mut self) -> Option<TimerKey> {
        if self.outcome.is_some() || self.turn != Mark::Computer || self.thinking {
            debug!(turn = %self.turn, thinking = self.thinking, "No computer turn to begin");
            return None;
        }
        self.thinking = true;
        let key = self.keys.advance();
        debug!(%key, "Computer thinking");
        Some(key)
    }

    /// Plays the computer move scheduled under `key`.
    #[instrument(skip(self, strategy), fields(strategy = strategy.name()))]
    pub fn computer_move(
        &mut self,
        key: TimerKey,
        strategy: &mut dyn OpponentStrategy,
    ) -> CommandOutcome {
        let result = self.try_computer_move(key, strategy);
        self.outcome_of(result)
    }

    fn try_computer_move(
        &mut self,
        key: TimerKey,
        strategy: &mut dyn OpponentStrategy,
    ) -> Result<(), Rejection> {
        self.ensure_computer_turn(key)?;
        let position = self.checked_choice(strategy)?;
        self.play_computer(position);
        Ok(())
    }

    /// Safety deadline for the turn under `key`.
    ///
    /// If the computer still has not moved, thinking is forced off and the
    /// move is played now. A strategy that cannot name an empty square is
    /// overridden by the first empty one, so the turn always ends.
    #[instrument(skip(self, strategy), fields(strategy = strategy.name()))]
    pub fn release_stalled_turn(
        &mut self,
        key: TimerKey,
        strategy: &mut dyn OpponentStrategy,
    ) -> CommandOutcome {
        let result = self.try_release(key, strategy);
        self.outcome_of(result)
    }

    fn try_release(
        &mut self,
        key: TimerKey,
        strategy: &mut dyn OpponentStrategy,
    ) -> Result<(), Rejection> {
        self.ensure_computer_turn(key)?;
        let position = match self.checked_choice(strategy) {
            Ok(position) => position,
            Err(reason) => {
                warn!(%reason, "Strategy gave no playable square, using first empty");
                Position::valid_moves(&self.board)
                    .first()
                    .copied()
                    .ok_or(Rejection::NoMoveAvailable)?
            }
        };
        warn!(%key, %position, "Computer turn stalled, move forced");
        self.play_computer(position);
        Ok(())
    }

    /// Begins and immediately plays a computer turn, forcing the move if the
    /// strategy fails.
    #[instrument(skip(self, strategy), fields(strategy = strategy.name()))]
    pub fn play_computer_turn(&mut self, strategy: &mut dyn OpponentStrategy) -> CommandOutcome {
        match self.begin_computer_turn() {
            Some(key) => match self.computer_move(key, strategy) {
                CommandOutcome::Accepted => CommandOutcome::Accepted,
                CommandOutcome::Ignored(_) => self.release_stalled_turn(key, strategy),
            },
            None => {
                let reason = if self.outcome.is_some() {
                    Rejection::GameOver
                } else if self.thinking {
                    Rejection::ComputerThinking
                } else {
                    Rejection::NotComputersTurn
                };
                self.outcome_of(Err(reason))
            }
        }
    }

    fn ensure_computer_turn(&self, key: TimerKey) -> Result<(), Rejection> {
        self.ensure_running()?;
        if !self.keys.is_current(key) {
            return Err(Rejection::StaleTimer);
        }
        if self.turn != Mark::Computer {
            return Err(Rejection::NotComputersTurn);
        }
        Ok(())
    }

    /// Asks the strategy for a square and checks it is empty. Touches no state.
    fn checked_choice(&self, strategy: &mut dyn OpponentStrategy) -> Result<Position, Rejection> {
        let position = strategy
            .choose_move(&self.board)
            .ok_or(Rejection::NoMoveAvailable)?;
        if !self.board.is_empty(position) {
            warn!(%position, "Opponent chose an occupied square");
            return Err(Rejection::CellOccupied(position.to_index()));
        }
        Ok(position)
    }

    fn play_computer(&mut self, position: Position) {
        self.thinking = false;
        self.place(Mark::Computer, position);
        self.score = self.score.saturating_sub(COMPUTER_MOVE_PENALTY);
        self.turn = Mark::Player;
        info!(%position, score = self.score, "Computer moved");
        self.events.push(TicTacToeEvent::ComputerMoved {
            position,
            score: self.score,
        });
        self.evaluate();
        self.assert_invariants();
    }

    // ─────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────

    /// Starts over with fresh questions, dropping any open round or
    /// pending computer turn.
    #[instrument(skip(self, questions), fields(count = questions.len()))]
    pub fn reset(&mut self, questions: Vec<Arc<Question>>) -> Result<(), BoardError> {
        self.questions = take_questions(questions)?;
        self.keys.advance();
        self.board = Board::new();
        self.turn = Mark::Player;
        self.score = 0;
        self.outcome = None;
        self.winning_line = None;
        self.history.clear();
        self.round = None;
        self.thinking = false;
        self.tally = AnswerTally::default();
        self.last_report = None;
        self.events.clear();
        info!("Tic-Tac-Toe board reset");
        Ok(())
    }

    /// Drains pending events in emission order.
    pub fn take_events(&mut self) -> Vec<TicTacToeEvent> {
        std::mem::take(&mut self.events)
    }

    // ─────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────

    /// The grid of marks.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Question behind each square, row-major.
    pub fn questions(&self) -> &[Arc<Question>] {
        &self.questions
    }

    /// Whose turn it is.
    pub fn turn(&self) -> Mark {
        self.turn
    }

    /// Current score, never negative.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// How the game ended, once it has.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Running or finished, with whose turn it is.
    pub fn status(&self) -> GameStatus {
        match self.outcome {
            Some(outcome) => GameStatus::Finished(outcome),
            None => GameStatus::InProgress(self.turn),
        }
    }

    /// The completed triple on a win.
    pub fn winning_line(&self) -> Option<[Position; 3]> {
        self.winning_line
    }

    /// Marks in the order they were placed.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The open question, if any.
    pub fn round(&self) -> Option<&QuestionRound> {
        self.round.as_ref()
    }

    /// Whether a computer move is pending.
    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    /// Correct and answered counts.
    pub fn tally(&self) -> AnswerTally {
        self.tally
    }

    /// Report for the most recently settled question.
    pub fn last_report(&self) -> Option<&TicTacToeAnswerReport> {
        self.last_report.as_ref()
    }

    /// Whether the game has ended.
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
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
        let Some(position) = Position::from_index(round.cell()) else {
            return;
        };

        let before = self.score;
        if resolution.is_correct() {
            self.place(Mark::Player, position);
            self.score += CORRECT_ANSWER_POINTS;
            self.turn = Mark::Computer;
        } else {
            self.place(Mark::Computer, position);
            self.score = self.score.saturating_sub(WRONG_ANSWER_PENALTY);
            self.turn = Mark::Player;
        }
        let delta = self.score as i32 - before as i32;
        info!(%position, %resolution, delta, score = self.score, "Question settled");

        let report = TicTacToeAnswerReport::new(position, resolution, delta, self.score);
        self.events.push(TicTacToeEvent::AnswerResolved(report));
        self.last_report = Some(report);
        self.evaluate();
        self.assert_invariants();
    }

    fn place(&mut self, mark: Mark, position: Position) {
        self.board.set(position, Square::Occupied(mark));
        self.history.push(Move::new(mark, position));
    }

    fn evaluate(&mut self) {
        let outcome = if let Some((mark, line)) = check_winner(&self.board) {
            self.winning_line = Some(line);
            match mark {
                Mark::Player => {
                    self.score += PLAYER_WIN_BONUS;
                    Outcome::PlayerWin
                }
                Mark::Computer => {
                    self.score = self.score.saturating_sub(COMPUTER_WIN_PENALTY);
                    Outcome::ComputerWin
                }
            }
        } else if is_full(&self.board) {
            Outcome::Draw
        } else {
            return;
        };
        self.outcome = Some(outcome);
        self.thinking = false;
        info!(%outcome, score = self.score, "Game ended");
        self.events.push(TicTacToeEvent::GameEnded {
            outcome,
            score: self.score,
        });
    }

    // ─────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────

    fn ensure_running(&self) -> Result<(), Rejection> {
        if self.outcome.is_some() {
            Err(Rejection::GameOver)
        } else {
            Ok(())
        }
    }

    fn outcome_of(&self, result: Result<(), Rejection>) -> CommandOutcome {
        if let Err(reason) = &result {
            debug!(%reason, turn = %self.turn, "Command ignored");
        }
        result.into()
    }

    fn assert_invariants(&self) {
        if cfg!(debug_assertions) {
            if let Err(violations) = TicTacToeInvariants::check_all(self) {
                panic!("Tic-Tac-Toe invariants violated: {}", describe(&violations));
            }
        }
    }
}

fn take_questions(questions: Vec<Arc<Question>>) -> Result<Vec<Arc<Question>>, BoardError> {
    if questions.len() < SQUARE_COUNT {
        return Err(BoardError::InsufficientQuestions {
            required: SQUARE_COUNT,
            available: questions.len(),
        });
    }
    Ok(questions.into_iter().take(SQUARE_COUNT).collect())
}
