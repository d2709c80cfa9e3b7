//! Football Quiz - trivia Bingo and Tic-Tac-Toe engines
//!
//! Two quiz games over a shared football question pool, with a scoring
//! engine, cancellable timers and a persisted player profile.
//!
//! # Architecture
//!
//! - **Questions**: the question pool and per-game draws
//! - **Scoring**: points for one response (base, time, streak, difficulty)
//! - **Games**: the Bingo and Tic-Tac-Toe board state machines
//! - **Timers**: keyed, cancellable delayed events for countdowns and CPU turns
//! - **Profile**: name, high scores and game history, saved as JSON
//! - **Session**: one board wired to the profile
//!
//! # Example
//!
//! ```no_run
//! use football_quiz::{BingoSession, MemoryStorage, PowerUps, ProfileService, QuestionBank};
//! use rand::SeedableRng;
//! use std::sync::Arc;
//!
//! # fn example() -> anyhow::Result<()> {
//! let bank = Arc::new(QuestionBank::bundled()?);
//! let mut profile = ProfileService::load(MemoryStorage::new());
//! let mut session = BingoSession::new(bank, PowerUps::all(), rand::rngs::StdRng::seed_from_u64(7))?;
//!
//! session.board_mut().open(0);
//! session.board_mut().submit_answer("Brazil");
//! session.flush(&mut profile)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod games;
mod power_ups;
mod profile;
mod questions;
mod scoring;
mod session;
mod timers;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig, RngStreams};

// Crate-level exports - Shared board types
pub use games::{
    AnswerTally, BoardError, CommandOutcome, EXTRA_TIME_SECS, Invariant, InvariantSet,
    InvariantViolation, QuestionRound, Rejection, Resolution,
};

// Crate-level exports - Bingo
pub use games::bingo::{
    BOARD_SIZE, BingoAnswerReport, BingoBoard, BingoCell, BingoEvent, BingoInvariants, BingoLine,
    BingoPhase, CELL_COUNT, COMPLETION_BONUS, CompletedLinesRevealed, FREE_CELL_INDEX,
    FreeCellRevealed, LINE_BONUS, MYSTERY_BONUS, RevealedCellsNotSpent, SPECIAL_CELL_CHANCE,
    SpecialCell,
};

// Crate-level exports - Tic-Tac-Toe
pub use games::tictactoe::{
    Board, COMPUTER_MOVE_PENALTY, COMPUTER_WIN_PENALTY, CORRECT_ANSWER_POINTS, FirstAvailable,
    GameStatus, HistoryMatchesBoard, Mark, Move, OpponentKind, OpponentStrategy, Outcome,
    OutcomeConsistent, PLAYER_WIN_BONUS, Position, RandomOpponent, SQUARE_COUNT, Square,
    ThinkingOnComputerTurn, TicTacToeAnswerReport, TicTacToeBoard, TicTacToeEvent,
    TicTacToeInvariants, WRONG_ANSWER_PENALTY,
};

// Crate-level exports - Power-ups
pub use power_ups::{PowerUpKind, PowerUps};

// Crate-level exports - Profile
pub use profile::{
    Achievement, AchievementKind, AggregatedStats, BingoRecord, DEFAULT_PLAYER_NAME, GameOutcome,
    GameRecord, JsonFileStorage, MemoryStorage, ProfileError, ProfileService, ProfileStorage,
    SEASON_TICKET_GAMES, TicTacToeRecord, UserProfile, WORLD_CUP_SCORE,
};

// Crate-level exports - Questions
pub use questions::{Category, Difficulty, GameMode, Question, QuestionBank, QuestionBankError};

// Crate-level exports - Scoring
pub use scoring::{
    AnswerContext, ScoreBreakdown, ScoredAnswer, TimeBonus, score_answer, score_response,
    streak_multiplier,
};

// Crate-level exports - Sessions
pub use session::{BingoSession, TicTacToeSession};

// Crate-level exports - Timers
pub use timers::{Fired, KeyClock, TimerKey, TimerQueue};
