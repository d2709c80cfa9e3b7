//! Game sessions: one board, its question supply and the profile hook.
//!
//! A session owns the board and the RNG used to draw questions. Hosts call
//! [`BingoSession::flush`] / [`TicTacToeSession::flush`] after every command
//! so board events reach the [`ProfileService`].

use std::sync::Arc;

use rand::rngs::StdRng;
use tracing::{debug, info, instrument};

use crate::games::bingo::{BingoBoard, BingoEvent};
use crate::games::tictactoe::{OpponentStrategy, Outcome, TicTacToeBoard, TicTacToeEvent};
use crate::games::{BoardError, CommandOutcome};
use crate::power_ups::PowerUps;
use crate::profile::{GameOutcome, ProfileError, ProfileService};
use crate::questions::{GameMode, QuestionBank};
use crate::timers::TimerKey;

// ─────────────────────────────────────────────────────────────
// Bingo
// ─────────────────────────────────────────────────────────────

/// A Bingo game in progress.
#[derive(Debug)]
pub struct BingoSession {
    bank: Arc<QuestionBank>,
    rng: StdRng,
    board: BingoBoard,
}

impl BingoSession {
    /// Draws 25 questions and starts a board.
    #[instrument(skip_all)]
    pub fn new(
        bank: Arc<QuestionBank>,
        power_ups: PowerUps,
        mut rng: StdRng,
    ) -> Result<Self, BoardError> {
        let questions = bank.draw(GameMode::Bingo, &mut rng);
        let board_rng = derive_rng(&mut rng);
        let mut board = BingoBoard::build(questions, power_ups, board_rng)?;
        board.start();
        info!("Bingo session started");
        Ok(Self { bank, rng, board })
    }

    /// The board.
    pub fn board(&self) -> &BingoBoard {
        &self.board
    }

    /// The board, for commands.
    pub fn board_mut(&mut self) -> &mut BingoBoard {
        &mut self.board
    }

    /// Drains board events, raising the Bingo high score on every score
    /// change. Returns the drained events for display.
    #[instrument(skip_all)]
    pub fn flush(&mut self, profile: &mut ProfileService) -> Result<Vec<BingoEvent>, ProfileError> {
        let events = self.board.take_events();
        for event in &events {
            if let BingoEvent::ScoreChanged { score } = event {
                profile.update_high_score(GameMode::Bingo, *score)?;
            }
        }
        debug!(events = events.len(), "Bingo events flushed");
        Ok(events)
    }

    /// Starts over with a fresh draw.
    #[instrument(skip(self))]
    pub fn restart(&mut self) -> Result<(), BoardError> {
        let questions = self.bank.draw(GameMode::Bingo, &mut self.rng);
        self.board.reset(questions)?;
        self.board.start();
        Ok(())
    }

    /// Brag line for the current score.
    pub fn share_text(&self, profile: &ProfileService) -> String {
        let score = self.board.score();
        let best = score.max(profile.profile().high_score(GameMode::Bingo));
        format!(
            "I scored {} points in Football Bingo Quiz! My high score is {}. Can you beat me?",
            score, best
        )
    }
}

// ─────────────────────────────────────────────────────────────
// Tic-Tac-Toe
// ─────────────────────────────────────────────────────────────

/// A Tic-Tac-Toe game in progress against a computer strategy.
#[derive(Debug)]
pub struct TicTacToeSession {
    bank: Arc<QuestionBank>,
    rng: StdRng,
    board: TicTacToeBoard,
    opponent: Box<dyn OpponentStrategy>,
}

impl TicTacToeSession {
    /// Draws 9 questions and starts a board.
    #[instrument(skip_all, fields(opponent = opponent.name()))]
    pub fn new(
        bank: Arc<QuestionBank>,
        opponent: Box<dyn OpponentStrategy>,
        mut rng: StdRng,
    ) -> Result<Self, BoardError> {
        let questions = bank.draw(GameMode::TicTacToe, &mut rng);
        let board = TicTacToeBoard::new(questions)?;
        info!("Tic-Tac-Toe session started");
        Ok(Self {
            bank,
            rng,
            board,
            opponent,
        })
    }

    /// The board.
    pub fn board(&self) -> &TicTacToeBoard {
        &self.board
    }

    /// The board, for player commands.
    pub fn board_mut(&mut self) -> &mut TicTacToeBoard {
        &mut self.board
    }

    /// Name of the computer strategy.
    pub fn opponent_name(&self) -> &str {
        self.opponent.name()
    }

    /// Plays the scheduled computer move for `key`.
    pub fn computer_move(&mut self, key: TimerKey) -> CommandOutcome {
        self.board.computer_move(key, self.opponent.as_mut())
    }

    /// Forces a computer turn that missed its move.
    pub fn release_stalled_turn(&mut self, key: TimerKey) -> CommandOutcome {
        self.board.release_stalled_turn(key, self.opponent.as_mut())
    }

    /// Begins and plays a computer turn without delay.
    pub fn play_computer_turn(&mut self) -> CommandOutcome {
        self.board.play_computer_turn(self.opponent.as_mut())
    }

    /// Drains board events; a finished game is appended to the history
    /// and may raise the high score.
    #[instrument(skip_all)]
    pub fn flush(
        &mut self,
        profile: &mut ProfileService,
    ) -> Result<Vec<TicTacToeEvent>, ProfileError> {
        let events = self.board.take_events();
        for event in &events {
            if let TicTacToeEvent::GameEnded { outcome, score } = event {
                info!(%outcome, score, "Recording game");
                profile.record_game(GameOutcome::from(*outcome), *score)?;
                profile.update_high_score(GameMode::TicTacToe, *score)?;
            }
        }
        Ok(events)
    }

    /// Starts over with a fresh draw.
    #[instrument(skip(self))]
    pub fn restart(&mut self) -> Result<(), BoardError> {
        let questions = self.bank.draw(GameMode::TicTacToe, &mut self.rng);
        self.board.reset(questions)
    }

    /// Brag line for a finished game, `None` while it is running.
    pub fn share_text(&self, profile: &ProfileService) -> Option<String> {
        let outcome = self.board.outcome()?;
        let score = self.board.score();
        let verdict = match outcome {
            Outcome::PlayerWin => format!("won with {} points!", score),
            Outcome::ComputerWin => "lost, but put up a good fight!".to_string(),
            Outcome::Draw => "played to a draw!".to_string(),
        };
        let best = score.max(profile.profile().high_score(GameMode::TicTacToe));
        Some(format!(
            "I played Football Quiz Tic Tac Toe and {} My high score is {}. Can you beat me?",
            verdict, best
        ))
    }
}

/// Splits an independent stream off `rng` for a board.
fn derive_rng(rng: &mut StdRng) -> StdRng {
    use rand::{RngCore, SeedableRng};
    StdRng::seed_from_u64(rng.next_u64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::FirstAvailable;
    use crate::profile::MemoryStorage;
    use rand::SeedableRng;

    fn bank() -> Arc<QuestionBank> {
        Arc::new(QuestionBank::bundled().expect("bundled pool"))
    }

    #[test]
    fn test_bingo_session_raises_high_score() {
        let mut profile = ProfileService::load(MemoryStorage::new());
        let mut session =
            BingoSession::new(bank(), PowerUps::all(), StdRng::seed_from_u64(1)).expect("session");
        let index = (0..25).find(|i| *i != 12).expect("cell");
        let answer = session.board().cells()[index].question().correct_answer().clone();
        session.board_mut().open(index);
        session.board_mut().submit_answer(&answer);
        session.flush(&mut profile).expect("flush");

        let score = session.board().score();
        assert!(score > 0);
        assert_eq!(profile.profile().high_score(GameMode::Bingo), score);
        assert!(session.share_text(&profile).contains(&format!("scored {} points", score)));
    }

    #[test]
    fn test_tictactoe_session_records_loss() {
        let mut profile = ProfileService::load(MemoryStorage::new());
        let mut session = TicTacToeSession::new(
            bank(),
            Box::new(FirstAvailable),
            StdRng::seed_from_u64(2),
        )
        .expect("session");
        assert!(session.share_text(&profile).is_none());
        for index in [0, 1, 2] {
            session.board_mut().open(index);
            session.board_mut().submit_answer("definitely not an option");
        }
        session.flush(&mut profile).expect("flush");

        assert_eq!(session.board().outcome(), Some(Outcome::ComputerWin));
        let history = profile.profile().tic_tac_toe().history();
        assert_eq!(history.len(), 1);
        assert_eq!(*history[0].result(), GameOutcome::Loss);
        assert!(
            session
                .share_text(&profile)
                .expect("finished")
                .contains("lost, but put up a good fight!")
        );

        session.restart().expect("restart");
        assert!(session.board().history().is_empty());
    }
}
