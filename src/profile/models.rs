//! Persisted profile shape and derived statistics.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::games::tictactoe::Outcome;
use crate::questions::GameMode;

/// Name shown until the player picks one.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Game outcome from the player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    /// Player won the game.
    Win,
    /// Player lost the game.
    Loss,
    /// Game ended in a draw.
    Draw,
}

impl GameOutcome {
    /// The string stored in the profile.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Draw => "draw",
        }
    }
}

impl From<Outcome> for GameOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::PlayerWin => Self::Win,
            Outcome::ComputerWin => Self::Loss,
            Outcome::Draw => Self::Draw,
        }
    }
}

/// One finished Tic-Tac-Toe game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct GameRecord {
    date: DateTime<Utc>,
    result: GameOutcome,
    score: u32,
}

/// Best score for a mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct BingoRecord {
    #[serde(default)]
    high_score: u32,
}

/// Best score and game history for Tic-Tac-Toe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct TicTacToeRecord {
    #[serde(default)]
    high_score: u32,
    #[serde(default)]
    history: Vec<GameRecord>,
}

/// The saved player profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default = "default_player_name")]
    player_name: String,
    #[serde(default)]
    bingo: BingoRecord,
    #[serde(default)]
    tic_tac_toe: TicTacToeRecord,
}

fn default_player_name() -> String {
    DEFAULT_PLAYER_NAME.to_string()
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            player_name: default_player_name(),
            bingo: BingoRecord::default(),
            tic_tac_toe: TicTacToeRecord::default(),
        }
    }
}

impl UserProfile {
    pub(super) fn set_player_name(&mut self, name: String) {
        self.player_name = name;
    }

    /// Raises the mode's high score to `score` if higher.
    pub(super) fn raise_high_score(&mut self, mode: GameMode, score: u32) -> bool {
        let slot = match mode {
            GameMode::Bingo => &mut self.bingo.high_score,
            GameMode::TicTacToe => &mut self.tic_tac_toe.high_score,
        };
        if score > *slot {
            *slot = score;
            true
        } else {
            false
        }
    }

    /// High score for `mode`.
    pub fn high_score(&self, mode: GameMode) -> u32 {
        match mode {
            GameMode::Bingo => self.bingo.high_score,
            GameMode::TicTacToe => self.tic_tac_toe.high_score,
        }
    }

    /// Sum of both high scores.
    pub fn total_points(&self) -> u32 {
        self.bingo.high_score.saturating_add(self.tic_tac_toe.high_score)
    }

    pub(super) fn push_history(&mut self, record: GameRecord) {
        self.tic_tac_toe.history.push(record);
    }

    pub(super) fn clear_scores(&mut self) {
        self.bingo = BingoRecord::default();
        self.tic_tac_toe = TicTacToeRecord::default();
    }
}

/// Aggregated statistics over the Tic-Tac-Toe history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Getters)]
pub struct AggregatedStats {
    total_games: u32,
    wins: u32,
    losses: u32,
    draws: u32,
}

impl AggregatedStats {
    /// Tallies a history.
    #[instrument(skip(history), fields(games = history.len()))]
    pub fn from_history(history: &[GameRecord]) -> Self {
        history.iter().fold(Self::default(), |mut stats, record| {
            stats.total_games += 1;
            match record.result {
                GameOutcome::Win => stats.wins += 1,
                GameOutcome::Loss => stats.losses += 1,
                GameOutcome::Draw => stats.draws += 1,
            }
            stats
        })
    }

    /// Win rate as a percentage (0.0–100.0).
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            (f64::from(self.wins) / f64::from(self.total_games)) * 100.0
        }
    }
}
