//! Core domain types for trivia questions.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Difficulty tier of a question.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// 10 base points, 20 seconds.
    Easy,
    /// 20 base points, 30 seconds.
    Medium,
    /// 30 base points, 45 seconds, plus a flat bonus.
    Hard,
}

/// Topic tag of a question.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    /// Individual players.
    Players,
    /// Clubs and national teams.
    Teams,
    /// Tournaments and records.
    History,
    /// Laws of the game.
    Rules,
    /// Everything else.
    Trivia,
}

/// An immutable multiple-choice trivia item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Question {
    /// Unique identifier within a pool.
    id: String,
    /// Prompt shown to the player.
    text: String,
    /// Candidate answers in display order.
    options: Vec<String>,
    /// The option that scores.
    correct_answer: String,
    /// Difficulty tier.
    difficulty: Difficulty,
    /// Topic tag.
    category: Category,
}

impl Question {
    /// Whether `choice` is the correct answer.
    pub fn is_correct(&self, choice: &str) -> bool {
        self.correct_answer == choice
    }

    /// Options other than the correct answer.
    pub fn wrong_options(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .map(String::as_str)
            .filter(|option| *option != self.correct_answer)
    }
}

/// Which board a set of questions is drawn for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// 5×5 Bingo board.
    #[strum(to_string = "Bingo")]
    Bingo,
    /// 3×3 Tic-Tac-Toe board.
    #[strum(to_string = "Tic-Tac-Toe")]
    TicTacToe,
}

impl GameMode {
    /// Number of questions a board of this mode consumes.
    pub fn question_count(self) -> usize {
        match self {
            GameMode::Bingo => 25,
            GameMode::TicTacToe => 9,
        }
    }
}
