//! Trivia questions and the pool boards draw them from.

mod bank;
mod types;

pub use bank::{QuestionBank, QuestionBankError};
pub use types::{Category, Difficulty, GameMode, Question};
