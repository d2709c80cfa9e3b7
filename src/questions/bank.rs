//! The question pool and random draws from it.

use std::collections::HashSet;
use std::sync::Arc;

use derive_more::{Display, Error};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, instrument, warn};

use super::{GameMode, Question};

const BUNDLED_QUESTIONS: &str = include_str!("../../data/questions.json");

/// A fixed pool of questions that boards draw from.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Arc<Question>>,
}

impl QuestionBank {
    /// Creates a bank, validating every question.
    ///
    /// # Errors
    ///
    /// Returns [`QuestionBankError`] when an id repeats, a question has no
    /// options, or the correct answer is not one of the options.
    #[instrument(skip(questions), fields(count = questions.len()))]
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        let mut ids = HashSet::new();
        for question in &questions {
            if !ids.insert(question.id().clone()) {
                return Err(QuestionBankError::new(format!(
                    "Duplicate question id '{}'",
                    question.id()
                )));
            }
            if question.options().is_empty() {
                return Err(QuestionBankError::new(format!(
                    "Question '{}' has no options",
                    question.id()
                )));
            }
            if !question.options().contains(question.correct_answer()) {
                return Err(QuestionBankError::new(format!(
                    "Question '{}' lists a correct answer that is not an option",
                    question.id()
                )));
            }
        }

        debug!(count = questions.len(), "Question bank validated");
        Ok(Self {
            questions: questions.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parses a JSON array of questions.
    ///
    /// # Errors
    ///
    /// Returns [`QuestionBankError`] on malformed JSON or invalid questions.
    #[instrument(skip(json), fields(bytes = json.len()))]
    pub fn from_json(json: &str) -> Result<Self, QuestionBankError> {
        let questions: Vec<Question> = serde_json::from_str(json)
            .map_err(|e| QuestionBankError::new(format!("Failed to parse questions: {}", e)))?;
        Self::new(questions)
    }

    /// Reads a JSON question file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`QuestionBankError`] when the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, QuestionBankError> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            QuestionBankError::new(format!("Failed to read question file: {}", e))
        })?;
        let bank = Self::from_json(&json)?;
        info!(count = bank.len(), "Question file loaded");
        Ok(bank)
    }

    /// The football pool shipped with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled asset is broken.
    #[instrument]
    pub fn bundled() -> Result<Self, QuestionBankError> {
        Self::from_json(BUNDLED_QUESTIONS)
    }

    /// Number of questions in the pool.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// All questions in pool order.
    pub fn questions(&self) -> &[Arc<Question>] {
        &self.questions
    }

    /// Draws the questions for one board of `mode`.
    ///
    /// Returns fewer than [`GameMode::question_count`] items when the pool is
    /// too small; board construction rejects a short draw.
    #[instrument(skip(self, rng))]
    pub fn draw<R: Rng + ?Sized>(&self, mode: GameMode, rng: &mut R) -> Vec<Arc<Question>> {
        self.draw_count(mode.question_count(), rng)
    }

    /// Draws `count` questions without replacement.
    #[instrument(skip(self, rng))]
    pub fn draw_count<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Arc<Question>> {
        let mut drawn = self.questions.clone();
        drawn.shuffle(rng);
        drawn.truncate(count);
        if drawn.len() < count {
            warn!(
                requested = count,
                available = drawn.len(),
                "Question pool smaller than requested"
            );
        }
        drawn
    }
}

/// Question bank error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Question bank error: {} at {}:{}", message, file, line)]
pub struct QuestionBankError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl QuestionBankError {
    /// Creates a new error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
