//! The in-progress attempt at one question.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::power_ups::PowerUpKind;
use crate::questions::Question;
use crate::timers::TimerKey;

/// Seconds added by the extra-time power-up.
pub const EXTRA_TIME_SECS: f64 = 15.0;

/// Number of wrong options removed by 50/50.
const FIFTY_FIFTY_ELIMINATIONS: usize = 2;

/// How an opened question was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Resolution {
    /// Right answer, in time.
    Correct,
    /// Wrong answer.
    Incorrect,
    /// The countdown reached zero.
    #[strum(to_string = "timed out")]
    TimedOut,
    /// Forfeited with the skip power-up.
    Skipped,
}

impl Resolution {
    /// Only [`Resolution::Correct`] scores.
    pub fn is_correct(self) -> bool {
        matches!(self, Resolution::Correct)
    }
}

/// One open question with its countdown and power-up effects.
#[derive(Debug, Clone)]
pub struct QuestionRound {
    key: TimerKey,
    cell: usize,
    question: Arc<Question>,
    time_limit_secs: f64,
    time_remaining_secs: f64,
    eliminated: Vec<String>,
    hint: Option<String>,
    applied: Vec<PowerUpKind>,
    resolution: Option<Resolution>,
}

impl QuestionRound {
    /// Opens a round on `cell` with the question's full time limit.
    #[instrument(skip(question), fields(question = %question.id()))]
    pub fn new(key: TimerKey, cell: usize, question: Arc<Question>) -> Self {
        let time_limit_secs = question.difficulty().time_limit_secs();
        Self {
            key,
            cell,
            question,
            time_limit_secs,
            time_remaining_secs: time_limit_secs,
            eliminated: Vec::new(),
            hint: None,
            applied: Vec::new(),
            resolution: None,
        }
    }

    /// Timer key the countdown for this round runs under.
    pub fn key(&self) -> TimerKey {
        self.key
    }

    /// Board cell the round was opened on.
    pub fn cell(&self) -> usize {
        self.cell
    }

    /// The question being answered.
    pub fn question(&self) -> &Arc<Question> {
        &self.question
    }

    /// Countdown length, not counting extra time.
    pub fn time_limit_secs(&self) -> f64 {
        self.time_limit_secs
    }

    /// Seconds left on the clock.
    pub fn time_remaining_secs(&self) -> f64 {
        self.time_remaining_secs
    }

    /// Options removed by 50/50.
    pub fn eliminated_options(&self) -> &[String] {
        &self.eliminated
    }

    /// Options still on offer.
    pub fn remaining_options(&self) -> Vec<&str> {
        self.question
            .options()
            .iter()
            .filter(|option| !self.eliminated.contains(*option))
            .map(String::as_str)
            .collect()
    }

    /// Clue text, once the hint power-up was used.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Whether `kind` was used during this round.
    pub fn has_applied(&self, kind: PowerUpKind) -> bool {
        self.applied.contains(&kind)
    }

    /// How the round ended, if it has.
    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    /// Whether the round has ended.
    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    /// Runs the countdown down by `elapsed`.
    ///
    /// Returns [`Resolution::TimedOut`] when this tick exhausts the clock.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn tick(&mut self, elapsed: Duration) -> Option<Resolution> {
        if self.is_resolved() {
            return None;
        }
        self.time_remaining_secs -= elapsed.as_secs_f64();
        if self.time_remaining_secs <= 0.0 {
            self.time_remaining_secs = 0.0;
            info!(cell = self.cell, "Question timed out");
            return self.resolve(Resolution::TimedOut);
        }
        None
    }

    /// Settles the round with the player's answer.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn submit(&mut self, choice: &str) -> Option<Resolution> {
        if self.is_resolved() {
            return None;
        }
        let resolution = if self.question.is_correct(choice) {
            Resolution::Correct
        } else {
            Resolution::Incorrect
        };
        self.resolve(resolution)
    }

    /// Applies a power-up effect. Each kind works at most once per round.
    ///
    /// Returns `false` when the round is over or `kind` was already applied.
    #[instrument(skip(self, rng), fields(key = %self.key))]
    pub fn apply_power_up<R: Rng + ?Sized>(&mut self, kind: PowerUpKind, rng: &mut R) -> bool {
        if self.is_resolved() || self.has_applied(kind) {
            return false;
        }
        match kind {
            PowerUpKind::FiftyFifty => {
                self.eliminated = self
                    .question
                    .wrong_options()
                    .map(str::to_string)
                    .choose_multiple(rng, FIFTY_FIFTY_ELIMINATIONS);
            }
            PowerUpKind::ExtraTime => {
                self.time_remaining_secs += EXTRA_TIME_SECS;
            }
            PowerUpKind::Hint => {
                self.hint = Some(hint_for(&self.question, rng));
            }
            PowerUpKind::Skip => {
                self.resolve(Resolution::Skipped);
            }
        }
        self.applied.push(kind);
        debug!(%kind, "Power-up applied");
        true
    }

    fn resolve(&mut self, resolution: Resolution) -> Option<Resolution> {
        self.resolution = Some(resolution);
        Some(resolution)
    }
}

/// Running count of settled rounds on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerTally {
    /// Rounds settled, whatever the resolution.
    pub answered: u32,
    /// Rounds settled as correct.
    pub correct: u32,
}

impl AnswerTally {
    /// Counts one settled round.
    pub fn record(&mut self, resolution: Resolution) {
        self.answered += 1;
        if resolution.is_correct() {
            self.correct += 1;
        }
    }

    /// Share of correct answers in percent.
    pub fn accuracy(&self) -> f64 {
        if self.answered == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(self.answered) * 100.0
        }
    }
}

/// A clue about the correct answer: its first letter or its length.
fn hint_for<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> String {
    let answer = question.correct_answer();
    let Some(first) = answer.chars().next() else {
        return "Think about recent football tournaments and players.".to_string();
    };
    if rng.gen_bool(0.5) {
        format!(
            "The correct answer starts with the letter \"{}\"",
            first.to_uppercase()
        )
    } else {
        format!(
            "The correct answer is {} characters long",
            answer.chars().count()
        )
    }
}
