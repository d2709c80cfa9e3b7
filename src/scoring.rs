//! Points for a single question response.
//!
//! Everything here is a pure function of its inputs apart from
//! [`score_response`], which also rolls the post-answer power-up grant.

use derive_getters::Getters;
use derive_new::new;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::power_ups::PowerUpKind;
use crate::questions::Difficulty;

/// Points awarded per second left on the clock.
pub const TIME_BONUS_PER_SECOND: f64 = 0.5;
/// Fraction of the time limit above which the time bonus becomes a speed bonus.
pub const SPEED_THRESHOLD: f64 = 0.75;
/// Multiplier applied to the time bonus for a fast answer.
pub const SPEED_MULTIPLIER: f64 = 1.5;
/// Streak length at which the streak multiplier starts.
pub const STREAK_THRESHOLD: u32 = 3;
/// Multiplier growth per streak step.
pub const STREAK_STEP: f64 = 0.15;
/// Ceiling on the extra multiplier, so the total never exceeds 3×.
pub const STREAK_MAX_EXTRA: f64 = 2.0;
/// Flat bonus for answering a hard question.
pub const HARD_BONUS: u32 = 15;
/// Chance that a correct answer grants a power-up.
pub const POWER_UP_CHANCE: f64 = 0.3;

impl Difficulty {
    /// Base points for a correct answer.
    pub fn base_points(self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 20,
            Difficulty::Hard => 30,
        }
    }

    /// Countdown length in seconds.
    pub fn time_limit_secs(self) -> f64 {
        match self {
            Difficulty::Easy => 20.0,
            Difficulty::Medium => 30.0,
            Difficulty::Hard => 45.0,
        }
    }
}

/// Inputs to the scoring engine for one response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, new)]
pub struct AnswerContext {
    /// Difficulty of the answered question.
    pub difficulty: Difficulty,
    /// Seconds left when the answer was submitted.
    pub time_remaining_secs: f64,
    /// Countdown length for the question.
    pub time_limit_secs: f64,
    /// Consecutive correct answers before this one.
    pub streak: u32,
    /// Whether the submitted answer was right (and in time).
    pub is_correct: bool,
}

/// The time component of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeBonus {
    /// No time left, or a wrong answer.
    #[default]
    None,
    /// Ordinary time bonus.
    Time(u32),
    /// Boosted bonus for answering in the first quarter of the countdown.
    Speed(u32),
}

impl TimeBonus {
    /// Points contributed.
    pub fn amount(self) -> u32 {
        match self {
            TimeBonus::None => 0,
            TimeBonus::Time(points) | TimeBonus::Speed(points) => points,
        }
    }
}

/// Itemised points for one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct ScoreBreakdown {
    base: u32,
    time_bonus: TimeBonus,
    streak_bonus: u32,
    difficulty_bonus: u32,
}

impl ScoreBreakdown {
    /// Sum of every component.
    pub fn total(&self) -> u32 {
        self.base + self.time_bonus.amount() + self.streak_bonus + self.difficulty_bonus
    }
}

/// Breakdown plus the stochastic power-up grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ScoredAnswer {
    breakdown: ScoreBreakdown,
    earned_power_up: Option<PowerUpKind>,
}

impl ScoredAnswer {
    /// Total points, power-up excluded.
    pub fn total(&self) -> u32 {
        self.breakdown.total()
    }
}

/// Multiplier for a streak of `streak` prior correct answers.
///
/// `1.0` below the threshold, then `1 + min(streak × 0.15, 2)`.
pub fn streak_multiplier(streak: u32) -> f64 {
    if streak < STREAK_THRESHOLD {
        return 1.0;
    }
    1.0 + (f64::from(streak) * STREAK_STEP).min(STREAK_MAX_EXTRA)
}

fn round_points(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}

fn sanitize_secs(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 { secs } else { 0.0 }
}

/// Computes the points for one response.
///
/// Wrong or timed-out answers are worth nothing.
#[instrument]
pub fn score_answer(ctx: &AnswerContext) -> ScoreBreakdown {
    if !ctx.is_correct {
        return ScoreBreakdown::default();
    }

    let base = ctx.difficulty.base_points();
    let remaining = sanitize_secs(ctx.time_remaining_secs);
    let limit = sanitize_secs(ctx.time_limit_secs);

    let raw_time_bonus = round_points(remaining * TIME_BONUS_PER_SECOND);
    let is_fast = limit > 0.0 && remaining / limit > SPEED_THRESHOLD;
    let time_bonus = if is_fast {
        TimeBonus::Speed(round_points(f64::from(raw_time_bonus) * SPEED_MULTIPLIER))
    } else if raw_time_bonus > 0 {
        TimeBonus::Time(raw_time_bonus)
    } else {
        TimeBonus::None
    };

    let streak_bonus = if ctx.streak >= STREAK_THRESHOLD {
        let multiplier = streak_multiplier(ctx.streak);
        round_points(f64::from(base + time_bonus.amount()) * (multiplier - 1.0))
    } else {
        0
    };

    let difficulty_bonus = if ctx.difficulty == Difficulty::Hard {
        HARD_BONUS
    } else {
        0
    };

    let breakdown = ScoreBreakdown {
        base,
        time_bonus,
        streak_bonus,
        difficulty_bonus,
    };
    debug!(total = breakdown.total(), ?breakdown, "Answer scored");
    breakdown
}

/// Scores a response and rolls for a power-up grant on a correct answer.
#[instrument(skip(rng))]
pub fn score_response<R: Rng + ?Sized>(ctx: &AnswerContext, rng: &mut R) -> ScoredAnswer {
    let breakdown = score_answer(ctx);
    let earned_power_up = if ctx.is_correct && rng.gen_bool(POWER_UP_CHANCE) {
        Some(PowerUpKind::random(rng))
    } else {
        None
    };
    ScoredAnswer {
        breakdown,
        earned_power_up,
    }
}
