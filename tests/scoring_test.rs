//! Scoring engine scenarios.

use football_quiz::{AnswerContext, Difficulty, TimeBonus, score_answer, streak_multiplier};

#[test]
fn test_quick_easy_answer_earns_speed_bonus() {
    let ctx = AnswerContext::new(Difficulty::Easy, 18.0, 20.0, 0, true);
    let breakdown = score_answer(&ctx);
    assert_eq!(*breakdown.base(), 10);
    assert_eq!(*breakdown.time_bonus(), TimeBonus::Speed(14));
    assert_eq!(breakdown.total(), 24);
}

#[test]
fn test_hard_answer_on_a_streak() {
    let ctx = AnswerContext::new(Difficulty::Hard, 10.0, 45.0, 5, true);
    let breakdown = score_answer(&ctx);
    assert_eq!(*breakdown.base(), 30);
    assert_eq!(*breakdown.time_bonus(), TimeBonus::Time(5));
    assert_eq!(*breakdown.streak_bonus(), 26);
    assert_eq!(*breakdown.difficulty_bonus(), 15);
    assert_eq!(breakdown.total(), 76);
}

#[test]
fn test_wrong_answer_is_worth_nothing() {
    let ctx = AnswerContext::new(Difficulty::Hard, 44.0, 45.0, 9, false);
    assert_eq!(score_answer(&ctx).total(), 0);
}

#[test]
fn test_streak_multiplier_steps() {
    assert_eq!(streak_multiplier(0), 1.0);
    assert_eq!(streak_multiplier(2), 1.0);
    assert!((streak_multiplier(3) - 1.45).abs() < 1e-9);
    assert_eq!(streak_multiplier(14), 3.0);
}
