//! Milestones unlocked from the saved profile.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::UserProfile;

/// A single-game score above this unlocks [`AchievementKind::WorldCupWinner`].
pub const WORLD_CUP_SCORE: u32 = 300;

/// Tic-Tac-Toe games needed for [`AchievementKind::SeasonTicket`].
pub const SEASON_TICKET_GAMES: usize = 5;

/// Every achievement the profile can unlock.
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
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    /// Play your first game.
    #[strum(to_string = "First Kick")]
    FirstKick,
    /// Get a Bingo score on the board.
    #[strum(to_string = "Bingo Champion")]
    BingoChampion,
    /// Win a Tic-Tac-Toe game.
    #[strum(to_string = "Tactical Genius")]
    TacticalGenius,
    /// Score over 300 in one game.
    #[strum(to_string = "World Cup Winner")]
    WorldCupWinner,
    /// Play five games.
    #[strum(to_string = "Season Ticket")]
    SeasonTicket,
}

impl AchievementKind {
    /// One-line description of the unlock condition.
    pub fn description(self) -> &'static str {
        match self {
            Self::FirstKick => "Play your first game",
            Self::BingoChampion => "Get your first Bingo",
            Self::TacticalGenius => "Win a Tic Tac Toe game",
            Self::WorldCupWinner => "Score over 300 points in one game",
            Self::SeasonTicket => "Play 5 games",
        }
    }

    /// Whether `profile` has met the condition.
    pub fn is_unlocked(self, profile: &UserProfile) -> bool {
        let bingo = *profile.bingo().high_score();
        let tic_tac_toe = *profile.tic_tac_toe().high_score();
        match self {
            // Opening the app counts as the first kick.
            Self::FirstKick => true,
            Self::BingoChampion => bingo > 0,
            Self::TacticalGenius => tic_tac_toe > 0,
            Self::WorldCupWinner => bingo.max(tic_tac_toe) > WORLD_CUP_SCORE,
            Self::SeasonTicket => profile.tic_tac_toe().history().len() >= SEASON_TICKET_GAMES,
        }
    }
}

/// An achievement and whether it is unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Getters)]
pub struct Achievement {
    kind: AchievementKind,
    unlocked: bool,
}

impl Achievement {
    /// Evaluates every kind against `profile`, in display order.
    pub fn evaluate_all(profile: &UserProfile) -> Vec<Self> {
        AchievementKind::iter()
            .map(|kind| Self {
                kind,
                unlocked: kind.is_unlocked(profile),
            })
            .collect()
    }
}
