//! Profile business logic over a [`ProfileStorage`].

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use super::{
    Achievement, AggregatedStats, DEFAULT_PLAYER_NAME, GameOutcome, GameRecord, ProfileError, ProfileStorage,
    UserProfile,
};
use crate::questions::GameMode;

/// Owns the loaded profile and writes it back after every change.
#[derive(Debug)]
pub struct ProfileService {
    storage: Box<dyn ProfileStorage>,
    profile: UserProfile,
}

impl ProfileService {
    /// Loads the profile, falling back to defaults when it is missing,
    /// unreadable or corrupt.
    #[instrument(skip(storage))]
    pub fn load(storage: impl ProfileStorage + 'static) -> Self {
        let profile = match storage.load_blob() {
            Ok(Some(blob)) => match serde_json::from_str::<UserProfile>(&blob) {
                Ok(profile) => {
                    info!(player = %profile.player_name(), "Profile loaded");
                    profile
                }
                Err(err) => {
                    warn!(error = %err, "Corrupt profile discarded");
                    UserProfile::default()
                }
            },
            Ok(None) => {
                debug!("No saved profile, using defaults");
                UserProfile::default()
            }
            Err(err) => {
                warn!(error = %err, "Profile unreadable, using defaults");
                UserProfile::default()
            }
        };
        Self {
            storage: Box::new(storage),
            profile,
        }
    }

    /// The current profile.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Win/loss/draw totals over the Tic-Tac-Toe history.
    #[instrument(skip(self))]
    pub fn stats(&self) -> AggregatedStats {
        AggregatedStats::from_history(self.profile.tic_tac_toe().history())
    }

    /// Every achievement with its unlock state.
    #[instrument(skip(self))]
    pub fn achievements(&self) -> Vec<Achievement> {
        let achievements = Achievement::evaluate_all(&self.profile);
        debug!(
            unlocked = achievements.iter().filter(|a| *a.unlocked()).count(),
            "Achievements evaluated"
        );
        achievements
    }

    /// Renames the player. A blank name restores the default.
    #[instrument(skip(self, name))]
    pub fn set_name(&mut self, name: impl AsRef<str>) -> Result<(), ProfileError> {
        let trimmed = name.as_ref().trim();
        let name = if trimmed.is_empty() {
            DEFAULT_PLAYER_NAME
        } else {
            trimmed
        };
        info!(name = %name, "Setting player name");
        self.profile.set_player_name(name.to_string());
        self.save()
    }

    /// Raises the high score for `mode` if `score` beats it.
    ///
    /// Returns whether the record changed; nothing is written otherwise.
    #[instrument(skip(self))]
    pub fn update_high_score(&mut self, mode: GameMode, score: u32) -> Result<bool, ProfileError> {
        if !self.profile.raise_high_score(mode, score) {
            debug!(best = self.profile.high_score(mode), "Not a new high score");
            return Ok(false);
        }
        info!(%mode, score, "New high score");
        self.save()?;
        Ok(true)
    }

    /// Appends a finished Tic-Tac-Toe game to the history.
    #[instrument(skip(self))]
    pub fn append_history(&mut self, record: GameRecord) -> Result<(), ProfileError> {
        self.profile.push_history(record);
        self.save()
    }

    /// Records a Tic-Tac-Toe result stamped with the current time.
    #[instrument(skip(self))]
    pub fn record_game(&mut self, result: GameOutcome, score: u32) -> Result<(), ProfileError> {
        self.append_history(GameRecord::new(Utc::now(), result, score))
    }

    /// Clears high scores and history, keeping the name.
    #[instrument(skip(self))]
    pub fn reset_scores(&mut self) -> Result<(), ProfileError> {
        info!("Resetting scores");
        self.profile.clear_scores();
        self.save()
    }

    fn save(&mut self) -> Result<(), ProfileError> {
        let blob = serde_json::to_string_pretty(&self.profile)?;
        self.storage.save_blob(&blob)
    }
}
