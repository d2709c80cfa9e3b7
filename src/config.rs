//! Game configuration loaded from TOML.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

use crate::games::tictactoe::OpponentKind;
use crate::power_ups::{PowerUpKind, PowerUps};
use crate::questions::QuestionBank;

/// Settings for a play session.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct GameConfig {
    /// Where the profile JSON is kept.
    #[serde(default = "default_profile_path")]
    profile_path: PathBuf,

    /// Computer strategy for Tic-Tac-Toe.
    #[serde(default)]
    opponent: OpponentKind,

    /// Fixed RNG seed for reproducible games.
    #[serde(default)]
    seed: Option<u64>,

    /// Shortest computer thinking delay.
    #[serde(default = "default_thinking_min_ms")]
    thinking_min_ms: u64,

    /// Longest computer thinking delay (exclusive).
    #[serde(default = "default_thinking_max_ms")]
    thinking_max_ms: u64,

    /// Deadline after which a stalled computer turn is forced.
    #[serde(default = "default_safety_timeout_ms")]
    safety_timeout_ms: u64,

    /// Countdown tick period.
    #[serde(default = "default_tick_interval_ms")]
    tick_interval_ms: u64,

    /// Power-ups each Bingo board starts with.
    #[serde(default = "default_power_ups")]
    power_ups: Vec<PowerUpKind>,

    /// Custom question pool; the bundled pool is used when unset.
    #[serde(default)]
    questions_path: Option<PathBuf>,
}

fn default_profile_path() -> PathBuf {
    PathBuf::from("football_quiz_profile.json")
}

fn default_thinking_min_ms() -> u64 {
    500
}

fn default_thinking_max_ms() -> u64 {
    1000
}

fn default_safety_timeout_ms() -> u64 {
    3000
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_power_ups() -> Vec<PowerUpKind> {
    PowerUpKind::iter().collect()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            profile_path: default_profile_path(),
            opponent: OpponentKind::default(),
            seed: None,
            thinking_min_ms: default_thinking_min_ms(),
            thinking_max_ms: default_thinking_max_ms(),
            safety_timeout_ms: default_safety_timeout_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            power_ups: default_power_ups(),
            questions_path: None,
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(opponent = %config.opponent, seed = ?config.seed, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.thinking_min_ms >= self.thinking_max_ms {
            return Err(ConfigError::new(format!(
                "thinking_min_ms ({}) must be below thinking_max_ms ({})",
                self.thinking_min_ms, self.thinking_max_ms
            )));
        }
        if self.safety_timeout_ms < self.thinking_max_ms {
            return Err(ConfigError::new(format!(
                "safety_timeout_ms ({}) must be at least thinking_max_ms ({})",
                self.safety_timeout_ms, self.thinking_max_ms
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::new("tick_interval_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// A random thinking delay in `[thinking_min_ms, thinking_max_ms)`.
    pub fn thinking_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let max = self.thinking_max_ms.max(self.thinking_min_ms + 1);
        Duration::from_millis(rng.gen_range(self.thinking_min_ms..max))
    }

    /// The safety deadline as a duration.
    pub fn safety_timeout(&self) -> Duration {
        Duration::from_millis(self.safety_timeout_ms)
    }

    /// The countdown tick period as a duration.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Power-up flags for a new Bingo board.
    pub fn starting_power_ups(&self) -> PowerUps {
        PowerUps::from_kinds(self.power_ups.iter().copied())
    }

    /// A seeded RNG when a seed is configured, else one from the OS.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Independent streams for one Tic-Tac-Toe game.
    ///
    /// With a seed, each stream is seeded from a master generator so a run
    /// stays reproducible without the streams mirroring each other.
    #[instrument(skip(self))]
    pub fn rng_streams(&self) -> RngStreams {
        match self.seed {
            Some(seed) => {
                let mut master = StdRng::seed_from_u64(seed);
                let session = StdRng::seed_from_u64(master.next_u64());
                let delay = StdRng::seed_from_u64(master.next_u64());
                let opponent_seed = master.next_u64();
                debug!(seed, "Split seeded RNG streams");
                RngStreams {
                    session,
                    delay,
                    opponent_seed: Some(opponent_seed),
                }
            }
            None => RngStreams {
                session: StdRng::from_entropy(),
                delay: StdRng::from_entropy(),
                opponent_seed: None,
            },
        }
    }

    /// The configured question pool.
    #[instrument(skip(self))]
    pub fn question_bank(&self) -> Result<Arc<QuestionBank>, ConfigError> {
        let bank = match &self.questions_path {
            Some(path) => QuestionBank::from_file(path),
            None => QuestionBank::bundled(),
        }
        .map_err(|e| ConfigError::new(format!("Failed to load questions: {}", e)))?;
        Ok(Arc::new(bank))
    }
}

/// Per-purpose RNGs derived from one [`GameConfig`].
#[derive(Debug)]
pub struct RngStreams {
    /// Question draws and board layout.
    pub session: StdRng,
    /// Computer thinking delays.
    pub delay: StdRng,
    /// Seed for a random opponent; `None` draws from the OS.
    pub opponent_seed: Option<u64>,
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
