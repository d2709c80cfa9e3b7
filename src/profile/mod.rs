//! Persisted player profile: name, high scores and game history.

mod achievements;
mod error;
mod models;
mod service;
mod storage;

pub use achievements::{Achievement, AchievementKind, SEASON_TICKET_GAMES, WORLD_CUP_SCORE};
pub use error::ProfileError;
pub use models::{
    AggregatedStats, BingoRecord, DEFAULT_PLAYER_NAME, GameOutcome, GameRecord, TicTacToeRecord,
    UserProfile,
};
pub use service::ProfileService;
pub use storage::{JsonFileStorage, MemoryStorage, ProfileStorage};
