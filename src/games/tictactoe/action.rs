//! Moves recorded in a game's history.

use serde::{Deserialize, Serialize};

use super::{Mark, Position};

/// A side placing its mark on a square.
///
/// A wrong answer places a computer mark on the square the player opened,
/// so the history alone does not tell whose turn it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Side that claimed the square.
    pub mark: Mark,
    /// Square claimed.
    pub position: Position,
}

impl Move {
    /// Creates a new move.
    pub fn new(mark: Mark, position: Position) -> Self {
        Self { mark, position }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.position.label())
    }
}
