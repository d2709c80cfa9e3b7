//! Squares of the 3×3 board.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

use super::types::Board;

/// A square on the Tic-Tac-Toe board (0–8, row-major).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::EnumIter,
)]
pub enum Position {
    /// Top-left (0)
    TopLeft,
    /// Top-center (1)
    TopCenter,
    /// Top-right (2)
    TopRight,
    /// Middle-left (3)
    MiddleLeft,
    /// Center (4)
    Center,
    /// Middle-right (5)
    MiddleRight,
    /// Bottom-left (6)
    BottomLeft,
    /// Bottom-center (7)
    BottomCenter,
    /// Bottom-right (8)
    BottomRight,
}

impl Position {
    /// All 9 positions in index order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }

    /// Board index (0–8).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Position for a board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parses an index (0–8) or a label, case-insensitively.
    #[instrument]
    pub fn from_label_or_number(s: &str) -> Option<Position> {
        let s = s.trim();
        if let Ok(num) = s.parse::<usize>() {
            return Self::from_index(num);
        }
        let lower = s.to_lowercase();
        Self::iter().find(|pos| pos.label().to_lowercase() == lower)
    }

    /// Empty squares on `board`, in index order.
    pub fn valid_moves(board: &Board) -> Vec<Position> {
        Self::ALL
            .iter()
            .copied()
            .filter(|pos| board.is_empty(*pos))
            .collect()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (index, pos) in Position::ALL.iter().enumerate() {
            assert_eq!(pos.to_index(), index);
            assert_eq!(Position::from_index(index), Some(*pos));
        }
        assert_eq!(Position::from_index(9), None);
    }

    #[test]
    fn test_parse_label_or_number() {
        assert_eq!(Position::from_label_or_number("4"), Some(Position::Center));
        assert_eq!(
            Position::from_label_or_number(" bottom-right "),
            Some(Position::BottomRight)
        );
        assert_eq!(Position::from_label_or_number("middle"), None);
    }
}
