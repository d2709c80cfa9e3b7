//! The twelve fixed Bingo lines.

use serde::{Deserialize, Serialize};

/// Cells per side.
pub const BOARD_SIZE: usize = 5;
/// Cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;
/// Center cell, revealed from the start.
pub const FREE_CELL_INDEX: usize = 12;

/// One of the 5 rows, 5 columns or 2 diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BingoLine {
    /// Row 0–4, top to bottom.
    Row(u8),
    /// Column 0–4, left to right.
    Column(u8),
    /// Top-left to bottom-right.
    Diagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

impl BingoLine {
    /// Every line in scan order: rows, columns, then diagonals.
    pub const ALL: [BingoLine; 12] = [
        BingoLine::Row(0),
        BingoLine::Row(1),
        BingoLine::Row(2),
        BingoLine::Row(3),
        BingoLine::Row(4),
        BingoLine::Column(0),
        BingoLine::Column(1),
        BingoLine::Column(2),
        BingoLine::Column(3),
        BingoLine::Column(4),
        BingoLine::Diagonal,
        BingoLine::AntiDiagonal,
    ];

    /// Row-major cell indices on this line.
    pub fn cells(self) -> [usize; BOARD_SIZE] {
        let mut cells = [0; BOARD_SIZE];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = match self {
                BingoLine::Row(row) => usize::from(row) * BOARD_SIZE + i,
                BingoLine::Column(col) => i * BOARD_SIZE + usize::from(col),
                BingoLine::Diagonal => i * BOARD_SIZE + i,
                BingoLine::AntiDiagonal => i * BOARD_SIZE + (BOARD_SIZE - 1 - i),
            };
        }
        cells
    }

    /// Whether `index` lies on this line.
    pub fn contains(self, index: usize) -> bool {
        self.cells().contains(&index)
    }

    /// Lines whose every cell satisfies `revealed`, in scan order.
    pub fn completed(revealed: impl Fn(usize) -> bool) -> Vec<BingoLine> {
        Self::ALL
            .into_iter()
            .filter(|line| line.cells().into_iter().all(&revealed))
            .collect()
    }
}

impl std::fmt::Display for BingoLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BingoLine::Row(row) => write!(f, "row {}", row + 1),
            BingoLine::Column(col) => write!(f, "column {}", col + 1),
            BingoLine::Diagonal => write!(f, "diagonal"),
            BingoLine::AntiDiagonal => write!(f, "anti-diagonal"),
        }
    }
}
