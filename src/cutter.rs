//! First-fit-decreasing packing of strip lengths onto boards of one length.
//!
//! This is a heuristic, not an exact 1-D bin-packing solver: pieces are sorted
//! longest first and each goes into the first open board with room for it
//! plus one kerf.

use crate::types::{BoardLayout, EPSILON, PlacedPiece};

#[derive(Debug, Clone)]
pub struct OpenBoard {
    length: f64,
    kerf: f64,
    pub pieces: Vec<PlacedPiece>,
}

impl OpenBoard {
    pub fn new(length: f64, kerf: f64) -> Self {
        Self {
            length,
            kerf,
            pieces: Vec::new(),
        }
    }

    /// Sum of piece lengths plus one kerf between adjacent pieces.
    pub fn used_length(&self) -> f64 {
        let pieces: f64 = self.pieces.iter().map(|p| p.length).sum();
        let kerfs = self.pieces.len().saturating_sub(1) as f64 * self.kerf;
        pieces + kerfs
    }

    pub fn fits(&self, length: f64) -> bool {
        let needed = if self.pieces.is_empty() {
            length
        } else {
            self.used_length() + self.kerf + length
        };
        needed <= self.length + EPSILON
    }

    pub fn place(&mut self, piece: PlacedPiece) {
        self.pieces.push(piece);
    }

    pub fn into_layout(self) -> BoardLayout {
        let used_length = self.used_length();
        BoardLayout {
            waste: (self.length - used_length).max(0.0),
            used_length,
            pieces: self.pieces,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LengthCutter {
    board_length: f64,
    kerf: f64,
}

impl LengthCutter {
    pub fn new(board_length: f64, kerf: f64) -> Self {
        Self { board_length, kerf }
    }

    /// Packs `pieces` onto as few boards as the heuristic finds. Every piece
    /// must be no longer than the board.
    pub fn pack(&self, mut pieces: Vec<PlacedPiece>) -> Vec<BoardLayout> {
        // Stable sort: equal lengths keep their assignment order.
        pieces.sort_by(|a, b| b.length.total_cmp(&a.length));

        let mut boards: Vec<OpenBoard> = Vec::new();
        for piece in pieces {
            match boards.iter_mut().find(|b| b.fits(piece.length)) {
                Some(board) => board.place(piece),
                None => {
                    let mut board = OpenBoard::new(self.board_length, self.kerf);
                    board.place(piece);
                    boards.push(board);
                }
            }
        }

        boards.into_iter().map(OpenBoard::into_layout).collect()
    }
}
