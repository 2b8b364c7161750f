//! Captured pieces tracking
//!
//! Tracks pieces captured by each player and the resulting material balance.
//!
//! # Material Advantage
//!
//! Positive advantage means White is ahead, negative means Black is ahead.
//! If White captured (Rook=5, Pawn=1) and Black captured (Knight=3), White's
//! advantage is (5+1) - 3 = +3 pawns.

use chess_engine::{Color, Piece, PieceKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPieces {
    /// Pieces captured by white (black pieces taken)
    pub white_captured: Vec<PieceKind>,
    /// Pieces captured by black (white pieces taken)
    pub black_captured: Vec<PieceKind>,
}

impl CapturedPieces {
    /// Credit a capture to the opponent of the captured piece's color
    pub fn add_capture(&mut self, piece: Piece) {
        match piece.color {
            Color::White => self.black_captured.push(piece.kind),
            Color::Black => self.white_captured.push(piece.kind),
        }
    }

    pub fn captured_by(&self, color: Color) -> &[PieceKind] {
        match color {
            Color::White => &self.white_captured,
            Color::Black => &self.black_captured,
        }
    }

    pub fn material_advantage(&self) -> i32 {
        let score = |pieces: &[PieceKind]| pieces.iter().map(|k| k.value() as i32).sum::<i32>();
        score(&self.white_captured) - score(&self.black_captured)
    }
}
