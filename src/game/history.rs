//! Move records
//!
//! One [`MoveRecord`] per committed move. Records are append-only; the store
//! keeps them in the order they were produced.

use chess_engine::{Board, Color, Piece, PieceKind, Square};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub match_code: String,
    /// 1-based ply number
    pub move_number: u32,
    pub mover: Color,
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub en_passant: bool,
    /// Board after the move
    pub board: Board,
    /// Opponent in check after the move
    pub is_check: bool,
    pub is_checkmate: bool,
    pub promotion: Option<PieceKind>,
    pub played_at: DateTime<Utc>,
}

impl fmt::Display for MoveRecord {
    /// Compact coordinate form, e.g. `e7xd8=Q+`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.captured.is_some() { 'x' } else { '-' };
        write!(f, "{}{}{}", self.from, sep, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "={}", Piece::new(kind, Color::White))?;
        }
        if self.is_checkmate {
            write!(f, "#")
        } else if self.is_check {
            write!(f, "+")
        } else {
            Ok(())
        }
    }
}
