//! Movement shapes for each piece type
//!
//! These checks answer "can this piece reach that square by its own movement
//! rule on this board", ignoring whether the move exposes the mover's king.
//! That is the pseudo-legal layer; [`crate::legality`] adds the self-check
//! filter on top.
//!
//! ## Module Structure
//!
//! - `pawn` - Pushes, double steps from the start row, captures, en passant
//! - `knight` - L-shaped jumps
//! - `sliding` - Bishop, rook and queen rays with clear-path checks
//! - `king` - Single steps (no castling)
//! - `attack` - Square attack and check detection reusing the shapes above

pub mod attack;
pub mod king;
pub mod knight;
pub mod pawn;
pub mod sliding;

use crate::board::Board;
use crate::types::{LastMove, Piece, PieceKind, Square};

/// How a pseudo-legal move is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Plain move or capture on the destination square
    Normal,
    /// Pawn capture of the pawn beside it that just double-stepped
    EnPassant,
}

/// Piece-specific shape check
///
/// Returns `None` when `piece` cannot move from `from` to `to`. Own-piece
/// captures are rejected earlier by the caller; this only checks geometry and
/// blocking.
pub fn shape_of(
    board: &Board,
    piece: Piece,
    from: Square,
    to: Square,
    last_move: Option<&LastMove>,
) -> Option<Shape> {
    if from == to {
        return None;
    }

    let reachable = match piece.kind {
        PieceKind::Pawn => return pawn::pawn_shape(board, piece.color, from, to, last_move),
        PieceKind::Knight => knight::is_knight_move(from, to),
        PieceKind::Bishop => sliding::is_bishop_move(board, from, to),
        PieceKind::Rook => sliding::is_rook_move(board, from, to),
        PieceKind::Queen => sliding::is_queen_move(board, from, to),
        PieceKind::King => king::is_king_move(from, to),
    };

    reachable.then_some(Shape::Normal)
}

/// Signed row and column deltas from `from` to `to`
#[inline]
pub(crate) fn deltas(from: Square, to: Square) -> (i8, i8) {
    (
        to.row() as i8 - from.row() as i8,
        to.col() as i8 - from.col() as i8,
    )
}
