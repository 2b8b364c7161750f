//! Attack detection and check testing
//!
//! ## Algorithm
//!
//! To check if a square is attacked, we iterate through the attacking side's
//! pieces and ask whether each one's movement shape reaches the square, with
//! clear paths for sliding pieces. Pawns only count along their forward
//! capture diagonals.
//!
//! The board is at most 64 squares, so a straight scan is cheap enough for
//! legality checks and no attack tables are kept.

use super::{king, knight, pawn, sliding};
use crate::board::Board;
use crate::types::{Color, Piece, PieceKind, Square};

/// Check if a square is under attack by pieces of `by_color`
pub fn is_square_attacked(board: &Board, square: Square, by_color: Color) -> bool {
    board
        .squares_of(by_color)
        .any(|(from, piece)| attacks(board, piece, from, square))
}

/// Check whether `color`'s king is attacked
///
/// Returns `false` when the king is not on the board: a captured king is
/// gone, not in check.
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    match board.king_square(color) {
        Some(king_square) => is_square_attacked(board, king_square, color.opposite()),
        None => false,
    }
}

fn attacks(board: &Board, piece: Piece, from: Square, target: Square) -> bool {
    if from == target {
        return false;
    }
    match piece.kind {
        PieceKind::Pawn => pawn::pawn_attacks(piece.color, from, target),
        PieceKind::Knight => knight::is_knight_move(from, target),
        PieceKind::Bishop => sliding::is_bishop_move(board, from, target),
        PieceKind::Rook => sliding::is_rook_move(board, from, target),
        PieceKind::Queen => sliding::is_queen_move(board, from, target),
        PieceKind::King => king::is_king_move(from, target),
    }
}
