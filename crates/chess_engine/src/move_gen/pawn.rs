//! Pawn movement
//!
//! ## Pawn Movement Rules
//!
//! - **Forward push**: one row towards the far rank, destination empty
//! - **Double push**: two rows from the start row (6 for White, 1 for Black)
//!   with both the skipped and the destination square empty
//! - **Captures**: one row forward and one column sideways onto an enemy piece
//! - **En passant**: the same diagonal step onto an empty square, allowed only
//!   right after the enemy pawn beside the mover double-stepped
//! - **Promotion**: handled by the game layer when the far rank is reached

use super::{deltas, Shape};
use crate::board::Board;
use crate::types::{Color, LastMove, PieceKind, Square};

pub fn pawn_shape(
    board: &Board,
    color: Color,
    from: Square,
    to: Square,
    last_move: Option<&LastMove>,
) -> Option<Shape> {
    let direction = color.pawn_direction();
    let (d_row, d_col) = deltas(from, to);

    if d_col == 0 {
        if d_row == direction {
            return board.is_empty(to).then_some(Shape::Normal);
        }
        if d_row == 2 * direction && from.row() == color.pawn_start_row() {
            let skipped = from.offset(direction, 0)?;
            return (board.is_empty(skipped) && board.is_empty(to)).then_some(Shape::Normal);
        }
        return None;
    }

    if d_col.abs() != 1 || d_row != direction {
        return None;
    }

    match board.piece_at(to) {
        Some(target) if target.color != color => Some(Shape::Normal),
        Some(_) => None,
        None => is_en_passant(board, color, from, to, last_move).then_some(Shape::EnPassant),
    }
}

/// A pawn of `color` on `from` attacks `target`
///
/// Only the two forward diagonals count; pushes never attack.
pub fn pawn_attacks(color: Color, from: Square, target: Square) -> bool {
    let (d_row, d_col) = deltas(from, target);
    d_row == color.pawn_direction() && d_col.abs() == 1
}

fn is_en_passant(
    board: &Board,
    color: Color,
    from: Square,
    to: Square,
    last_move: Option<&LastMove>,
) -> bool {
    let Some(last) = last_move else {
        return false;
    };
    let Some(passed) = Square::new(from.row(), to.col()) else {
        return false;
    };

    last.is_double_pawn_step()
        && last.piece.color != color
        && last.to == passed
        && board
            .piece_at(passed)
            .is_some_and(|p| p.kind == PieceKind::Pawn && p.color != color)
}
