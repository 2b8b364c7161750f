//! Sliding piece movement
//!
//! Bishops, rooks and queens travel along straight rays and stop at the first
//! occupied square. A move is valid when the destination lies on one of the
//! piece's rays and every square strictly between source and destination is
//! empty. Whether the destination itself may be captured is decided by the
//! caller.

use super::deltas;
use crate::board::Board;
use crate::types::Square;

/// Every square strictly between `from` and `to` is empty
///
/// Only meaningful when the two squares share a row, column or diagonal.
pub fn is_path_clear(board: &Board, from: Square, to: Square) -> bool {
    let (d_row, d_col) = deltas(from, to);
    let step_row = d_row.signum();
    let step_col = d_col.signum();

    let mut current = from.offset(step_row, step_col);
    while let Some(square) = current {
        if square == to {
            return true;
        }
        if !board.is_empty(square) {
            return false;
        }
        current = square.offset(step_row, step_col);
    }

    false
}

pub fn is_bishop_move(board: &Board, from: Square, to: Square) -> bool {
    let (d_row, d_col) = deltas(from, to);
    d_row != 0 && d_row.abs() == d_col.abs() && is_path_clear(board, from, to)
}

pub fn is_rook_move(board: &Board, from: Square, to: Square) -> bool {
    let (d_row, d_col) = deltas(from, to);
    (d_row == 0) != (d_col == 0) && is_path_clear(board, from, to)
}

pub fn is_queen_move(board: &Board, from: Square, to: Square) -> bool {
    is_rook_move(board, from, to) || is_bishop_move(board, from, to)
}
