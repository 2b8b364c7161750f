//! King movement
//!
//! One square in any direction. Castling is not part of the rule set.

use super::deltas;
use crate::types::Square;

pub fn is_king_move(from: Square, to: Square) -> bool {
    let (d_row, d_col) = deltas(from, to);
    from != to && d_row.abs() <= 1 && d_col.abs() <= 1
}
