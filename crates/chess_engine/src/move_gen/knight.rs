//! Knight movement
//!
//! Knights jump two squares in one direction and one square perpendicular to
//! it. They ignore anything standing in between.

use super::deltas;
use crate::types::Square;

pub fn is_knight_move(from: Square, to: Square) -> bool {
    let (d_row, d_col) = deltas(from, to);
    matches!((d_row.abs(), d_col.abs()), (1, 2) | (2, 1))
}
