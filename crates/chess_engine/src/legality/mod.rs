//! Full move legality
//!
//! Wraps the pseudo-legal shape checks from [`crate::move_gen`] with the
//! ownership checks and the self-check filter. The filter applies the move to
//! a copy of the board and rejects it if the mover's king is attacked
//! afterwards, so pins and check evasion fall out without special cases.
//!
//! # Check order
//!
//! 1. Source holds a piece of the side to move
//! 2. Destination does not hold one of the mover's own pieces
//! 3. The piece's movement shape reaches the destination
//! 4. The mover's king is not attacked after the move
//!
//! The first failing step decides the reported [`IllegalMove`].

use crate::board::Board;
use crate::error::{IllegalMove, LegalityResult};
use crate::move_gen::attack::is_king_in_check;
use crate::move_gen::{shape_of, Shape};
use crate::types::{Color, LastMove, Piece, PieceKind, Square};
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

/// Facts about a move that passed every legality check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCheck {
    /// The piece being moved
    pub piece: Piece,
    /// The move is an en passant capture
    pub en_passant: bool,
    /// Piece removed by the move, read before the board changes
    pub captured: Option<Piece>,
    /// A pawn reaches its far rank and needs a promotion piece
    pub promotes: bool,
}

/// Situation of the side to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}

impl PositionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, PositionStatus::Checkmate | PositionStatus::Stalemate)
    }
}

/// Decide whether `side_to_move` may play `from` → `to`
pub fn is_legal(
    board: &Board,
    from: Square,
    to: Square,
    side_to_move: Color,
    last_move: Option<&LastMove>,
) -> LegalityResult {
    let piece = board.piece_at(from).ok_or(IllegalMove::NoPiece)?;
    if piece.color != side_to_move {
        return Err(IllegalMove::NotYourPiece);
    }

    let target = board.piece_at(to);
    if target.is_some_and(|t| t.color == side_to_move) {
        return Err(IllegalMove::CaptureOwnPiece);
    }

    let shape = shape_of(board, piece, from, to, last_move)
        .ok_or(IllegalMove::IllegalShape { kind: piece.kind })?;
    let en_passant = shape == Shape::EnPassant;

    let after = board.apply(from, to, None, en_passant);
    if is_king_in_check(&after, side_to_move) {
        return Err(IllegalMove::LeavesKingInCheck);
    }

    let captured = if en_passant {
        Square::new(from.row(), to.col()).and_then(|passed| board.piece_at(passed))
    } else {
        target
    };

    Ok(MoveCheck {
        piece,
        en_passant,
        captured,
        promotes: piece.kind == PieceKind::Pawn && to.row() == side_to_move.promotion_row(),
    })
}

/// Every square the piece on `from` may legally move to
pub fn legal_destinations(
    board: &Board,
    from: Square,
    side_to_move: Color,
    last_move: Option<&LastMove>,
) -> Vec<Square> {
    Square::all()
        .filter(|to| is_legal(board, from, *to, side_to_move, last_move).is_ok())
        .collect()
}

/// True iff some piece of `color` has at least one legal move
pub fn has_legal_moves(board: &Board, color: Color, last_move: Option<&LastMove>) -> bool {
    board.squares_of(color).any(|(from, _)| {
        Square::all().any(|to| is_legal(board, from, to, color, last_move).is_ok())
    })
}

pub fn is_checkmate(board: &Board, color: Color, last_move: Option<&LastMove>) -> bool {
    is_king_in_check(board, color) && !has_legal_moves(board, color, last_move)
}

pub fn is_stalemate(board: &Board, color: Color, last_move: Option<&LastMove>) -> bool {
    !is_king_in_check(board, color) && !has_legal_moves(board, color, last_move)
}

/// Classify the position for the side now to move
pub fn position_status(board: &Board, color: Color, last_move: Option<&LastMove>) -> PositionStatus {
    let in_check = is_king_in_check(board, color);
    let can_move = has_legal_moves(board, color, last_move);
    match (in_check, can_move) {
        (true, false) => PositionStatus::Checkmate,
        (false, false) => PositionStatus::Stalemate,
        (true, true) => PositionStatus::Check,
        (false, true) => PositionStatus::Ongoing,
    }
}
