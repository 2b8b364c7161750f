//! Error types for chess engine
//!
//! [`IllegalMove`] carries the reason a candidate move was rejected. The
//! variants follow the order of the legality checks, so the first failing
//! check decides which one is reported.

use crate::legality::MoveCheck;
use crate::types::PieceKind;
use thiserror::Error;

/// Reasons a move fails legality
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    /// Source square is empty
    #[error("no piece")]
    NoPiece,

    /// Source piece belongs to the side not on move
    #[error("not your piece")]
    NotYourPiece,

    /// Destination holds a piece of the mover's color
    #[error("cannot capture own piece")]
    CaptureOwnPiece,

    /// Destination is not reachable with this piece's movement shape
    #[error("{kind:?} cannot move that way")]
    IllegalShape { kind: PieceKind },

    /// Move would leave (or keep) the mover's king attacked
    #[error("leaves king in check")]
    LeavesKingInCheck,
}

/// Result type alias for legality queries
pub type LegalityResult = Result<MoveCheck, IllegalMove>;
