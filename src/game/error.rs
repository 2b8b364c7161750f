//! Error types for game module
//!
//! Provides custom error types for match lifecycle operations: move
//! validation, seating, draw handling and state conflicts. Every variant is
//! raised before the match is touched, so a failed operation leaves the match
//! exactly as it was.

use crate::core::StoreError;
use chess_engine::{Color, IllegalMove, PieceKind};

/// Errors that can occur in game logic
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Operation needs an Active match
    #[error("game not active")]
    GameNotActive,

    /// Move rejected by the legality engine
    #[error("invalid move: {0}")]
    InvalidMove(#[source] IllegalMove),

    /// Pawn reached its far rank without a promotion piece
    #[error("promotion piece required")]
    PromotionRequired,

    /// Promotion to a pawn or a king
    #[error("cannot promote to {kind:?}")]
    InvalidPromotion { kind: PieceKind },

    /// Seat already held by another identity
    #[error("{color} seat already taken")]
    SeatTaken { color: Color },

    /// Identity already holds the other seat
    #[error("player already seated as {color}")]
    AlreadySeated { color: Color },

    /// Joining is only possible while Waiting
    #[error("match is not accepting players")]
    NotJoinable,

    /// Accept or decline without an offer from the opponent
    #[error("no draw offer pending")]
    NoDrawOffer,

    /// No match stored under this code
    #[error("match {code} not found")]
    MatchNotFound { code: String },

    /// Seated player acting while the opponent is on move
    #[error("not {color}'s turn")]
    NotYourTurn { color: Color },

    /// Identity is not seated in the match
    #[error("{identity} is not a player in this match")]
    NotAPlayer { identity: String },

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
