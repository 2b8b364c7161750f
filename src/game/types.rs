//! Match-level value types
//!
//! Lifecycle status, outcomes, the variant dispatch enum and the wager record.

use chess_engine::{is_legal, Board, Color, LastMove, LegalityResult, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Game-side lifecycle, one-directional: Waiting → Active → Finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Seats still open
    Waiting,
    /// Both seats filled, moves accepted
    Active,
    /// Terminal; `winner` is set
    Finished,
}

/// How a finished match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Color),
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Winner(color) => write!(f, "{color} wins"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// Game type played in a match
///
/// Only standard chess exists. Rules queries go through the variant so the
/// state machine never names the engine directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Standard,
}

impl Variant {
    pub fn initial_board(self) -> Board {
        match self {
            Variant::Standard => Board::initial(),
        }
    }

    pub fn check_move(
        self,
        board: &Board,
        from: Square,
        to: Square,
        side: Color,
        last_move: Option<&LastMove>,
    ) -> LegalityResult {
        match self {
            Variant::Standard => is_legal(board, from, to, side, last_move),
        }
    }
}

/// Local view of the escrowed wager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowStatus {
    /// Recorded, not yet settled
    Pending,
    Settled,
    Refunded,
    /// Last settlement attempt failed; eligible for retry
    Failed,
}

impl EscrowStatus {
    pub fn is_final(self) -> bool {
        matches!(self, EscrowStatus::Settled | EscrowStatus::Refunded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wager {
    /// Stake per player in the token's smallest unit
    pub amount: u64,
    pub token: String,
    pub escrow_status: EscrowStatus,
}

impl Wager {
    pub fn new(amount: u64, token: impl Into<String>) -> Self {
        Self {
            amount,
            token: token.into(),
            escrow_status: EscrowStatus::Pending,
        }
    }
}
