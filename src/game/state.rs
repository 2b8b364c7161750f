//! Match state machine
//!
//! [`Match`] is the authoritative record of one game. Every operation checks
//! its preconditions first and only then mutates, so an `Err` return always
//! leaves the match untouched.
//!
//! # Transitions
//!
//! | Operation | From | To |
//! |-----------|------|----|
//! | [`Match::join`] (second seat) | Waiting | Active |
//! | [`Match::make_move`] (king capture, mate, stalemate) | Active | Finished |
//! | [`Match::resign`], [`Match::accept_draw`] | Active | Finished |
//! | [`Match::forfeit_turn`] | Active | Active |

use super::captured::CapturedPieces;
use super::error::{GameError, GameResult};
use super::history::MoveRecord;
use super::types::{MatchStatus, Outcome, Variant, Wager};
use chess_engine::{
    is_king_in_check, position_status, Board, Color, LastMove, PieceKind, PositionStatus, Square,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub code: String,
    pub variant: Variant,
    pub board: Board,
    pub side_to_move: Color,
    pub status: MatchStatus,
    /// Set exactly when `status` is Finished
    pub winner: Option<Outcome>,
    /// Side to move is in check
    pub in_check: bool,
    pub last_move: Option<LastMove>,
    pub draw_offer_by: Option<Color>,
    pub captured: CapturedPieces,
    pub move_count: u32,
    pub turn_started_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub wager: Option<Wager>,
}

/// Result of a committed move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    pub record: MoveRecord,
    /// Present when the move ended the game
    pub outcome: Option<Outcome>,
}

impl Match {
    pub fn new(code: impl Into<String>, variant: Variant, wager: Option<Wager>) -> Self {
        Self::new_at(code, variant, wager, Utc::now())
    }

    /// Same as [`Match::new`] with an explicit creation time
    pub fn new_at(
        code: impl Into<String>,
        variant: Variant,
        wager: Option<Wager>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            code: code.into(),
            variant,
            board: variant.initial_board(),
            side_to_move: Color::White,
            status: MatchStatus::Waiting,
            winner: None,
            in_check: false,
            last_move: None,
            draw_offer_by: None,
            captured: CapturedPieces::default(),
            move_count: 0,
            turn_started_at: now,
            created_at: now,
            white: None,
            black: None,
            wager,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MatchStatus::Active
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn seat(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white.as_deref(),
            Color::Black => self.black.as_deref(),
        }
    }

    /// Color seated under `identity`, if any
    pub fn color_of(&self, identity: &str) -> Option<Color> {
        [Color::White, Color::Black]
            .into_iter()
            .find(|color| self.seat(*color) == Some(identity))
    }

    /// Seat `identity` as `color`
    ///
    /// Returns `true` when this filled the last seat and the match became
    /// Active.
    pub fn join(
        &mut self,
        color: Color,
        identity: impl Into<String>,
        now: DateTime<Utc>,
    ) -> GameResult<bool> {
        let identity = identity.into();
        if self.status != MatchStatus::Waiting {
            return Err(GameError::NotJoinable);
        }
        if self.seat(color).is_some() {
            return Err(GameError::SeatTaken { color });
        }
        if self.seat(color.opposite()) == Some(identity.as_str()) {
            return Err(GameError::AlreadySeated {
                color: color.opposite(),
            });
        }

        debug!("[MATCH] {} seated {} as {}", self.code, identity, color);
        match color {
            Color::White => self.white = Some(identity),
            Color::Black => self.black = Some(identity),
        }

        if self.white.is_some() && self.black.is_some() {
            self.status = MatchStatus::Active;
            self.turn_started_at = now;
            info!("[MATCH] {} is now active", self.code);
            return Ok(true);
        }
        Ok(false)
    }

    /// Play `from` → `to` for the side to move
    ///
    /// `promotion` is required when a pawn reaches its far rank and ignored
    /// otherwise.
    pub fn make_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
        now: DateTime<Utc>,
    ) -> GameResult<PlayedMove> {
        self.ensure_active()?;

        let mover = self.side_to_move;
        let check = self
            .variant
            .check_move(&self.board, from, to, mover, self.last_move.as_ref())
            .map_err(GameError::InvalidMove)?;

        let promotion = if check.promotes {
            let kind = promotion.ok_or(GameError::PromotionRequired)?;
            if !kind.is_promotion_target() {
                return Err(GameError::InvalidPromotion { kind });
            }
            Some(kind)
        } else {
            None
        };

        // Validation done; commit.
        if let Some(piece) = check.captured {
            self.captured.add_capture(piece);
        }
        self.board = self.board.apply(from, to, promotion, check.en_passant);
        self.last_move = Some(LastMove {
            from,
            to,
            piece: check.piece,
        });
        self.move_count += 1;
        self.draw_offer_by = None;
        self.side_to_move = mover.opposite();
        self.turn_started_at = now;

        let king_taken = check.captured.is_some_and(|p| p.kind == PieceKind::King);
        let (outcome, is_checkmate) = if king_taken {
            self.in_check = false;
            (Some(Outcome::Winner(mover)), false)
        } else {
            let status = position_status(&self.board, self.side_to_move, self.last_move.as_ref());
            self.in_check = matches!(status, PositionStatus::Check | PositionStatus::Checkmate);
            match status {
                PositionStatus::Checkmate => (Some(Outcome::Winner(mover)), true),
                PositionStatus::Stalemate => (Some(Outcome::Draw), false),
                PositionStatus::Check | PositionStatus::Ongoing => (None, false),
            }
        };

        debug!(
            "[MATCH] {} {} played {}{} (move {})",
            self.code, mover, from, to, self.move_count
        );

        if let Some(outcome) = outcome {
            self.finish(outcome);
        }

        Ok(PlayedMove {
            record: MoveRecord {
                match_code: self.code.clone(),
                move_number: self.move_count,
                mover,
                from,
                to,
                piece: check.piece,
                captured: check.captured,
                en_passant: check.en_passant,
                board: self.board,
                is_check: self.in_check,
                is_checkmate,
                promotion,
                played_at: now,
            },
            outcome,
        })
    }

    pub fn resign(&mut self, color: Color) -> GameResult<Outcome> {
        self.ensure_active()?;
        let outcome = Outcome::Winner(color.opposite());
        info!("[MATCH] {} {} resigned", self.code, color);
        self.finish(outcome);
        Ok(outcome)
    }

    /// Record a draw offer from `color`, replacing any earlier offer
    pub fn offer_draw(&mut self, color: Color) -> GameResult<()> {
        self.ensure_active()?;
        if self.draw_offer_by != Some(color) {
            debug!("[MATCH] {} draw offered by {}", self.code, color);
            self.draw_offer_by = Some(color);
        }
        Ok(())
    }

    /// Accept the opponent's pending offer
    pub fn accept_draw(&mut self, color: Color) -> GameResult<Outcome> {
        self.ensure_active()?;
        if self.draw_offer_by != Some(color.opposite()) {
            return Err(GameError::NoDrawOffer);
        }
        self.finish(Outcome::Draw);
        Ok(Outcome::Draw)
    }

    /// Reject the opponent's pending offer
    pub fn decline_draw(&mut self, color: Color) -> GameResult<()> {
        self.ensure_active()?;
        if self.draw_offer_by != Some(color.opposite()) {
            return Err(GameError::NoDrawOffer);
        }
        self.draw_offer_by = None;
        Ok(())
    }

    /// The side to move loses its turn without moving
    ///
    /// Never ends the game, even when the new side has no legal move.
    pub fn forfeit_turn(&mut self, now: DateTime<Utc>) -> GameResult<()> {
        self.ensure_active()?;
        let skipped = self.side_to_move;
        self.side_to_move = skipped.opposite();
        self.in_check = is_king_in_check(&self.board, self.side_to_move);
        self.turn_started_at = now;
        info!("[MATCH] {} {} forfeited the turn", self.code, skipped);
        Ok(())
    }

    fn ensure_active(&self) -> GameResult<()> {
        if self.status == MatchStatus::Active {
            Ok(())
        } else {
            Err(GameError::GameNotActive)
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.status = MatchStatus::Finished;
        self.winner = Some(outcome);
        self.draw_offer_by = None;
        info!("[MATCH] {} finished: {}", self.code, outcome);
    }
}
