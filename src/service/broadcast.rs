//! Event fan-out
//!
//! Every committed change is published as a [`MatchEvent`]. Publishing is fire
//! and forget: a slow or absent listener never blocks a move.

use crate::game::{CapturedPieces, EscrowStatus, Match, MatchStatus, Outcome};
use chess_engine::{Board, Color, LastMove};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

/// Client-facing view of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub code: String,
    pub status: MatchStatus,
    pub board: Board,
    pub side_to_move: Color,
    pub winner: Option<Outcome>,
    pub in_check: bool,
    pub last_move: Option<LastMove>,
    pub draw_offer_by: Option<Color>,
    pub captured: CapturedPieces,
    pub move_count: u32,
    pub turn_started_at: DateTime<Utc>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub escrow_status: Option<EscrowStatus>,
}

impl From<&Match> for MatchSnapshot {
    fn from(m: &Match) -> Self {
        Self {
            code: m.code.clone(),
            status: m.status,
            board: m.board,
            side_to_move: m.side_to_move,
            winner: m.winner,
            in_check: m.in_check,
            last_move: m.last_move,
            draw_offer_by: m.draw_offer_by,
            captured: m.captured.clone(),
            move_count: m.move_count,
            turn_started_at: m.turn_started_at,
            white: m.white.clone(),
            black: m.black.clone(),
            escrow_status: m.wager.as_ref().map(|w| w.escrow_status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// State after a committed change
    Updated(MatchSnapshot),
    /// Countdown for the side to move
    ClockTick {
        code: String,
        side: Color,
        remaining_secs: u64,
    },
    /// Local escrow status changed
    Settlement {
        code: String,
        escrow_status: EscrowStatus,
    },
}

pub trait Broadcaster: Send + Sync {
    fn publish(&self, code: &str, event: MatchEvent);
}

/// Event as delivered to [`ChannelBroadcaster`] subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub code: String,
    pub event: MatchEvent,
}

/// Fans events out over a `tokio::sync::broadcast` channel
pub struct ChannelBroadcaster {
    tx: broadcast::Sender<Published>,
}

impl ChannelBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Published> {
        self.tx.subscribe()
    }
}

impl Default for ChannelBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn publish(&self, code: &str, event: MatchEvent) {
        // No subscribers is not an error.
        let delivered = self
            .tx
            .send(Published {
                code: code.to_string(),
                event,
            })
            .unwrap_or(0);
        trace!("[BROADCAST] {} event delivered to {} subscribers", code, delivered);
    }
}

/// Drops every event
pub struct NullBroadcaster;

impl Broadcaster for NullBroadcaster {
    fn publish(&self, _code: &str, _event: MatchEvent) {}
}
