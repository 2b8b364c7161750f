//! Match service
//!
//! Entry point for every player action. Each call takes the match's lock,
//! loads the match, applies one state-machine transition, persists it,
//! publishes a snapshot and adjusts the turn clock before the lock is
//! released. Finished matches are handed to the settlement queue.

use super::broadcast::{Broadcaster, MatchEvent, MatchSnapshot};
use super::codes::generate_code;
use super::locks::MatchLocks;
use super::store::MatchStore;
use crate::clock::{Expiry, TurnClock, TurnExpiry};
use crate::core::{ArenaConfig, StoreError};
use crate::escrow::SettlementQueue;
use crate::game::{GameError, GameResult, Match, MoveRecord, Outcome, PlayedMove, Variant, Wager};
use async_trait::async_trait;
use chess_engine::{legal_destinations, Color, PieceKind, Square};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Weak};
use tracing::{debug, error, info, warn};

/// Codes tried before giving up on finding an unused one
const CODE_ATTEMPTS: usize = 16;

/// Whether a committed change starts a new turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn {
    New,
    Same,
}

pub struct MatchService {
    store: Arc<dyn MatchStore>,
    broadcaster: Arc<dyn Broadcaster>,
    locks: Arc<MatchLocks>,
    clock: TurnClock,
    settlements: SettlementQueue,
    this: Weak<MatchService>,
}

impl MatchService {
    pub fn new(
        config: &ArenaConfig,
        store: Arc<dyn MatchStore>,
        broadcaster: Arc<dyn Broadcaster>,
        locks: Arc<MatchLocks>,
        settlements: SettlementQueue,
    ) -> Arc<Self> {
        let clock = TurnClock::from_config(config, Arc::clone(&broadcaster));
        Arc::new_cyclic(|this| Self {
            store,
            broadcaster,
            locks,
            clock,
            settlements,
            this: this.clone(),
        })
    }

    pub fn clock(&self) -> &TurnClock {
        &self.clock
    }

    /// Create a Waiting match under a fresh code
    pub async fn create_match(&self, variant: Variant, wager: Option<Wager>) -> GameResult<Match> {
        for _ in 0..CODE_ATTEMPTS {
            let code = generate_code();
            let _guard = self.locks.lock(&code).await;
            if self.store.load(&code).await?.is_some() {
                continue;
            }
            let m = Match::new(code, variant, wager);
            self.store.save(&m).await?;
            info!("[MATCH] Created {} ({:?})", m.code, m.variant);
            self.publish(&m);
            return Ok(m);
        }
        Err(GameError::Store(StoreError::Unavailable(
            "no free match code".to_string(),
        )))
    }

    /// Seat `identity` as `color`; the clock starts once both seats are filled
    pub async fn join(&self, code: &str, color: Color, identity: &str) -> GameResult<Match> {
        let _guard = self.locks.lock(code).await;
        let mut m = self.load(code).await?;
        let now = next_stamp(m.turn_started_at);
        let started = m.join(color, identity, now)?;
        self.store.save(&m).await?;
        self.after_commit(&m, if started { Turn::New } else { Turn::Same });
        Ok(m)
    }

    pub async fn make_move(
        &self,
        code: &str,
        identity: &str,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> GameResult<PlayedMove> {
        let _guard = self.locks.lock(code).await;
        let mut m = self.load(code).await?;
        let color = self.seated(&m, identity)?;
        if m.is_active() && color != m.side_to_move {
            return Err(GameError::NotYourTurn { color });
        }

        let now = next_stamp(m.turn_started_at);
        let played = m.make_move(from, to, promotion, now)?;
        self.store.commit_move(&m, played.record.clone()).await?;
        self.after_commit(&m, Turn::New);
        Ok(played)
    }

    pub async fn resign(&self, code: &str, identity: &str) -> GameResult<Outcome> {
        self.apply_as(code, identity, Turn::Same, |m, color| m.resign(color))
            .await
    }

    pub async fn offer_draw(&self, code: &str, identity: &str) -> GameResult<()> {
        self.apply_as(code, identity, Turn::Same, |m, color| m.offer_draw(color))
            .await
    }

    pub async fn accept_draw(&self, code: &str, identity: &str) -> GameResult<Outcome> {
        self.apply_as(code, identity, Turn::Same, |m, color| m.accept_draw(color))
            .await
    }

    pub async fn decline_draw(&self, code: &str, identity: &str) -> GameResult<()> {
        self.apply_as(code, identity, Turn::Same, |m, color| m.decline_draw(color))
            .await
    }

    /// Forfeit the current turn on request
    pub async fn forfeit_turn(&self, code: &str) -> GameResult<Match> {
        let _guard = self.locks.lock(code).await;
        let mut m = self.load(code).await?;
        m.forfeit_turn(next_stamp(m.turn_started_at))?;
        self.store.save(&m).await?;
        self.after_commit(&m, Turn::New);
        Ok(m)
    }

    pub async fn snapshot(&self, code: &str) -> GameResult<MatchSnapshot> {
        Ok(MatchSnapshot::from(&self.load(code).await?))
    }

    /// Legal destinations for the piece on `from`, for client move hints
    pub async fn legal_moves(&self, code: &str, from: Square) -> GameResult<Vec<Square>> {
        let m = self.load(code).await?;
        if !m.is_active() {
            return Ok(Vec::new());
        }
        Ok(legal_destinations(
            &m.board,
            from,
            m.side_to_move,
            m.last_move.as_ref(),
        ))
    }

    pub async fn move_history(&self, code: &str) -> GameResult<Vec<MoveRecord>> {
        self.load(code).await?;
        Ok(self.store.move_records(code).await?)
    }

    async fn apply_as<T, F>(&self, code: &str, identity: &str, turn: Turn, op: F) -> GameResult<T>
    where
        F: FnOnce(&mut Match, Color) -> GameResult<T> + Send,
        T: Send,
    {
        let _guard = self.locks.lock(code).await;
        let mut m = self.load(code).await?;
        let color = self.seated(&m, identity)?;
        let value = op(&mut m, color)?;
        self.store.save(&m).await?;
        self.after_commit(&m, turn);
        Ok(value)
    }

    async fn load(&self, code: &str) -> GameResult<Match> {
        self.store
            .load(code)
            .await?
            .ok_or_else(|| GameError::MatchNotFound {
                code: code.to_string(),
            })
    }

    fn seated(&self, m: &Match, identity: &str) -> GameResult<Color> {
        m.color_of(identity).ok_or_else(|| GameError::NotAPlayer {
            identity: identity.to_string(),
        })
    }

    /// Publish and adjust the clock; runs while the match lock is held
    fn after_commit(&self, m: &Match, turn: Turn) {
        self.publish(m);

        if m.is_finished() {
            self.clock.cancel(&m.code);
            if let Some(outcome) = m.winner {
                self.settlements.enqueue(&m.code, outcome);
            }
        } else if m.is_active() && turn == Turn::New {
            let handler: Weak<dyn TurnExpiry> = self.this.clone();
            self.clock
                .restart(&m.code, m.side_to_move, m.turn_started_at, handler);
        }
    }

    fn publish(&self, m: &Match) {
        self.broadcaster
            .publish(&m.code, MatchEvent::Updated(MatchSnapshot::from(m)));
    }
}

#[async_trait]
impl TurnExpiry for MatchService {
    async fn on_turn_expired(&self, code: &str, turn_started_at: DateTime<Utc>) -> Expiry {
        let _guard = self.locks.lock(code).await;
        let mut m = match self.store.load(code).await {
            Ok(Some(m)) => m,
            Ok(None) => return Expiry::Ended,
            Err(e) => {
                error!("[CLOCK] {} could not load match on expiry: {}", code, e);
                return Expiry::Retry;
            }
        };
        if !m.is_active() {
            return Expiry::Ended;
        }
        if m.turn_started_at != turn_started_at {
            debug!("[CLOCK] {} stale expiry ignored", code);
            return Expiry::Stale;
        }

        let expired_side = m.side_to_move;
        if let Err(e) = m.forfeit_turn(next_stamp(m.turn_started_at)) {
            warn!("[CLOCK] {} forfeit rejected: {}", code, e);
            return Expiry::Ended;
        }
        if let Err(e) = self.store.save(&m).await {
            error!("[CLOCK] {} could not save forfeit: {}", code, e);
            return Expiry::Retry;
        }
        info!("[CLOCK] {} {} ran out of time", code, expired_side);
        self.publish(&m);
        Expiry::Forfeited {
            side: m.side_to_move,
            turn_started_at: m.turn_started_at,
        }
    }
}

/// Current time, strictly after `previous` so each turn gets its own stamp
fn next_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + chrono::Duration::microseconds(1)
    }
}
