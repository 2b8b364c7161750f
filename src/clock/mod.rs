//! Turn clock
//!
//! One countdown task per Active match. While it runs it publishes a
//! [`MatchEvent::ClockTick`] every tick interval. When the countdown reaches
//! zero it asks its [`TurnExpiry`] handler to forfeit the turn and, if the
//! match is still Active, starts the next countdown itself.
//!
//! # Cancellation
//!
//! [`TurnClock::restart`] and [`TurnClock::cancel`] abort the running task.
//! The expiry handler runs under the match lock and checks the turn stamp it
//! was given, so an expiry racing with a move is dropped as stale.
//!
//! The expiry path never calls `restart`; the task keeps looping instead, so a
//! task never aborts itself.

use crate::core::ArenaConfig;
use crate::service::{Broadcaster, MatchEvent};
use async_trait::async_trait;
use chess_engine::Color;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

#[cfg(test)]
mod tests;

/// What the handler did with an expired turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Turn forfeited; count down for `side` from the new stamp
    Forfeited {
        side: Color,
        turn_started_at: DateTime<Utc>,
    },
    /// The counted turn already ended
    Stale,
    /// Match is no longer Active
    Ended,
    /// Handler could not act; count the same turn again
    Retry,
}

#[async_trait]
pub trait TurnExpiry: Send + Sync {
    async fn on_turn_expired(&self, code: &str, turn_started_at: DateTime<Utc>) -> Expiry;
}

pub struct TurnClock {
    turn: Duration,
    tick: Duration,
    broadcaster: Arc<dyn Broadcaster>,
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl TurnClock {
    pub fn new(turn: Duration, tick: Duration, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self {
            turn,
            tick: tick.max(Duration::from_millis(1)),
            broadcaster,
            timers: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &ArenaConfig, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self::new(config.turn_duration(), config.tick_interval(), broadcaster)
    }

    pub fn turn_duration(&self) -> Duration {
        self.turn
    }

    /// Start a fresh countdown for `side`, replacing any running one
    pub fn restart(
        &self,
        code: &str,
        side: Color,
        turn_started_at: DateTime<Utc>,
        handler: Weak<dyn TurnExpiry>,
    ) {
        let countdown = Countdown {
            code: code.to_string(),
            turn: self.turn,
            tick: self.tick,
            broadcaster: Arc::clone(&self.broadcaster),
            handler,
        };
        let handle = tokio::spawn(countdown.run(side, turn_started_at));
        if let Some(previous) = self.timers.lock().insert(code.to_string(), handle) {
            previous.abort();
        }
        debug!("[CLOCK] {} countdown started for {}", code, side);
    }

    pub fn cancel(&self, code: &str) {
        if let Some(handle) = self.timers.lock().remove(code) {
            handle.abort();
            debug!("[CLOCK] {} countdown cancelled", code);
        }
    }

    pub fn is_running(&self, code: &str) -> bool {
        self.timers
            .lock()
            .get(code)
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for TurnClock {
    fn drop(&mut self) {
        for (_, handle) in self.timers.get_mut().drain() {
            handle.abort();
        }
    }
}

struct Countdown {
    code: String,
    turn: Duration,
    tick: Duration,
    broadcaster: Arc<dyn Broadcaster>,
    handler: Weak<dyn TurnExpiry>,
}

impl Countdown {
    async fn run(self, mut side: Color, mut turn_started_at: DateTime<Utc>) {
        loop {
            self.count_down(side).await;

            let Some(handler) = self.handler.upgrade() else {
                return;
            };
            match handler.on_turn_expired(&self.code, turn_started_at).await {
                Expiry::Forfeited {
                    side: next,
                    turn_started_at: stamp,
                } => {
                    side = next;
                    turn_started_at = stamp;
                }
                Expiry::Retry => {
                    warn!("[CLOCK] {} expiry not applied, counting again", self.code);
                }
                Expiry::Stale | Expiry::Ended => return,
            }
        }
    }

    async fn count_down(&self, side: Color) {
        let deadline = Instant::now() + self.turn;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return;
            }
            self.broadcaster.publish(
                &self.code,
                MatchEvent::ClockTick {
                    code: self.code.clone(),
                    side,
                    remaining_secs: (remaining.as_millis() as u64).div_ceil(1000),
                },
            );
            tokio::time::sleep(remaining.min(self.tick)).await;
        }
    }
}
