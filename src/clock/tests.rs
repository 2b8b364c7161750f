//! Turn clock tests
//!
//! All tests run on a paused tokio clock, so sleeping in the test advances
//! time deterministically.

use super::*;
use crate::service::{ChannelBroadcaster, NullBroadcaster};
use std::sync::atomic::{AtomicUsize, Ordering};

const TURN: Duration = Duration::from_secs(45);
const TICK: Duration = Duration::from_secs(1);

/// Records each expiry and forfeits `forfeits` times before reporting Ended
struct RecordingExpiry {
    stamps: Mutex<Vec<DateTime<Utc>>>,
    forfeits: AtomicUsize,
}

impl RecordingExpiry {
    fn new(forfeits: usize) -> Arc<Self> {
        Arc::new(Self {
            stamps: Mutex::new(Vec::new()),
            forfeits: AtomicUsize::new(forfeits),
        })
    }

    fn calls(&self) -> usize {
        self.stamps.lock().len()
    }
}

#[async_trait]
impl TurnExpiry for RecordingExpiry {
    async fn on_turn_expired(&self, _code: &str, turn_started_at: DateTime<Utc>) -> Expiry {
        self.stamps.lock().push(turn_started_at);
        let left = self.forfeits.load(Ordering::SeqCst);
        if left == 0 {
            return Expiry::Ended;
        }
        self.forfeits.store(left - 1, Ordering::SeqCst);
        Expiry::Forfeited {
            side: Color::Black,
            turn_started_at: turn_started_at + chrono::Duration::seconds(45),
        }
    }
}

fn weak(handler: &Arc<RecordingExpiry>) -> Weak<dyn TurnExpiry> {
    let handler: Arc<dyn TurnExpiry> = handler.clone();
    Arc::downgrade(&handler)
}

fn quiet_clock() -> TurnClock {
    TurnClock::new(TURN, TICK, Arc::new(NullBroadcaster))
}

async fn advance(secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs)).await;
}

#[tokio::test(start_paused = true)]
async fn test_expiry_fires_after_turn_duration() {
    let clock = quiet_clock();
    let handler = RecordingExpiry::new(0);
    let stamp = Utc::now();
    clock.restart("ROOM0001", Color::White, stamp, weak(&handler));

    advance(44).await;
    assert_eq!(handler.calls(), 0);
    advance(2).await;
    assert_eq!(handler.calls(), 1);
    assert_eq!(handler.stamps.lock()[0], stamp, "handler receives the counted turn stamp");
    assert!(!clock.is_running("ROOM0001"), "Ended stops the task");
}

#[tokio::test(start_paused = true)]
async fn test_ticks_count_down() {
    let broadcaster = Arc::new(ChannelBroadcaster::new(64));
    let mut rx = broadcaster.subscribe();
    let clock = TurnClock::new(Duration::from_secs(3), TICK, broadcaster.clone());
    let handler = RecordingExpiry::new(0);
    clock.restart("ROOM0001", Color::White, Utc::now(), weak(&handler));

    advance(4).await;
    let mut remaining = Vec::new();
    while let Ok(published) = rx.try_recv() {
        if let MatchEvent::ClockTick {
            side,
            remaining_secs,
            ..
        } = published.event
        {
            assert_eq!(side, Color::White);
            remaining.push(remaining_secs);
        }
    }
    assert_eq!(remaining, vec![3, 2, 1]);
    assert_eq!(handler.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_restart_replaces_running_countdown() {
    let clock = quiet_clock();
    let handler = RecordingExpiry::new(0);
    let first = Utc::now();
    clock.restart("ROOM0001", Color::White, first, weak(&handler));

    advance(30).await;
    let second = first + chrono::Duration::seconds(30);
    clock.restart("ROOM0001", Color::Black, second, weak(&handler));

    advance(30).await;
    assert_eq!(handler.calls(), 0, "first countdown was aborted");
    advance(16).await;
    assert_eq!(*handler.stamps.lock(), vec![second]);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_countdown() {
    let clock = quiet_clock();
    let handler = RecordingExpiry::new(0);
    clock.restart("ROOM0001", Color::White, Utc::now(), weak(&handler));
    assert!(clock.is_running("ROOM0001"));

    clock.cancel("ROOM0001");
    advance(60).await;
    assert_eq!(handler.calls(), 0);
    assert!(!clock.is_running("ROOM0001"));
}

#[tokio::test(start_paused = true)]
async fn test_forfeit_keeps_counting() {
    let clock = quiet_clock();
    let handler = RecordingExpiry::new(2);
    let stamp = Utc::now();
    clock.restart("ROOM0001", Color::White, stamp, weak(&handler));

    advance(45 * 3 + 1).await;
    let stamps = handler.stamps.lock().clone();
    assert_eq!(stamps.len(), 3);
    assert_eq!(stamps[1], stamp + chrono::Duration::seconds(45));
    assert!(!clock.is_running("ROOM0001"));
}

#[tokio::test(start_paused = true)]
async fn test_dropped_handler_ends_countdown() {
    let clock = quiet_clock();
    let handler = RecordingExpiry::new(5);
    clock.restart("ROOM0001", Color::White, Utc::now(), weak(&handler));
    drop(handler);

    advance(46).await;
    assert!(!clock.is_running("ROOM0001"));
}

#[tokio::test(start_paused = true)]
async fn test_matches_have_independent_clocks() {
    let clock = quiet_clock();
    let handler = RecordingExpiry::new(0);
    clock.restart("ROOM0001", Color::White, Utc::now(), weak(&handler));
    advance(20).await;
    clock.restart("ROOM0002", Color::White, Utc::now(), weak(&handler));

    advance(26).await;
    assert_eq!(handler.calls(), 1);
    assert!(clock.is_running("ROOM0002"));
    clock.cancel("ROOM0002");
}
