//! Shared fixtures for the integration tests

#![allow(dead_code)]

use chess_engine::{Color, Square};
use escrow_chess::core::ArenaConfig;
use escrow_chess::escrow::{CustodyContract, InMemoryCustody};
use escrow_chess::game::{Variant, Wager};
use escrow_chess::service::{Arena, ChannelBroadcaster, InMemoryStore, MatchEvent, Published};
use std::sync::Arc;
use tokio::sync::broadcast;

pub const WHITE: &str = "alice";
pub const BLACK: &str = "bob";

pub struct TestArena {
    pub arena: Arena,
    pub store: Arc<InMemoryStore>,
    pub custody: Arc<InMemoryCustody>,
    pub broadcaster: Arc<ChannelBroadcaster>,
    pub config: ArenaConfig,
}

pub fn arena() -> TestArena {
    arena_with(ArenaConfig::default())
}

pub fn arena_with(config: ArenaConfig) -> TestArena {
    let store = Arc::new(InMemoryStore::new());
    let custody = Arc::new(InMemoryCustody::from_config(&config));
    let broadcaster = Arc::new(ChannelBroadcaster::new(1024));
    let arena = Arena::new(
        config.clone(),
        store.clone(),
        custody.clone(),
        broadcaster.clone(),
    );
    TestArena {
        arena,
        store,
        custody,
        broadcaster,
        config,
    }
}

impl TestArena {
    /// Create a match and seat alice (White) and bob (Black)
    pub async fn start_match(&self, wager: Option<u64>) -> String {
        let service = &self.arena.service;
        let m = service
            .create_match(Variant::Standard, wager.map(|w| Wager::new(w, "USDC")))
            .await
            .unwrap();
        service.join(&m.code, Color::White, WHITE).await.unwrap();
        service.join(&m.code, Color::Black, BLACK).await.unwrap();
        m.code
    }

    /// Same as `start_match` with both stakes escrowed
    pub async fn start_wagered_match(&self, amount: u64) -> String {
        let code = self.start_match(Some(amount)).await;
        self.custody
            .create_match(&code, WHITE, "USDC", amount)
            .await
            .unwrap();
        self.custody.join_match(&code, BLACK).await.unwrap();
        code
    }

    /// Play a coordinate move for whoever is on move
    pub async fn play(&self, code: &str, from: &str, to: &str) {
        let service = &self.arena.service;
        let side = service.snapshot(code).await.unwrap().side_to_move;
        let identity = if side == Color::White { WHITE } else { BLACK };
        service
            .make_move(code, identity, sq(from), sq(to), None)
            .await
            .unwrap_or_else(|e| panic!("{from}{to} rejected: {e}"));
    }
}

pub fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

/// Drain every event currently buffered for `code`
pub fn drain(rx: &mut broadcast::Receiver<Published>, code: &str) -> Vec<MatchEvent> {
    let mut events = Vec::new();
    while let Ok(published) = rx.try_recv() {
        if published.code == code {
            events.push(published.event);
        }
    }
    events
}
