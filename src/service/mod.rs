//! Service module - per-match serialization and collaborator seams
//!
//! # Module Structure
//!
//! - `match_service` - [`MatchService`], the entry point for player actions
//! - `locks` - [`MatchLocks`], one async mutex per match code
//! - `store` - [`MatchStore`] persistence trait and [`InMemoryStore`]
//! - `broadcast` - [`MatchEvent`] fan-out
//! - `arena` - [`Arena`], wiring for the service and settlement worker
//! - `codes` - Match code generation

pub mod arena;
pub mod broadcast;
pub mod codes;
pub mod locks;
pub mod match_service;
pub mod store;

pub use arena::Arena;
pub use broadcast::{
    Broadcaster, ChannelBroadcaster, MatchEvent, MatchSnapshot, NullBroadcaster, Published,
};
pub use codes::generate_code;
pub use locks::{MatchGuard, MatchLocks};
pub use match_service::MatchService;
pub use store::{InMemoryStore, MatchStore, StoreError, StoreResult};
