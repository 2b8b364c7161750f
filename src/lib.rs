//! # escrow-chess
//!
//! Two-player chess matches with a per-turn clock and an escrowed wager.
//!
//! Rules live in the `chess_engine` crate. This crate keeps the authoritative
//! match state, serializes actions per match, forfeits turns that run out of
//! time and settles the wager once a match finishes.
//!
//! ## Module Organization
//!
//! - `core` - Configuration and shared errors
//! - `game` - The match state machine
//! - `clock` - Per-match turn countdowns
//! - `escrow` - Custody contract seam and settlement
//! - `service` - Player-facing entry point, locking, persistence and broadcast

pub mod clock;
pub mod core;
pub mod escrow;
pub mod game;
pub mod service;

pub use crate::core::{ArenaConfig, CoreError};
pub use game::{GameError, GameResult, Match, MatchStatus, Outcome};
pub use service::{Arena, MatchService};
