//! Game module - match lifecycle on top of the rules engine
//!
//! # Module Organization
//!
//! - `state` - [`Match`] and its transitions (join, move, resign, draw, forfeit)
//! - `types` - Status, outcome, variant and wager types
//! - `captured` - Captured piece tracking
//! - `history` - Append-only [`MoveRecord`]s
//! - `error` - [`GameError`] and [`GameResult`]
//!
//! Nothing here does I/O. Persistence, broadcast and clocks are wired up by
//! [`crate::service`].

pub mod captured;
pub mod error;
pub mod history;
pub mod state;
pub mod types;


pub use captured::CapturedPieces;
pub use error::{GameError, GameResult};
pub use history::MoveRecord;
pub use state::{Match, PlayedMove};
pub use types::{EscrowStatus, MatchStatus, Outcome, Variant, Wager};
