//! # chess_engine
//!
//! Stateless chess rules for two-player matches.
//!
//! Everything here is a pure function over explicit [`Board`] values. There is
//! no shared engine instance, so the functions are safe to call from any number
//! of match workers at once.
//!
//! ## Module Organization
//!
//! - `types` - Colors, piece kinds, squares and the last-move record
//! - `board` - The 8x8 board value and its pure `apply` transform
//! - `move_gen` - Per-piece movement shapes and attack detection
//! - `legality` - Full legality (self-check filter), mate and stalemate
//! - `error` - Reasons a move is rejected
//!
//! ## Example
//!
//! ```rust
//! use chess_engine::{is_legal, Board, Color, Square};
//!
//! let board = Board::initial();
//! let e2 = Square::new(6, 4).unwrap();
//! let e4 = Square::new(4, 4).unwrap();
//! assert!(is_legal(&board, e2, e4, Color::White, None).is_ok());
//! ```

pub mod board;
pub mod error;
pub mod legality;
pub mod move_gen;
pub mod types;

pub use board::{Board, Material};
pub use error::{IllegalMove, LegalityResult};
pub use legality::{
    has_legal_moves, is_checkmate, is_legal, is_stalemate, legal_destinations, position_status,
    MoveCheck, PositionStatus,
};
pub use move_gen::attack::{is_king_in_check, is_square_attacked};
pub use types::{Color, LastMove, Piece, PieceKind, Square};
