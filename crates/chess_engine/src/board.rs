//! Board model
//!
//! An 8x8 grid of `Option<Piece>` cells with value semantics. [`Board`] is
//! `Copy`, and [`Board::apply`] returns a fresh board instead of mutating its
//! receiver, which is what lets the legality engine apply moves speculatively
//! for the self-check filter.
//!
//! A board with no king of one color is a valid terminal position (the king was
//! captured); nothing here treats it as an error.

use crate::types::{Color, Piece, PieceKind, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Board::initial()
    }
}

impl Board {
    pub fn empty() -> Self {
        Board {
            cells: [[None; 8]; 8],
        }
    }

    /// Standard starting position: Black on rows 0-1, White on rows 6-7
    pub fn initial() -> Self {
        let mut board = Board::empty();
        for (col, kind) in BACK_RANK.iter().enumerate() {
            board.cells[0][col] = Some(Piece::new(*kind, Color::Black));
            board.cells[1][col] = Some(Piece::new(PieceKind::Pawn, Color::Black));
            board.cells[6][col] = Some(Piece::new(PieceKind::Pawn, Color::White));
            board.cells[7][col] = Some(Piece::new(*kind, Color::White));
        }
        board
    }

    /// Builder used to set up positions: returns a copy with `piece` placed
    pub fn with_piece(mut self, square: Square, piece: Piece) -> Self {
        self.cells[square.row() as usize][square.col() as usize] = Some(piece);
        self
    }

    /// Returns a copy with `square` emptied
    pub fn without_piece(mut self, square: Square) -> Self {
        self.cells[square.row() as usize][square.col() as usize] = None;
        self
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.row() as usize][square.col() as usize]
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Pure move transform
    ///
    /// Moves whatever stands on `from` to `to` and clears `from`. With
    /// `en_passant` set, the pawn standing beside the mover (same row as
    /// `from`, same column as `to`) is removed as well. A pawn landing on row
    /// 0 or 7 becomes `promotion` in the mover's color when one is supplied.
    ///
    /// No legality checks happen here; see [`crate::legality::is_legal`].
    pub fn apply(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
        en_passant: bool,
    ) -> Board {
        let mut next = *self;
        let moving = next.piece_at(from);
        next.set(from, None);

        if en_passant {
            if let Some(victim) = Square::new(from.row(), to.col()) {
                next.set(victim, None);
            }
        }

        let placed = match (moving, promotion) {
            (Some(piece), Some(kind))
                if piece.kind == PieceKind::Pawn && (to.row() == 0 || to.row() == 7) =>
            {
                Some(Piece::new(kind, piece.color))
            }
            (piece, _) => piece,
        };
        next.set(to, placed);
        next
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.squares_of(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
    }

    /// Every occupied square holding a piece of `color`
    pub fn squares_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |square| {
            self.piece_at(square)
                .filter(|piece| piece.color == color)
                .map(|piece| (square, piece))
        })
    }

    pub fn material(&self, color: Color) -> Material {
        let mut material = Material::default();
        for (_, piece) in self.squares_of(color) {
            material.add(piece.kind);
        }
        material
    }

    fn set(&mut self, square: Square, cell: Option<Piece>) {
        self.cells[square.row() as usize][square.col() as usize] = cell;
    }
}

impl fmt::Display for Board {
    /// One line per row from row 0, `.` for empty cells
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.iter() {
            let line: String = row
                .iter()
                .map(|cell| cell.map_or('.', Piece::to_char))
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Piece counts for one side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub pawns: u8,
    pub knights: u8,
    pub bishops: u8,
    pub rooks: u8,
    pub queens: u8,
    pub kings: u8,
}

impl Material {
    fn add(&mut self, kind: PieceKind) {
        match kind {
            PieceKind::Pawn => self.pawns += 1,
            PieceKind::Knight => self.knights += 1,
            PieceKind::Bishop => self.bishops += 1,
            PieceKind::Rook => self.rooks += 1,
            PieceKind::Queen => self.queens += 1,
            PieceKind::King => self.kings += 1,
        }
    }

    /// Point total using the 1/3/3/5/9 scale
    pub fn points(&self) -> u32 {
        self.pawns as u32 * PieceKind::Pawn.value()
            + self.knights as u32 * PieceKind::Knight.value()
            + self.bishops as u32 * PieceKind::Bishop.value()
            + self.rooks as u32 * PieceKind::Rook.value()
            + self.queens as u32 * PieceKind::Queen.value()
    }

    pub fn total(&self) -> u32 {
        (self.pawns + self.knights + self.bishops + self.rooks + self.queens + self.kings) as u32
    }
}
