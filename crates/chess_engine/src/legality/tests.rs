//! Test suite for full move legality
//!
//! # Test Organization
//!
//! - `test_reject_*` - Ownership and shape failures, in check order
//! - `test_pin_*` / `test_check_*` - Self-check filter behaviour
//! - `test_en_passant_*` - The one-move en passant window
//! - `test_mate_*` / `test_stalemate_*` - Terminal position detection

use super::*;
use assert_matches::assert_matches;

fn sq(row: u8, col: u8) -> Square {
    Square::new(row, col).unwrap()
}

fn white(kind: PieceKind) -> Piece {
    Piece::new(kind, Color::White)
}

fn black(kind: PieceKind) -> Piece {
    Piece::new(kind, Color::Black)
}

/// Builds a board from `(piece, (row, col))` pairs
fn create_test_board(pieces: &[(Piece, (u8, u8))]) -> Board {
    pieces
        .iter()
        .fold(Board::empty(), |board, &(piece, (row, col))| {
            board.with_piece(sq(row, col), piece)
        })
}

/// Plays a legal move and returns the resulting board plus its last-move record
fn play(board: &Board, from: Square, to: Square, side: Color, last: Option<&LastMove>) -> (Board, LastMove) {
    let check = is_legal(board, from, to, side, last).expect("move should be legal");
    let next = board.apply(from, to, None, check.en_passant);
    (
        next,
        LastMove {
            from,
            to,
            piece: check.piece,
        },
    )
}

// ============================================================================
// Rejection Order
// ============================================================================

#[test]
fn test_reject_empty_source() {
    let board = Board::initial();
    assert_eq!(
        is_legal(&board, sq(4, 4), sq(3, 4), Color::White, None),
        Err(IllegalMove::NoPiece)
    );
}

#[test]
fn test_reject_opponent_piece() {
    let board = Board::initial();
    assert_eq!(
        is_legal(&board, sq(1, 4), sq(3, 4), Color::White, None),
        Err(IllegalMove::NotYourPiece)
    );
}

#[test]
fn test_reject_own_capture() {
    //! The own-capture check runs before the shape check, so even a knight
    //! jump onto a friendly pawn reports the capture reason.
    let board = Board::initial();
    assert_eq!(
        is_legal(&board, sq(7, 1), sq(6, 3), Color::White, None),
        Err(IllegalMove::CaptureOwnPiece)
    );
    assert_eq!(
        is_legal(&board, sq(7, 4), sq(7, 4), Color::White, None),
        Err(IllegalMove::CaptureOwnPiece)
    );
}

#[test]
fn test_reject_bad_shape() {
    let board = Board::initial();
    assert_matches!(
        is_legal(&board, sq(7, 2), sq(5, 4), Color::White, None),
        Err(IllegalMove::IllegalShape {
            kind: PieceKind::Bishop
        })
    );
}

#[test]
fn test_opening_moves_accepted() {
    let board = Board::initial();
    let check = is_legal(&board, sq(6, 4), sq(4, 4), Color::White, None).unwrap();
    assert_eq!(check.piece, white(PieceKind::Pawn));
    assert!(!check.en_passant);
    assert!(check.captured.is_none());
    assert!(!check.promotes);

    assert!(is_legal(&board, sq(7, 6), sq(5, 5), Color::White, None).is_ok());
    assert_eq!(legal_destinations(&board, sq(7, 1), Color::White, None).len(), 2);
}

// ============================================================================
// Self-Check Filter
// ============================================================================

#[test]
fn test_pin_prevents_moving_off_line() {
    //! A rook pinned against its king by an enemy rook may slide along the pin but
    //! may not leave it.
    let board = create_test_board(&[
        (white(PieceKind::King), (7, 4)),
        (white(PieceKind::Rook), (5, 4)),
        (black(PieceKind::Rook), (0, 4)),
        (black(PieceKind::King), (0, 0)),
    ]);

    assert_eq!(
        is_legal(&board, sq(5, 4), sq(5, 0), Color::White, None),
        Err(IllegalMove::LeavesKingInCheck)
    );
    assert!(is_legal(&board, sq(5, 4), sq(2, 4), Color::White, None).is_ok());
    assert!(is_legal(&board, sq(5, 4), sq(0, 4), Color::White, None).is_ok());
}

#[test]
fn test_check_must_be_answered() {
    let board = create_test_board(&[
        (white(PieceKind::King), (7, 4)),
        (white(PieceKind::Pawn), (6, 0)),
        (white(PieceKind::Knight), (7, 6)),
        (black(PieceKind::Rook), (0, 4)),
        (black(PieceKind::King), (0, 0)),
    ]);
    assert!(is_king_in_check(&board, Color::White));

    assert_eq!(
        is_legal(&board, sq(6, 0), sq(5, 0), Color::White, None),
        Err(IllegalMove::LeavesKingInCheck),
        "unrelated pawn push ignores the check"
    );
    assert!(is_legal(&board, sq(7, 6), sq(6, 4), Color::White, None).is_ok(), "block");
    assert!(is_legal(&board, sq(7, 4), sq(7, 3), Color::White, None).is_ok(), "step aside");
    assert_eq!(
        is_legal(&board, sq(7, 4), sq(6, 4), Color::White, None),
        Err(IllegalMove::LeavesKingInCheck),
        "stepping along the rook's file stays in check"
    );
    assert_eq!(position_status(&board, Color::White, None), PositionStatus::Check);
}

#[test]
fn test_check_escape_only_accepts_safe_moves() {
    let board = create_test_board(&[
        (white(PieceKind::King), (7, 4)),
        (white(PieceKind::Queen), (7, 3)),
        (white(PieceKind::Bishop), (7, 5)),
        (black(PieceKind::Knight), (5, 3)),
        (black(PieceKind::King), (0, 4)),
    ]);
    assert!(is_king_in_check(&board, Color::White));

    for (from, _) in board.squares_of(Color::White) {
        for to in Square::all() {
            if let Ok(check) = is_legal(&board, from, to, Color::White, None) {
                let after = board.apply(from, to, None, check.en_passant);
                assert!(
                    !is_king_in_check(&after, Color::White),
                    "{from}->{to} was accepted but leaves the king attacked"
                );
            }
        }
    }
}

#[test]
fn test_check_king_capture_reachable_when_king_left_hanging() {
    //! After a forfeited turn the side in check may never have answered it;
    //! the attacker can then land on the king's square.
    let board = create_test_board(&[
        (white(PieceKind::King), (7, 4)),
        (white(PieceKind::Queen), (1, 4)),
        (black(PieceKind::King), (0, 4)),
    ]);

    let check = is_legal(&board, sq(1, 4), sq(0, 4), Color::White, None).unwrap();
    assert_eq!(check.captured, Some(black(PieceKind::King)));
}

// ============================================================================
// En Passant
// ============================================================================

#[test]
fn test_en_passant_immediately_after_double_step() {
    let board = create_test_board(&[
        (white(PieceKind::King), (7, 4)),
        (black(PieceKind::King), (0, 4)),
        (white(PieceKind::Pawn), (3, 4)),
        (black(PieceKind::Pawn), (1, 3)),
    ]);
    let (board, last) = play(&board, sq(1, 3), sq(3, 3), Color::Black, None);

    let check = is_legal(&board, sq(3, 4), sq(2, 3), Color::White, Some(&last)).unwrap();
    assert!(check.en_passant);
    assert_eq!(check.captured, Some(black(PieceKind::Pawn)));

    let after = board.apply(sq(3, 4), sq(2, 3), None, check.en_passant);
    assert!(after.is_empty(sq(3, 3)), "captured pawn's own square cleared");
    assert_eq!(after.piece_at(sq(2, 3)), Some(white(PieceKind::Pawn)));
}

#[test]
fn test_en_passant_window_closes_after_one_move() {
    let board = create_test_board(&[
        (white(PieceKind::King), (7, 4)),
        (black(PieceKind::King), (0, 4)),
        (white(PieceKind::Pawn), (3, 4)),
        (black(PieceKind::Pawn), (1, 3)),
    ]);
    let (board, last) = play(&board, sq(1, 3), sq(3, 3), Color::Black, None);
    let (board, last) = play(&board, sq(7, 4), sq(7, 3), Color::White, Some(&last));
    let (board, last) = play(&board, sq(0, 4), sq(0, 3), Color::Black, Some(&last));

    assert_matches!(
        is_legal(&board, sq(3, 4), sq(2, 3), Color::White, Some(&last)),
        Err(IllegalMove::IllegalShape {
            kind: PieceKind::Pawn
        })
    );
}

#[test]
fn test_en_passant_exposing_king_on_rank_rejected() {
    //! Removing both pawns from the rank opens the rook's line to the king.
    let board = create_test_board(&[
        (white(PieceKind::King), (3, 0)),
        (white(PieceKind::Pawn), (3, 3)),
        (black(PieceKind::Pawn), (3, 4)),
        (black(PieceKind::Rook), (3, 7)),
        (black(PieceKind::King), (0, 7)),
    ]);
    let last = LastMove {
        from: sq(1, 4),
        to: sq(3, 4),
        piece: black(PieceKind::Pawn),
    };

    assert_eq!(
        is_legal(&board, sq(3, 3), sq(2, 4), Color::White, Some(&last)),
        Err(IllegalMove::LeavesKingInCheck)
    );
}

// ============================================================================
// Promotion Flag
// ============================================================================

#[test]
fn test_promotes_flag_on_far_rank() {
    let board = create_test_board(&[
        (white(PieceKind::King), (7, 4)),
        (black(PieceKind::King), (0, 7)),
        (white(PieceKind::Pawn), (1, 0)),
        (black(PieceKind::Pawn), (6, 6)),
    ]);

    assert!(is_legal(&board, sq(1, 0), sq(0, 0), Color::White, None).unwrap().promotes);
    assert!(is_legal(&board, sq(6, 6), sq(7, 6), Color::Black, None).unwrap().promotes);
}

// ============================================================================
// Checkmate and Stalemate
// ============================================================================

#[test]
fn test_mate_fools_mate() {
    let board = Board::initial();
    let (board, last) = play(&board, sq(6, 5), sq(5, 5), Color::White, None);
    let (board, last) = play(&board, sq(1, 4), sq(3, 4), Color::Black, Some(&last));
    let (board, last) = play(&board, sq(6, 6), sq(4, 6), Color::White, Some(&last));
    let (board, last) = play(&board, sq(0, 3), sq(4, 7), Color::Black, Some(&last));

    assert!(is_king_in_check(&board, Color::White));
    assert!(!has_legal_moves(&board, Color::White, Some(&last)));
    assert!(is_checkmate(&board, Color::White, Some(&last)));
    assert!(!is_stalemate(&board, Color::White, Some(&last)));
    assert_eq!(position_status(&board, Color::White, Some(&last)), PositionStatus::Checkmate);
}

#[test]
fn test_stalemate_cornered_king() {
    let board = create_test_board(&[
        (black(PieceKind::King), (0, 0)),
        (white(PieceKind::Queen), (2, 1)),
        (white(PieceKind::King), (7, 7)),
    ]);

    assert!(!is_king_in_check(&board, Color::Black));
    assert!(!has_legal_moves(&board, Color::Black, None));
    assert!(is_stalemate(&board, Color::Black, None));
    assert!(!is_checkmate(&board, Color::Black, None));
    assert!(position_status(&board, Color::Black, None).is_terminal());
}

#[test]
fn test_starting_position_is_ongoing() {
    let board = Board::initial();
    assert_eq!(position_status(&board, Color::White, None), PositionStatus::Ongoing);
    assert_eq!(position_status(&board, Color::Black, None), PositionStatus::Ongoing);
}
