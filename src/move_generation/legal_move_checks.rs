//! Attack and check detection.
//!
//! A square is attacked when any piece of the attacking side has a
//! pseudo-legal, non-castling move onto it (pawns contribute their diagonal
//! capture squares only). Castling is never considered here: castling
//! legality itself asks this module about attacked squares.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::{generate_offset_moves, generate_sliding_moves, BISHOP_DIRECTIONS, ROOK_DIRECTIONS};
use crate::move_generation::legal_moves_king::KING_OFFSETS;
use crate::move_generation::legal_moves_knight::KNIGHT_OFFSETS;
use crate::move_generation::legal_moves_pawn::pawn_attack_squares;

#[inline]
pub fn king_square(board: &Board, color: Color) -> Option<Square> {
    board.find_king(color)
}

/// A side without a king on the board is never in check.
#[inline]
pub fn is_in_check(board: &Board, color: Color) -> bool {
    let Some(king_sq) = king_square(board, color) else {
        return false;
    };
    is_square_under_attack(board, king_sq, color.opposite())
}

pub fn is_square_under_attack(board: &Board, square: Square, attacker_color: Color) -> bool {
    if !square.is_valid() {
        return false;
    }

    let mut targets = Vec::with_capacity(32);
    for (from, piece) in board.pieces_of(attacker_color) {
        targets.clear();
        attacked_squares(board, from, piece, &mut targets);
        if targets.contains(&square) {
            return true;
        }
    }

    false
}

fn attacked_squares(board: &Board, from: Square, piece: Piece, out: &mut Vec<Square>) {
    match piece.kind {
        PieceKind::Pawn => out.extend(pawn_attack_squares(from, piece.color)),
        PieceKind::Knight => generate_offset_moves(board, from, piece.color, &KNIGHT_OFFSETS, out),
        PieceKind::Bishop => generate_sliding_moves(board, from, piece.color, &BISHOP_DIRECTIONS, out),
        PieceKind::Rook => generate_sliding_moves(board, from, piece.color, &ROOK_DIRECTIONS, out),
        PieceKind::Queen => {
            generate_sliding_moves(board, from, piece.color, &ROOK_DIRECTIONS, out);
            generate_sliding_moves(board, from, piece.color, &BISHOP_DIRECTIONS, out);
        }
        PieceKind::King => generate_offset_moves(board, from, piece.color, &KING_OFFSETS, out),
    }
}
