//! Pseudo-legal destination dispatch by piece kind.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;

/// Destinations for `piece` standing on `from`, ignoring whether the mover's
/// king is left in check.
pub fn generate_pseudo_legal_moves(
    game_state: &GameState,
    from: Square,
    piece: Piece,
    include_castling: bool,
    out: &mut Vec<Square>,
) {
    let board = &game_state.board;
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, from, piece.color, game_state.en_passant, out),
        PieceKind::Knight => generate_knight_moves(board, from, piece.color, out),
        PieceKind::Bishop => generate_bishop_moves(board, from, piece.color, out),
        PieceKind::Rook => generate_rook_moves(board, from, piece.color, out),
        PieceKind::Queen => generate_queen_moves(board, from, piece.color, out),
        PieceKind::King => generate_king_moves(game_state, from, piece.color, include_castling, out),
    }
}
