use crate::game_state::chess_types::{Board, Color, Square};
use crate::move_generation::legal_move_shared::{generate_sliding_moves, BISHOP_DIRECTIONS, ROOK_DIRECTIONS};

pub fn generate_queen_moves(board: &Board, from: Square, color: Color, out: &mut Vec<Square>) {
    generate_sliding_moves(board, from, color, &ROOK_DIRECTIONS, out);
    generate_sliding_moves(board, from, color, &BISHOP_DIRECTIONS, out);
}
