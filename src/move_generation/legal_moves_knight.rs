use crate::game_state::chess_types::{Board, Color, Square};
use crate::move_generation::legal_move_shared::generate_offset_moves;

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub fn generate_knight_moves(board: &Board, from: Square, color: Color, out: &mut Vec<Square>) {
    generate_offset_moves(board, from, color, &KNIGHT_OFFSETS, out);
}

#[cfg(test)]
mod tests {
    use super::generate_knight_moves;
    use crate::game_state::chess_types::{Board, Color, Square};

    #[test]
    fn knight_moves_from_corner_and_center() {
        let board = Board::empty();
        let mut out = Vec::new();
        generate_knight_moves(&board, Square::new(7, 0), Color::White, &mut out);
        assert_eq!(out.len(), 2);

        out.clear();
        generate_knight_moves(&board, Square::new(4, 3), Color::White, &mut out);
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn knight_cannot_land_on_own_piece() {
        let board = Board::initial();
        let mut out = Vec::new();
        generate_knight_moves(&board, Square::new(7, 1), Color::White, &mut out);
        out.sort();
        assert_eq!(out, vec![Square::new(5, 0), Square::new(5, 2)]);
    }
}
