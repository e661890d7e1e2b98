use crate::game_state::chess_types::{Board, Color, Square};
use crate::move_generation::legal_move_shared::{generate_sliding_moves, BISHOP_DIRECTIONS};

pub fn generate_bishop_moves(board: &Board, from: Square, color: Color, out: &mut Vec<Square>) {
    generate_sliding_moves(board, from, color, &BISHOP_DIRECTIONS, out);
}

#[cfg(test)]
mod tests {
    use super::generate_bishop_moves;
    use crate::game_state::chess_types::{Board, Color, Square};

    #[test]
    fn bishop_on_d4_of_empty_board_has_thirteen_targets() {
        let mut out = Vec::new();
        generate_bishop_moves(&Board::empty(), Square::new(4, 3), Color::White, &mut out);
        assert_eq!(out.len(), 13);
    }
}
