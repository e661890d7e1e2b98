//! Simple material count used as the displayed evaluation when no external
//! evaluator is involved. Positive favors White, in pawn units.

use crate::game_state::chess_types::{Board, Color, PieceKind};

pub const fn piece_value(kind: PieceKind) -> f32 {
    match kind {
        PieceKind::Pawn => 1.0,
        PieceKind::Knight | PieceKind::Bishop => 3.0,
        PieceKind::Rook => 5.0,
        PieceKind::Queen => 9.0,
        PieceKind::King => 0.0,
    }
}

pub fn material_balance(board: &Board) -> f32 {
    board
        .squares()
        .filter_map(|(_, piece)| piece)
        .map(|piece| match piece.color {
            Color::White => piece_value(piece.kind),
            Color::Black => -piece_value(piece.kind),
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::material_balance;
    use crate::game_state::chess_types::{Board, Square};

    #[test]
    fn starting_position_is_balanced() {
        assert_eq!(material_balance(&Board::initial()), 0.0);
    }

    #[test]
    fn missing_black_queen_favors_white() {
        let mut board = Board::initial();
        board.take(Square::new(0, 3));
        assert_eq!(material_balance(&board), 9.0);
    }
}
