use crate::game_state::chess_types::{Board, Color, Piece, PieceKind, Square};

/// Single and double advances, diagonal captures, and en passant onto
/// `en_passant` when the victim pawn is actually beside the mover.
pub fn generate_pawn_moves(
    board: &Board,
    from: Square,
    color: Color,
    en_passant: Option<Square>,
    out: &mut Vec<Square>,
) {
    let dir = color.pawn_direction();

    if let Some(one_step) = from.offset(dir, 0) {
        if board.is_empty(one_step) {
            out.push(one_step);

            if from.row == color.pawn_start_row() {
                if let Some(two_step) = from.offset(2 * dir, 0) {
                    if board.is_empty(two_step) {
                        out.push(two_step);
                    }
                }
            }
        }
    }

    for to in pawn_attack_squares(from, color) {
        match board.piece_at(to) {
            Some(piece) if piece.color != color => out.push(to),
            Some(_) => {}
            None => {
                if en_passant == Some(to) && is_en_passant_capture(board, from, to, color) {
                    out.push(to);
                }
            }
        }
    }
}

/// Diagonal squares a pawn on `from` attacks. Forward pushes never attack.
pub fn pawn_attack_squares(from: Square, color: Color) -> impl Iterator<Item = Square> {
    let dir = color.pawn_direction();
    [-1i8, 1]
        .into_iter()
        .filter_map(move |d_col| from.offset(dir, d_col))
}

/// Square of the pawn removed by an en-passant capture from `from` to `to`.
#[inline]
pub fn en_passant_victim(from: Square, to: Square) -> Square {
    Square::new(from.row, to.col)
}

fn is_en_passant_capture(board: &Board, from: Square, to: Square, color: Color) -> bool {
    let target_row = match color {
        Color::White => 2,
        Color::Black => 5,
    };
    to.row == target_row
        && board.piece_at(en_passant_victim(from, to)) == Some(Piece::new(color.opposite(), PieceKind::Pawn))
}

#[inline]
pub fn is_pawn_promotion(piece: Piece, to: Square) -> bool {
    piece.kind == PieceKind::Pawn && to.row == piece.color.promotion_row()
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_moves;
    use crate::game_state::chess_types::Square;
    use crate::game_state::game_state::GameState;

    fn pawn_targets(fen: &str, from: Square) -> Vec<Square> {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let color = game.board.piece_at(from).expect("pawn expected").color;
        let mut out = Vec::new();
        generate_pawn_moves(&game.board, from, color, game.en_passant, &mut out);
        out.sort();
        out
    }

    #[test]
    fn start_rank_pawn_has_single_and_double_step() {
        let out = pawn_targets("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", Square::new(6, 4));
        assert_eq!(out, vec![Square::new(4, 4), Square::new(5, 4)]);
    }

    #[test]
    fn blocked_pawn_cannot_jump() {
        let out = pawn_targets("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1", Square::new(6, 4));
        assert!(out.is_empty());
    }

    #[test]
    fn pawn_captures_diagonally_and_en_passant() {
        let out = pawn_targets("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", Square::new(3, 4));
        assert_eq!(out, vec![Square::new(2, 3), Square::new(2, 4)]);

        let black = pawn_targets("4k3/3p4/2N1b3/8/8/8/8/4K3 b - - 0 1", Square::new(1, 3));
        assert_eq!(black, vec![Square::new(2, 2), Square::new(2, 3), Square::new(3, 3)]);
    }
}
