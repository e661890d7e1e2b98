use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_under_attack;
use crate::move_generation::legal_move_shared::generate_offset_moves;

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const KING_HOME_COL: u8 = 4;

/// One-square king steps plus, when `include_castling` is set, the ±2-file
/// castling moves the rights and attack rules allow. Attack detection calls
/// this with `include_castling == false`.
pub fn generate_king_moves(
    state: &GameState,
    from: Square,
    color: Color,
    include_castling: bool,
    out: &mut Vec<Square>,
) {
    generate_offset_moves(&state.board, from, color, &KING_OFFSETS, out);

    if include_castling {
        generate_castling_moves(state, from, color, out);
    }
}

fn generate_castling_moves(state: &GameState, king_from: Square, color: Color, out: &mut Vec<Square>) {
    let row = color.home_row();
    if king_from != Square::new(row, KING_HOME_COL) {
        return;
    }

    let board = &state.board;
    let enemy = color.opposite();

    // Cannot castle out of check.
    if is_square_under_attack(board, king_from, enemy) {
        return;
    }

    let rook = Some(Piece::new(color, PieceKind::Rook));
    let empty = |cols: &[u8]| cols.iter().all(|&col| board.is_empty(Square::new(row, col)));
    let safe = |cols: &[u8]| {
        cols.iter()
            .all(|&col| !is_square_under_attack(board, Square::new(row, col), enemy))
    };

    if state.castling_rights.has(kingside_flag(color))
        && board.piece_at(Square::new(row, 7)) == rook
        && empty(&[5, 6])
        && safe(&[5, 6])
    {
        out.push(Square::new(row, 6));
    }

    if state.castling_rights.has(queenside_flag(color))
        && board.piece_at(Square::new(row, 0)) == rook
        && empty(&[1, 2, 3])
        && safe(&[3, 2])
    {
        out.push(Square::new(row, 2));
    }
}

/// True for a king move of two files, which relocates a rook as well.
#[inline]
pub fn is_castling_move(piece: Piece, from: Square, to: Square) -> bool {
    piece.kind == PieceKind::King && from.row == to.row && from.col.abs_diff(to.col) == 2
}

/// Rook origin and destination for a castling king move.
pub fn castling_rook_squares(king_from: Square, king_to: Square) -> (Square, Square) {
    let row = king_from.row;
    if king_to.col > king_from.col {
        (Square::new(row, 7), Square::new(row, 5))
    } else {
        (Square::new(row, 0), Square::new(row, 3))
    }
}

#[cfg(test)]
mod tests {
    use super::generate_king_moves;
    use crate::game_state::chess_types::{Color, Square};
    use crate::game_state::game_state::GameState;

    fn king_targets(fen: &str, from: Square, color: Color) -> Vec<Square> {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let mut out = Vec::new();
        generate_king_moves(&game, from, color, true, &mut out);
        out.sort();
        out
    }

    #[test]
    fn both_castles_available_on_open_back_rank() {
        let out = king_targets("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", Square::new(7, 4), Color::White);
        assert!(out.contains(&Square::new(7, 6)));
        assert!(out.contains(&Square::new(7, 2)));
        assert_eq!(out.len(), 7);
    }

    #[test]
    fn castling_blocked_through_attacked_square() {
        // Black rook on f8 covers f1.
        let out = king_targets("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1", Square::new(7, 4), Color::White);
        assert!(!out.contains(&Square::new(7, 6)));
        assert!(out.contains(&Square::new(7, 2)));
    }

    #[test]
    fn queenside_b_file_may_be_attacked() {
        // Black rook on b8 only covers b1, which the king never crosses.
        let out = king_targets("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1", Square::new(7, 4), Color::White);
        assert!(out.contains(&Square::new(7, 2)));
    }

    #[test]
    fn no_castling_out_of_check_or_without_rights() {
        let in_check = king_targets("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1", Square::new(7, 4), Color::White);
        assert!(!in_check.contains(&Square::new(7, 6)));
        assert!(!in_check.contains(&Square::new(7, 2)));

        let no_rights = king_targets("4k3/8/8/8/8/8/8/R3K2R w - - 0 1", Square::new(7, 4), Color::White);
        assert!(!no_rights.contains(&Square::new(7, 6)));
    }
}
