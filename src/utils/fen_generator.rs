use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::square_to_algebraic;

/// Halfmove clock and fullmove number are not tracked on the board.
const CLOCK_PLACEHOLDERS: &str = "0 1";

pub fn generate_fen(game_state: &GameState) -> String {
    let board = generate_board_field(&game_state.board);
    let side_to_move = game_state.side_to_move.to_char();
    let castling = game_state.castling_rights.to_fen_field();
    let en_passant = generate_en_passant_field(game_state);

    format!("{board} {side_to_move} {castling} {en_passant} {CLOCK_PLACEHOLDERS}")
}

fn generate_board_field(board: &Board) -> String {
    let mut out = String::new();

    for row in 0..8u8 {
        let mut empty_count = 0u8;

        for col in 0..8u8 {
            if let Some(piece) = board.piece_at(Square::new(row, col)) {
                if empty_count > 0 {
                    out.push(char::from(b'0' + empty_count));
                    empty_count = 0;
                }
                out.push(piece.to_fen_char());
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if row < 7 {
            out.push('/');
        }
    }

    out
}

/// Emits the target only when a pawn of the side to move can capture onto it.
fn generate_en_passant_field(game_state: &GameState) -> String {
    let Some(target) = game_state.en_passant else {
        return "-".to_owned();
    };

    let side = game_state.side_to_move;
    let capturer = Piece::new(side, PieceKind::Pawn);
    let capturable = [-1i8, 1]
        .iter()
        .filter_map(|d_col| target.offset(-side.pawn_direction(), *d_col))
        .any(|from| game_state.board.piece_at(from) == Some(capturer));

    if !capturable {
        return "-".to_owned();
    }

    square_to_algebraic(target).unwrap_or_else(|| "-".to_owned())
}
