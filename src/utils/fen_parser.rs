//! FEN-to-GameState parser.
//!
//! Missing trailing fields fall back to white to move with no castling and
//! no en passant. Extra fields are ignored, and placement characters that
//! would fall outside the 8×8 grid are dropped.

use crate::errors::FenError;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<GameState, FenError> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or(FenError::MissingPlacement)?;

    let mut game_state = GameState::new_empty();
    parse_board(board_part, &mut game_state.board);

    if let Some(side_part) = parts.next() {
        game_state.side_to_move = parse_side_to_move(side_part);
    }
    if let Some(castling_part) = parts.next() {
        game_state.castling_rights = CastlingRights::from_fen_field(castling_part);
    }
    if let Some(en_passant_part) = parts.next() {
        game_state.en_passant = parse_en_passant_square(en_passant_part);
    }

    Ok(game_state)
}

fn parse_board(board_part: &str, board: &mut Board) {
    let mut row = 0usize;
    let mut col = 0usize;

    for ch in board_part.chars() {
        if row >= 8 {
            break;
        }

        if ch == '/' {
            row += 1;
            col = 0;
            continue;
        }

        if let Some(empty_count) = ch.to_digit(10) {
            col += empty_count as usize;
            continue;
        }

        if let Some(piece) = Piece::from_fen_char(ch) {
            if col < 8 {
                board.set(Square::new(row as u8, col as u8), Some(piece));
            }
            col += 1;
        }
    }
}

fn parse_side_to_move(side_part: &str) -> Color {
    match side_part {
        "b" | "B" => Color::Black,
        _ => Color::White,
    }
}

fn parse_en_passant_square(en_passant_part: &str) -> Option<Square> {
    if en_passant_part == "-" {
        return None;
    }

    let square = algebraic_to_square(en_passant_part)?;
    // Only ranks 3 and 6 can hold an en-passant target.
    if square.row == 2 || square.row == 5 {
        Some(square)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::errors::FenError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;
    use crate::utils::render_game_state::render_game_state;

    #[test]
    fn parse_starting_fen_and_render_board() {
        let game_state = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        println!("\n{}", render_game_state(&game_state));

        assert_eq!(game_state.side_to_move, Color::White);
        assert_eq!(game_state.castling_rights, CastlingRights::all());
        assert_eq!(game_state.en_passant, None);
        assert_eq!(game_state.board, Board::initial());
    }

    #[test]
    fn missing_trailing_fields_default_to_no_rights() {
        let game_state = parse_fen("4k3/8/8/8/8/8/8/4K3").expect("placement-only FEN should parse");
        assert_eq!(game_state.side_to_move, Color::White);
        assert_eq!(game_state.castling_rights, CastlingRights::none());
        assert_eq!(game_state.en_passant, None);
        assert_eq!(game_state.board.find_king(Color::Black), Some(Square::new(0, 4)));

        let black_only = parse_fen("4k3/8/8/8/8/8/8/4K3 b").expect("FEN should parse");
        assert_eq!(black_only.side_to_move, Color::Black);
        assert_eq!(black_only.castling_rights, CastlingRights::none());
    }

    #[test]
    fn malformed_ranks_never_write_out_of_bounds() {
        let game_state = parse_fen("rnbqkbnrrr/8/8/8/8/8/8/8/8/PPPP w - - 0 1").expect("FEN should parse");
        assert_eq!(game_state.board.pieces_of(Color::Black).count(), 8);
        assert_eq!(game_state.board.pieces_of(Color::White).count(), 0);
    }

    #[test]
    fn parses_en_passant_target() {
        let game_state = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        assert_eq!(game_state.en_passant, Some(Square::new(2, 3)));
    }

    #[test]
    fn empty_string_is_rejected() {
        assert_eq!(parse_fen("   "), Err(FenError::MissingPlacement));
    }
}
