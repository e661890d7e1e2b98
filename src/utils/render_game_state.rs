//! Text board renderer for debug logging.
//!
//! Rank 8 is printed first, which matches the sensor matrix row order.

use crate::game_state::{chess_types::*, game_state::GameState};

/// Render the board as ASCII with rank and file labels.
pub fn render_game_state(game_state: &GameState) -> String {
    render_board(&game_state.board)
}

pub fn render_board(board: &Board) -> String {
    let mut out = String::new();

    for row in 0..8u8 {
        let rank = char::from(b'8' - row);
        out.push(rank);
        out.push(' ');

        for col in 0..8u8 {
            match board.piece_at(Square::new(row, col)) {
                Some(piece) => out.push(piece.to_fen_char()),
                None => out.push('.'),
            }
            out.push(' ');
        }

        out.push(' ');
        out.push(rank);
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");

    out
}

#[cfg(test)]
mod tests {
    use super::render_board;
    use crate::game_state::chess_types::Board;

    #[test]
    fn renders_rank_eight_first() {
        let rendered = render_board(&Board::initial());
        let first = rendered.lines().next().expect("render should have lines");
        assert_eq!(first, "8 r n b q k b n r  8");
        assert!(rendered.ends_with("a b c d e f g h"));
    }
}
