//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and board
//! squares, where row 0 is rank 8. Reused by the FEN codec and UCI parsing.

use crate::game_state::chess_types::Square;

/// Convert algebraic notation (for example: "e4") to a board square.
#[inline]
pub fn algebraic_to_square(square: &str) -> Option<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return None;
    }

    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }

    Some(Square::new(b'8' - rank, file - b'a'))
}

/// Convert a board square to algebraic notation (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> Option<String> {
    if !square.is_valid() {
        return None;
    }

    let file_char = char::from(b'a' + square.col);
    let rank_char = char::from(b'8' - square.row);
    Some(format!("{file_char}{rank_char}"))
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_square, square_to_algebraic};
    use crate::game_state::chess_types::Square;

    #[test]
    fn round_trip_square_conversions() {
        assert_eq!(algebraic_to_square("a8"), Some(Square::new(0, 0)));
        assert_eq!(algebraic_to_square("h1"), Some(Square::new(7, 7)));
        assert_eq!(algebraic_to_square("e2"), Some(Square::new(6, 4)));
        assert_eq!(square_to_algebraic(Square::new(4, 4)).as_deref(), Some("e4"));
        assert_eq!(square_to_algebraic(Square::new(2, 5)).as_deref(), Some("f6"));
    }

    #[test]
    fn rejects_malformed_squares() {
        assert_eq!(algebraic_to_square("i1"), None);
        assert_eq!(algebraic_to_square("a9"), None);
        assert_eq!(algebraic_to_square("e"), None);
        assert_eq!(square_to_algebraic(Square::new(8, 0)), None);
    }
}
