//! Coordinate ("UCI") move notation: `e2e4`, `e7e8q`.

use crate::errors::MoveError;
use crate::game_state::chess_types::{PieceKind, Square};
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

/// A move as written in coordinate notation, without any board context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

pub fn parse_long_algebraic(long_algebraic: &str) -> Result<CoordinateMove, MoveError> {
    let invalid = || MoveError::InvalidNotation(long_algebraic.to_owned());
    let token = long_algebraic.trim();
    if !token.is_ascii() || (token.len() != 4 && token.len() != 5) {
        return Err(invalid());
    }

    let from = algebraic_to_square(&token[0..2]).ok_or_else(invalid)?;
    let to = algebraic_to_square(&token[2..4]).ok_or_else(invalid)?;

    let promotion = match token.as_bytes().get(4) {
        None => None,
        Some(&ch) => Some(char_to_promotion(ch as char).ok_or_else(invalid)?),
    };

    Ok(CoordinateMove { from, to, promotion })
}

pub fn to_long_algebraic(from: Square, to: Square, promotion: Option<PieceKind>) -> Option<String> {
    let mut out = square_to_algebraic(from)?;
    out.push_str(&square_to_algebraic(to)?);
    if let Some(piece) = promotion {
        out.push(promotion_to_char(piece)?);
    }
    Some(out)
}

fn promotion_to_char(piece_kind: PieceKind) -> Option<char> {
    match piece_kind {
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => Some(piece_kind.to_char()),
        _ => None,
    }
}

fn char_to_promotion(ch: char) -> Option<PieceKind> {
    match ch.to_ascii_lowercase() {
        'n' => Some(PieceKind::Knight),
        'b' => Some(PieceKind::Bishop),
        'r' => Some(PieceKind::Rook),
        'q' => Some(PieceKind::Queen),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_long_algebraic, to_long_algebraic};
    use crate::game_state::chess_types::{PieceKind, Square};

    #[test]
    fn long_algebraic_round_trip_simple_move() {
        let mv = parse_long_algebraic("e2e4").expect("move should parse");
        assert_eq!(mv.from, Square::new(6, 4));
        assert_eq!(mv.to, Square::new(4, 4));
        assert_eq!(mv.promotion, None);
        assert_eq!(to_long_algebraic(mv.from, mv.to, mv.promotion).as_deref(), Some("e2e4"));
    }

    #[test]
    fn long_algebraic_round_trip_promotion() {
        let mv = parse_long_algebraic("a7a8q").expect("move should parse");
        assert_eq!(mv.promotion, Some(PieceKind::Queen));
        assert_eq!(to_long_algebraic(mv.from, mv.to, mv.promotion).as_deref(), Some("a7a8q"));
    }

    #[test]
    fn rejects_malformed_tokens() {
        for bad in ["", "e2", "e2e9", "z2e4", "e7e8k", "e2e4q5", "é2e4"] {
            assert!(parse_long_algebraic(bad).is_err(), "{bad} should be rejected");
        }
    }
}
