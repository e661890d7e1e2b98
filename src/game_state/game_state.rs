//! Core game state representation.
//!
//! `GameState` is the value the orchestrator owns for the duration of a game:
//! the piece grid plus side to move, castling rights, and en-passant target.
//! Halfmove/fullmove clocks are not tracked.

use crate::errors::FenError;
use crate::game_state::chess_types::*;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant: Option<Square>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            board: Board::empty(),
            side_to_move: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant: None,
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Starting position with full castling rights.
    pub fn new_game() -> Self {
        Self {
            board: Board::initial(),
            side_to_move: Color::White,
            castling_rights: CastlingRights::all(),
            en_passant: None,
        }
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        parse_fen(fen)
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }
}

#[cfg(test)]
mod tests {
    use super::GameState;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;

    #[test]
    fn new_game_matches_starting_fen() {
        let from_fen = GameState::from_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(from_fen, GameState::new_game());
        assert_eq!(GameState::new_game().to_fen(), STARTING_POSITION_FEN);
    }
}
