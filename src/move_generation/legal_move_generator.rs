//! Legal move generation.
//!
//! Every pseudo-legal destination is simulated on a scratch copy of the
//! state and dropped when it leaves the mover's own king attacked.

use crate::errors::MoveError;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::move_generator::generate_pseudo_legal_moves;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}

/// Legal destinations for the piece on `square`, whichever side owns it.
/// Out-of-range or empty squares yield nothing.
pub fn possible_moves(game_state: &GameState, square: Square) -> Vec<Square> {
    let mut out = Vec::new();
    if !square.is_valid() {
        return out;
    }
    let Some(piece) = game_state.board.piece_at(square) else {
        return out;
    };

    generate_pseudo_legal_moves(game_state, square, piece, true, &mut out);
    out.retain(|&to| !would_leave_king_in_check(game_state, square, to));
    out
}

/// Simulates `from -> to` (en-passant removal and rook relocation included)
/// and reports whether the mover's king ends up attacked.
pub fn would_leave_king_in_check(game_state: &GameState, from: Square, to: Square) -> bool {
    let Some(piece) = game_state.board.piece_at(from) else {
        return false;
    };
    let mut scratch = *game_state;
    match apply_move(&mut scratch, from, to, None) {
        Ok(_) => is_in_check(&scratch.board, piece.color),
        Err(_) => true,
    }
}

/// All legal `(from, to)` pairs for the side to move.
pub fn legal_moves(game_state: &GameState) -> Vec<(Square, Square)> {
    let mut moves = Vec::with_capacity(64);
    for (from, _) in game_state.board.pieces_of(game_state.side_to_move) {
        moves.extend(possible_moves(game_state, from).into_iter().map(|to| (from, to)));
    }
    moves
}

pub fn has_any_legal_move(game_state: &GameState, color: Color) -> bool {
    game_state
        .board
        .pieces_of(color)
        .any(|(from, _)| !possible_moves(game_state, from).is_empty())
}

pub fn is_checkmate(game_state: &GameState, color: Color) -> bool {
    is_in_check(&game_state.board, color) && !has_any_legal_move(game_state, color)
}

pub fn is_stalemate(game_state: &GameState, color: Color) -> bool {
    !is_in_check(&game_state.board, color) && !has_any_legal_move(game_state, color)
}

/// Status of the side to move; computes check and mobility once.
pub fn game_status(game_state: &GameState) -> GameStatus {
    let color = game_state.side_to_move;
    let in_check = is_in_check(&game_state.board, color);
    let can_move = has_any_legal_move(game_state, color);
    match (in_check, can_move) {
        (true, false) => GameStatus::Checkmate,
        (false, false) => GameStatus::Stalemate,
        (true, true) => GameStatus::Check,
        (false, true) => GameStatus::Ongoing,
    }
}

pub fn validate_move(game_state: &GameState, from: Square, to: Square) -> Result<(), MoveError> {
    let piece = game_state
        .board
        .piece_at(from)
        .ok_or(MoveError::EmptyOrigin(from))?;
    if piece.color != game_state.side_to_move {
        return Err(MoveError::WrongSidePiece(from));
    }
    if !possible_moves(game_state, from).contains(&to) {
        return Err(MoveError::IllegalDestination { from, to });
    }
    Ok(())
}
