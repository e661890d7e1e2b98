use crate::errors::MoveError;
use crate::game_state::chess_rules::DEFAULT_PROMOTION;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_moves_king::{castling_rook_squares, is_castling_move};
use crate::move_generation::legal_moves_pawn::{en_passant_victim, is_pawn_promotion};

/// What a single applied move did to the board. Feedback and the history log
/// read this instead of diffing boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub from: Square,
    pub to: Square,
    pub moved: Piece,
    pub captured: Option<Piece>,
    /// Square the captured piece stood on; differs from `to` only for en passant.
    pub captured_on: Option<Square>,
    pub en_passant_victim: Option<Square>,
    pub rook_move: Option<(Square, Square)>,
    pub promotion: Option<PieceKind>,
}

impl AppliedMove {
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub fn is_castling(&self) -> bool {
        self.rook_move.is_some()
    }
}

/// Trusted mutation path: applies `from -> to` without a legality check. Only
/// an empty origin is refused. Side to move flips to the opposite of the
/// moved piece's color.
pub fn apply_move(
    game_state: &mut GameState,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> Result<AppliedMove, MoveError> {
    if !from.is_valid() || !to.is_valid() {
        return Err(MoveError::IllegalDestination { from, to });
    }
    let moved = game_state
        .board
        .piece_at(from)
        .ok_or(MoveError::EmptyOrigin(from))?;

    let board = &mut game_state.board;

    // En passant: a pawn moving diagonally onto the empty target square.
    let mut en_passant_square = None;
    if moved.kind == PieceKind::Pawn
        && from.col != to.col
        && board.is_empty(to)
        && game_state.en_passant == Some(to)
    {
        let victim = en_passant_victim(from, to);
        if board.piece_at(victim) == Some(Piece::new(moved.color.opposite(), PieceKind::Pawn)) {
            en_passant_square = Some(victim);
        }
    }

    let (captured, captured_on) = match en_passant_square {
        Some(victim) => (board.take(victim), Some(victim)),
        None => {
            let captured = board.take(to);
            (captured, captured.map(|_| to))
        }
    };

    board.set(from, None);

    let promotion = if is_pawn_promotion(moved, to) {
        Some(promotion.unwrap_or(DEFAULT_PROMOTION))
    } else {
        None
    };
    let placed = match promotion {
        Some(kind) => Piece::new(moved.color, kind),
        None => moved,
    };
    board.set(to, Some(placed));

    let rook_move = if is_castling_move(moved, from, to) {
        let (rook_from, rook_to) = castling_rook_squares(from, to);
        let rook = board.take(rook_from);
        board.set(rook_to, rook);
        Some((rook_from, rook_to))
    } else {
        None
    };

    update_castling_rights(&mut game_state.castling_rights, moved, from, captured, captured_on);

    game_state.en_passant = if moved.kind == PieceKind::Pawn && from.row.abs_diff(to.row) == 2 {
        Some(Square::new((from.row + to.row) / 2, from.col))
    } else {
        None
    };

    game_state.side_to_move = moved.color.opposite();

    Ok(AppliedMove {
        from,
        to,
        moved,
        captured,
        captured_on,
        en_passant_victim: en_passant_square,
        rook_move,
        promotion,
    })
}

fn update_castling_rights(
    rights: &mut CastlingRights,
    moved: Piece,
    from: Square,
    captured: Option<Piece>,
    captured_on: Option<Square>,
) {
    match moved.kind {
        PieceKind::King => rights.clear_color(moved.color),
        PieceKind::Rook => clear_rook_corner(rights, moved.color, from),
        _ => {}
    }

    if let (Some(piece), Some(square)) = (captured, captured_on) {
        if piece.kind == PieceKind::Rook {
            clear_rook_corner(rights, piece.color, square);
        }
    }
}

fn clear_rook_corner(rights: &mut CastlingRights, color: Color, square: Square) {
    if square.row != color.home_row() {
        return;
    }
    match square.col {
        7 => rights.clear(kingside_flag(color)),
        0 => rights.clear(queenside_flag(color)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::apply_move;
    use crate::game_state::chess_types::*;
    use crate::game_state::game_state::GameState;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("valid square")
    }

    #[test]
    fn double_push_sets_en_passant_target_and_flips_side() {
        let mut game = GameState::new_game();
        let applied = apply_move(&mut game, sq("e2"), sq("e4"), None).expect("move applies");
        assert_eq!(applied.captured, None);
        assert_eq!(game.en_passant, Some(sq("e3")));
        assert_eq!(game.side_to_move, Color::Black);

        apply_move(&mut game, sq("g8"), sq("f6"), None).expect("move applies");
        assert_eq!(game.en_passant, None);
    }

    #[test]
    fn en_passant_removes_victim_pawn() {
        let mut game = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        let applied = apply_move(&mut game, sq("e5"), sq("d6"), None).expect("move applies");
        assert_eq!(applied.en_passant_victim, Some(sq("d5")));
        assert_eq!(applied.captured, Some(Piece::new(Color::Black, PieceKind::Pawn)));
        assert!(game.board.is_empty(sq("d5")));
        assert_eq!(game.board.piece_at(sq("d6")), Some(Piece::new(Color::White, PieceKind::Pawn)));
    }

    #[test]
    fn castling_relocates_rook_and_clears_rights() {
        let mut game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let applied = apply_move(&mut game, sq("e1"), sq("g1"), None).expect("move applies");
        assert_eq!(applied.rook_move, Some((sq("h1"), sq("f1"))));
        assert_eq!(game.board.piece_at(sq("f1")), Some(Piece::new(Color::White, PieceKind::Rook)));
        assert!(game.board.is_empty(sq("h1")));
        assert_eq!(game.castling_rights.to_fen_field(), "kq");

        let applied = apply_move(&mut game, sq("e8"), sq("c8"), None).expect("move applies");
        assert_eq!(applied.rook_move, Some((sq("a8"), sq("d8"))));
        assert_eq!(game.castling_rights, CastlingRights::none());
    }

    #[test]
    fn promotion_defaults_to_queen_and_honours_choice() {
        let mut game = GameState::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let mut knight = game;

        apply_move(&mut game, sq("a7"), sq("a8"), None).expect("move applies");
        assert_eq!(game.board.piece_at(sq("a8")), Some(Piece::new(Color::White, PieceKind::Queen)));

        let applied = apply_move(&mut knight, sq("a7"), sq("a8"), Some(PieceKind::Knight)).expect("move applies");
        assert_eq!(applied.promotion, Some(PieceKind::Knight));
        assert_eq!(knight.board.piece_at(sq("a8")), Some(Piece::new(Color::White, PieceKind::Knight)));
    }

    #[test]
    fn capturing_home_rook_clears_that_right_only() {
        let mut game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2B w KQkq - 0 1").expect("FEN should parse");
        // Bishop h1 takes a8.
        apply_move(&mut game, sq("h1"), sq("a8"), None).expect("move applies");
        assert!(!game.castling_rights.has(CASTLE_BLACK_QUEENSIDE));
        assert!(game.castling_rights.has(CASTLE_BLACK_KINGSIDE));
    }

    #[test]
    fn rights_never_regained() {
        let mut game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let mut previous = game.castling_rights.bits();
        for (from, to) in [("h1", "h2"), ("a8", "a7"), ("h2", "h1"), ("a7", "a8"), ("e1", "e2"), ("e8", "e7")] {
            apply_move(&mut game, sq(from), sq(to), None).expect("move applies");
            let now = game.castling_rights.bits();
            assert_eq!(now & !previous, 0, "rights regained after {from}{to}");
            previous = now;
        }
        assert_eq!(game.castling_rights, CastlingRights::none());
    }

    #[test]
    fn empty_origin_is_refused_without_mutation() {
        let mut game = GameState::new_game();
        let before = game;
        assert!(apply_move(&mut game, sq("e4"), sq("e5"), None).is_err());
        assert_eq!(game, before);
    }
}
