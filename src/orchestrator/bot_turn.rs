//! Bot move planning and tracking its execution on the physical board.

use crate::errors::GameError;
use crate::evaluator::evaluator_trait::EvaluatorReply;
use crate::game_state::game_state::GameState;
use crate::hardware::board_driver::BoardDriver;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_generator::possible_moves;
use crate::orchestrator::game_phase::{CompletionProgress, MoveSource, PendingMove};
use crate::utils::long_algebraic::parse_long_algebraic;

/// Re-validates the evaluator's move against the model and works out every
/// square the player will have to touch. The model itself is not changed.
pub fn plan_bot_move(game_state: &GameState, reply: &EvaluatorReply) -> Result<PendingMove, GameError> {
    let reject = |reason: String| GameError::EvaluatorParseFailure(format!("{}: {reason}", reply.best_move));

    let mv = parse_long_algebraic(&reply.best_move).map_err(|err| reject(err.to_string()))?;
    let piece = game_state
        .board
        .piece_at(mv.from)
        .ok_or_else(|| reject("origin square is empty".to_owned()))?;
    if piece.color != game_state.side_to_move {
        return Err(reject("piece belongs to the other side".to_owned()));
    }
    if !possible_moves(game_state, mv.from).contains(&mv.to) {
        return Err(reject("destination is not legal".to_owned()));
    }

    let mut scratch = *game_state;
    let applied = apply_move(&mut scratch, mv.from, mv.to, mv.promotion).map_err(|err| reject(err.to_string()))?;
    Ok(PendingMove::from_applied(MoveSource::Bot, &applied, reply.evaluation))
}

/// Samples the board against `pending` and reports whether every square is
/// in its final state.
pub fn advance_completion(
    board: &dyn BoardDriver,
    pending: &PendingMove,
    progress: CompletionProgress,
) -> (CompletionProgress, bool) {
    let mut progress = progress;
    if !board.sensor_state(pending.to) {
        progress.destination_cleared = true;
    }

    let mut must_be_empty = vec![pending.from];
    let mut must_be_occupied = vec![pending.to];
    if let Some((rook_from, rook_to)) = pending.rook_move {
        must_be_empty.push(rook_from);
        must_be_occupied.push(rook_to);
    }
    if let Some(victim) = pending.en_passant_victim {
        must_be_empty.push(victim);
    }

    let capture_done = pending.source == MoveSource::Player
        || !pending.captures_on_destination()
        || progress.destination_cleared;

    let complete = capture_done
        && must_be_empty.iter().all(|&sq| !board.sensor_state(sq))
        && must_be_occupied.iter().all(|&sq| board.sensor_state(sq));

    (progress, complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::evaluator_trait::Evaluation;
    use crate::game_state::chess_types::Square;
    use crate::hardware::simulated_board::SimulatedBoard;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("valid square")
    }

    fn reply(mv: &str) -> EvaluatorReply {
        EvaluatorReply {
            best_move: mv.to_owned(),
            evaluation: Evaluation::Pawns(0.0),
        }
    }

    #[test]
    fn rejects_moves_the_model_does_not_allow() {
        let game = GameState::new_game();
        for bad in ["e7e5", "e3e4", "e2e5", "zz99"] {
            assert!(
                matches!(plan_bot_move(&game, &reply(bad)), Err(GameError::EvaluatorParseFailure(_))),
                "{bad} should be rejected"
            );
        }
        assert!(plan_bot_move(&game, &reply("g1f3")).is_ok());
    }

    #[test]
    fn capture_requires_destination_to_be_cleared_first() {
        let game = GameState::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let pending = plan_bot_move(&game, &reply("e4d5")).expect("legal capture");
        assert!(pending.captures_on_destination());

        let mut board = SimulatedBoard::with_pieces(&game.board);
        // Mover lifted and dropped straight on top: never saw d5 empty.
        board.lift(sq("e4"));
        board.read_sensors();
        let (progress, complete) = advance_completion(&board, &pending, CompletionProgress::default());
        assert!(!complete);

        board.lift(sq("d5"));
        board.read_sensors();
        let (progress, complete) = advance_completion(&board, &pending, progress);
        assert!(!complete);
        assert!(progress.destination_cleared);

        board.place(sq("d5"));
        board.read_sensors();
        let (_, complete) = advance_completion(&board, &pending, progress);
        assert!(complete);
    }

    #[test]
    fn castling_needs_both_pieces_moved() {
        let game = GameState::from_fen("r3k2r/8/8/8/8/8/8/4K3 b kq - 0 1").expect("FEN should parse");
        let pending = plan_bot_move(&game, &reply("e8g8")).expect("legal castle");
        assert_eq!(pending.rook_move, Some((sq("h8"), sq("f8"))));

        let mut board = SimulatedBoard::with_pieces(&game.board);
        board.lift(sq("e8"));
        board.place(sq("g8"));
        board.read_sensors();
        let (progress, complete) = advance_completion(&board, &pending, CompletionProgress::default());
        assert!(!complete);

        board.lift(sq("h8"));
        board.place(sq("f8"));
        board.read_sensors();
        assert!(advance_completion(&board, &pending, progress).1);
    }
}
