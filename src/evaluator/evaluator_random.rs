//! Offline evaluator: a uniformly random legal move.
//!
//! Used for play without network access and for exercising the bot turn in
//! tests. The reported evaluation is the material balance.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::errors::EvaluatorError;
use crate::evaluator::evaluator_trait::{Evaluation, Evaluator, EvaluatorReply};
use crate::game_state::chess_rules::DEFAULT_PROMOTION;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::move_generation::legal_moves_pawn::is_pawn_promotion;
use crate::utils::long_algebraic::to_long_algebraic;
use crate::utils::material::material_balance;

pub struct RandomEvaluator {
    rng: StdRng,
}

impl RandomEvaluator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for RandomEvaluator {
    fn name(&self) -> &str {
        "random"
    }

    fn best_move(&mut self, fen: &str, _depth: u8) -> Result<EvaluatorReply, EvaluatorError> {
        let game_state = GameState::from_fen(fen).map_err(|err| EvaluatorError::Parse(err.to_string()))?;
        let moves = legal_moves(&game_state);
        let &(from, to) = moves.as_slice().choose(&mut self.rng).ok_or(EvaluatorError::NoMove)?;

        let promotion = game_state
            .board
            .piece_at(from)
            .filter(|piece| is_pawn_promotion(*piece, to))
            .map(|_| DEFAULT_PROMOTION);
        let best_move = to_long_algebraic(from, to, promotion).ok_or(EvaluatorError::NoMove)?;

        Ok(EvaluatorReply {
            best_move,
            evaluation: Evaluation::Pawns(material_balance(&game_state.board)),
        })
    }
}
