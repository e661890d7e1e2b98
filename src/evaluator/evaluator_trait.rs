//! Move-evaluator abstraction used by the bot turn.
//!
//! The orchestrator hands over a FEN and a depth and gets back a coordinate
//! move plus a score. Implementations block until they have an answer or
//! have given up.

use crate::errors::EvaluatorError;

/// Score magnitude used for forced mates, in pawns.
pub const MATE_SCORE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// Positive favours White.
    Pawns(f32),
    /// Moves to mate; positive when White mates.
    MateIn(i32),
}

impl Evaluation {
    pub fn score(self) -> f32 {
        match self {
            Evaluation::Pawns(pawns) => pawns,
            Evaluation::MateIn(moves) if moves < 0 => -MATE_SCORE,
            Evaluation::MateIn(_) => MATE_SCORE,
        }
    }
}

impl Default for Evaluation {
    fn default() -> Self {
        Evaluation::Pawns(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorReply {
    /// Coordinate notation, e.g. `e7e8q`.
    pub best_move: String,
    pub evaluation: Evaluation,
}

pub trait Evaluator {
    fn name(&self) -> &str;

    fn best_move(&mut self, fen: &str, depth: u8) -> Result<EvaluatorReply, EvaluatorError>;
}

#[cfg(test)]
mod tests {
    use super::{Evaluation, MATE_SCORE};

    #[test]
    fn mate_scores_clamp_to_mate_score_with_sign() {
        assert_eq!(Evaluation::MateIn(3).score(), MATE_SCORE);
        assert_eq!(Evaluation::MateIn(-2).score(), -MATE_SCORE);
        assert_eq!(Evaluation::Pawns(-0.35).score(), -0.35);
    }
}
