//! Error types used throughout the board core.
//!
//! Each subsystem has its own error enum so callers can match on precise
//! failure modes. `GameError` is the orchestrator-facing taxonomy: every
//! variant is recoverable, either by rolling back to the pre-action state or
//! by pausing until a fresh external action (sensor event, retry, restart).

use thiserror::Error;

use crate::game_state::chess_types::Square;

/// FEN parsing failures. The parser is tolerant, so only a missing placement
/// field is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("FEN string has no piece placement field")]
    MissingPlacement,
}

/// Failures while validating or applying a single move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no piece on origin square {0:?}")]
    EmptyOrigin(Square),
    #[error("piece on {0:?} does not belong to the side to move")]
    WrongSidePiece(Square),
    #[error("destination {to:?} is not legal for the piece on {from:?}")]
    IllegalDestination { from: Square, to: Square },
    #[error("invalid coordinate move notation: {0}")]
    InvalidNotation(String),
}

/// Network-level failures; all of them mean "no response".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("empty response")]
    EmptyResponse,
}

/// Failures of an evaluator request after the retry policy gave up.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluatorError {
    #[error("evaluator gave no response after {attempts} attempt(s)")]
    Timeout { attempts: u32 },
    #[error("evaluator response could not be parsed: {0}")]
    Parse(String),
    #[error("evaluator returned an unusable move {mv}: {reason}")]
    RejectedMove { mv: String, reason: String },
    #[error("evaluator has no move in this position")]
    NoMove,
}

/// Failures reading persisted history. Write failures are absorbed by the log
/// and never surface through this type.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("no live game is stored")]
    NoLiveGame,
    #[error("saved game is corrupted or incompatible: {0}")]
    CorruptedOrIncompatibleSave(String),
    #[error("archived game {0} not found")]
    GameNotFound(u32),
    #[error("storage failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot serialize game list: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Orchestrator-facing failure taxonomy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("illegal destination {to:?} for piece on {from:?}")]
    InvalidMove { from: Square, to: Square },
    #[error("piece on {0:?} belongs to the other side")]
    WrongSidePiece(Square),
    #[error("evaluator did not answer after {attempts} attempt(s)")]
    EvaluatorTimeout { attempts: u32 },
    #[error("evaluator reply unusable: {0}")]
    EvaluatorParseFailure(String),
    #[error("history write failed: {0}")]
    StorageWriteFailure(String),
    #[error("cannot resume saved game: {0}")]
    CorruptedOrIncompatibleSave(String),
}

impl From<EvaluatorError> for GameError {
    fn from(err: EvaluatorError) -> Self {
        match err {
            EvaluatorError::Timeout { attempts } => GameError::EvaluatorTimeout { attempts },
            other => GameError::EvaluatorParseFailure(other.to_string()),
        }
    }
}

impl From<HistoryError> for GameError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::CorruptedOrIncompatibleSave(reason) => GameError::CorruptedOrIncompatibleSave(reason),
            HistoryError::NoLiveGame => GameError::CorruptedOrIncompatibleSave("no live game".to_owned()),
            other => GameError::StorageWriteFailure(other.to_string()),
        }
    }
}
