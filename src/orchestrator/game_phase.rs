use crate::errors::GameError;
use crate::evaluator::evaluator_trait::Evaluation;
use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};
use crate::history::game_header::GameResult;
use crate::move_generation::legal_move_apply::AppliedMove;

/// Who produced a move that still needs pieces moved by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    /// Already applied to the model; only the rook or en-passant victim is
    /// still to be moved.
    Player,
    /// Applied to the model once the board matches.
    Bot,
}

/// A move whose physical execution is being tracked square by square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMove {
    pub source: MoveSource,
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
    pub moved: Piece,
    pub captured: Option<Piece>,
    pub captured_on: Option<Square>,
    pub rook_move: Option<(Square, Square)>,
    pub en_passant_victim: Option<Square>,
    pub evaluation: Evaluation,
}

impl PendingMove {
    pub fn from_applied(source: MoveSource, applied: &AppliedMove, evaluation: Evaluation) -> Self {
        Self {
            source,
            from: applied.from,
            to: applied.to,
            promotion: applied.promotion,
            moved: applied.moved,
            captured: applied.captured,
            captured_on: applied.captured_on,
            rook_move: applied.rook_move,
            en_passant_victim: applied.en_passant_victim,
            evaluation,
        }
    }

    /// Capture standing on the destination square, which has to be lifted
    /// before the mover is put down.
    pub fn captures_on_destination(&self) -> bool {
        self.captured_on == Some(self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionProgress {
    /// The destination has been seen empty at least once.
    pub destination_cleared: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Stalemate,
    Resignation { winner: Color },
}

impl GameOutcome {
    pub fn result(self) -> GameResult {
        match self {
            GameOutcome::Checkmate { winner } | GameOutcome::Resignation { winner } => GameResult::win_for(winner),
            GameOutcome::Stalemate => GameResult::Draw,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GamePhase {
    AwaitingSetup { expected: [[bool; 8]; 8] },
    Idle,
    PieceSelected { origin: Square, destinations: Vec<Square> },
    BotRequesting,
    BotAnnounced { pending: PendingMove },
    AwaitingPhysicalCompletion { pending: PendingMove, progress: CompletionProgress },
    AwaitingManualRetry { reason: GameError },
    GameOver { outcome: GameOutcome },
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    SetupComplete,
    PieceSelected { origin: Square, destinations: Vec<Square> },
    SelectionCancelled { origin: Square },
    MoveApplied(AppliedMove),
    Rejected(GameError),
    BotMoveAnnounced { from: Square, to: Square },
    BotMoveCompleted(AppliedMove),
    EvaluatorFailed(GameError),
    StorageWarning(GameError),
    Check { king: Square },
    GameOver(GameOutcome),
}
