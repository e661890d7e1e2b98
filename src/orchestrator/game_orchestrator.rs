//! Per-tick game controller.
//!
//! Reads sensor edges, validates them against the rules engine, drives LED
//! feedback, records every applied half-move, and in bot mode runs the
//! evaluator round trip. All collaborators are borrowed for the life of the
//! session.

use log::{debug, info, warn};

use crate::errors::GameError;
use crate::evaluator::evaluator_trait::{Evaluation, Evaluator};
use crate::game_state::chess_types::{Board, Color, Square};
use crate::game_state::game_state::GameState;
use crate::hardware::board_driver::BoardDriver;
use crate::hardware::publisher::BoardStatePublisher;
use crate::history::game_header::GameMode;
use crate::history::move_history::MoveHistory;
use crate::move_generation::legal_move_apply::{apply_move, AppliedMove};
use crate::move_generation::legal_move_checks::king_square;
use crate::move_generation::legal_move_generator::{game_status, possible_moves, GameStatus};
use crate::orchestrator::bot_turn::{advance_completion, plan_bot_move};
use crate::orchestrator::feedback;
use crate::orchestrator::game_phase::{
    CompletionProgress, GameEvent, GameOutcome, GamePhase, MoveSource, PendingMove,
};
use crate::utils::material::material_balance;
use crate::utils::render_game_state::render_game_state;

pub enum PlayMode<'a> {
    Moves,
    Bot {
        player_color: Color,
        depth: u8,
        evaluator: &'a mut dyn Evaluator,
    },
}

impl PlayMode<'_> {
    fn game_mode(&self) -> GameMode {
        match self {
            PlayMode::Moves => GameMode::Moves,
            PlayMode::Bot { .. } => GameMode::Bot,
        }
    }

    fn player_color(&self) -> Option<Color> {
        match self {
            PlayMode::Moves => None,
            PlayMode::Bot { player_color, .. } => Some(*player_color),
        }
    }

    fn depth(&self) -> u8 {
        match self {
            PlayMode::Moves => 0,
            PlayMode::Bot { depth, .. } => *depth,
        }
    }
}

pub struct GameOrchestrator<'a> {
    board: &'a mut dyn BoardDriver,
    publisher: &'a mut dyn BoardStatePublisher,
    history: &'a mut MoveHistory,
    mode: PlayMode<'a>,
    state: GameState,
    phase: GamePhase,
    evaluation: f32,
    snapshot_interval: u16,
    entries_since_snapshot: u16,
}

impl<'a> GameOrchestrator<'a> {
    pub fn new(
        board: &'a mut dyn BoardDriver,
        publisher: &'a mut dyn BoardStatePublisher,
        history: &'a mut MoveHistory,
        mode: PlayMode<'a>,
        snapshot_interval: u16,
    ) -> Self {
        Self {
            board,
            publisher,
            history,
            mode,
            state: GameState::new_game(),
            phase: GamePhase::Idle,
            evaluation: 0.0,
            snapshot_interval,
            entries_since_snapshot: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn evaluation(&self) -> f32 {
        self.evaluation
    }

    pub fn start_new_game(&mut self) {
        self.start_game(GameState::new_game());
    }

    /// Starts recording a game from `state` and waits for the pieces to be
    /// set up to match it.
    pub fn start_game(&mut self, state: GameState) {
        self.state = state;
        self.evaluation = material_balance(&state.board);
        self.entries_since_snapshot = 0;
        self.history
            .start_game(self.mode.game_mode(), self.mode.player_color(), self.mode.depth());
        self.enter_setup();
        info!("new {:?} game started", self.mode.game_mode());
    }

    /// Rebuilds the interrupted live game. A save that cannot be replayed is
    /// discarded; one recorded under a different play mode is left on disk.
    pub fn resume(&mut self) -> Result<(), GameError> {
        if let Some(info) = self.history.live_game_info() {
            let expected = (self.mode.game_mode(), self.mode.player_color(), self.mode.depth());
            if (info.mode, info.player_color, info.bot_depth) != expected {
                warn!("live game was recorded as {info:?}, not resuming it as {expected:?}");
                return Err(GameError::CorruptedOrIncompatibleSave(format!(
                    "live game was recorded as {info:?}"
                )));
            }
        }
        match self.history.replay_into_game() {
            Ok(resumed) => {
                self.state = resumed.state;
                self.evaluation = material_balance(&self.state.board);
                self.entries_since_snapshot = u16::try_from(resumed.replayed_moves).unwrap_or(u16::MAX);
                self.enter_setup();
                info!("resumed game, {} move(s) after last snapshot", resumed.replayed_moves);
                Ok(())
            }
            Err(err) => {
                warn!("cannot resume live game: {err}");
                self.history.discard_live_game();
                Err(GameError::CorruptedOrIncompatibleSave(err.to_string()))
            }
        }
    }

    /// Replaces the model with a hand-corrected position. Castling rights
    /// can only shrink to what the new placement still allows.
    pub fn correct_board_state(&mut self, board: Board) {
        self.state.board = board;
        self.state.castling_rights = self.state.castling_rights.restricted_to_board(&board);
        self.state.en_passant = None;

        self.board.read_sensors();
        self.board.update_sensor_prev();
        self.snapshot();
        self.publish();
        feedback::clear(self.board);

        if !matches!(self.phase, GamePhase::GameOver { .. }) {
            self.phase = self.next_turn_phase();
        }
        debug!("board corrected:\n{}", render_game_state(&self.state));
    }

    /// Leaves `AwaitingManualRetry` and asks the evaluator again on the
    /// next tick.
    pub fn retry_bot_move(&mut self) -> bool {
        if matches!(self.phase, GamePhase::AwaitingManualRetry { .. }) {
            self.phase = GamePhase::BotRequesting;
            feedback::show_thinking(self.board);
            true
        } else {
            false
        }
    }

    pub fn resign(&mut self, color: Color) -> Option<GameOutcome> {
        if matches!(self.phase, GamePhase::GameOver { .. }) {
            return None;
        }
        let outcome = GameOutcome::Resignation {
            winner: color.opposite(),
        };
        self.end_game(outcome);
        Some(outcome)
    }

    /// One control-loop tick.
    pub fn update(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.board.read_sensors();

        match self.phase.clone() {
            GamePhase::AwaitingSetup { expected } => self.tick_setup(&expected, &mut events),
            GamePhase::Idle => self.tick_idle(&mut events),
            GamePhase::PieceSelected { origin, destinations } => {
                self.tick_selected(origin, &destinations, &mut events)
            }
            GamePhase::BotRequesting => self.request_bot_move(&mut events),
            GamePhase::BotAnnounced { pending } => {
                self.phase = GamePhase::AwaitingPhysicalCompletion {
                    pending,
                    progress: CompletionProgress::default(),
                };
                self.tick_completion(pending, CompletionProgress::default(), &mut events);
            }
            GamePhase::AwaitingPhysicalCompletion { pending, progress } => {
                self.tick_completion(pending, progress, &mut events)
            }
            GamePhase::AwaitingManualRetry { .. } | GamePhase::GameOver { .. } => {}
        }

        self.board.update_sensor_prev();
        events
    }

    fn enter_setup(&mut self) {
        let expected = self.state.board.occupancy();
        self.phase = GamePhase::AwaitingSetup { expected };
        feedback::show_setup_diff(self.board, &expected);
    }

    fn tick_setup(&mut self, expected: &[[bool; 8]; 8], events: &mut Vec<GameEvent>) {
        if !feedback::show_setup_diff(self.board, expected) {
            return;
        }
        self.board.celebration_animation();
        feedback::clear(self.board);
        self.snapshot();
        self.publish();
        events.push(GameEvent::SetupComplete);
        self.collect_storage_warning(events);
        self.phase = self.next_turn_phase();
        if self.phase == GamePhase::BotRequesting {
            feedback::show_thinking(self.board);
        }
        info!("board set up, {:?} to move", self.state.side_to_move);
    }

    fn tick_idle(&mut self, events: &mut Vec<GameEvent>) {
        let Some(origin) = self.first_edge(true) else {
            return;
        };
        let Some(piece) = self.state.board.piece_at(origin) else {
            debug!("pickup on empty model square {origin:?} ignored");
            return;
        };

        let player_side = match self.mode.player_color() {
            Some(player) => player == piece.color,
            None => true,
        };
        let own_side = piece.color == self.state.side_to_move && player_side;
        if !own_side {
            feedback::show_error(self.board, origin);
            events.push(GameEvent::Rejected(GameError::WrongSidePiece(origin)));
            return;
        }

        let destinations = possible_moves(&self.state, origin);
        feedback::show_selection(self.board, &self.state, origin, &destinations);
        events.push(GameEvent::PieceSelected {
            origin,
            destinations: destinations.clone(),
        });
        self.phase = GamePhase::PieceSelected { origin, destinations };
    }

    fn tick_selected(&mut self, origin: Square, destinations: &[Square], events: &mut Vec<GameEvent>) {
        let Some(target) = self.first_edge(false) else {
            return;
        };

        if target == origin {
            feedback::clear(self.board);
            events.push(GameEvent::SelectionCancelled { origin });
            self.phase = GamePhase::Idle;
            return;
        }

        if !destinations.contains(&target) {
            feedback::show_error(self.board, target);
            feedback::show_selection(self.board, &self.state, origin, destinations);
            events.push(GameEvent::Rejected(GameError::InvalidMove { from: origin, to: target }));
            return;
        }

        let applied = match apply_move(&mut self.state, origin, target, None) {
            Ok(applied) => applied,
            Err(err) => {
                warn!("selected move could not be applied: {err}");
                feedback::show_error(self.board, target);
                events.push(GameEvent::Rejected(GameError::InvalidMove { from: origin, to: target }));
                return;
            }
        };

        self.evaluation = material_balance(&self.state.board);
        events.push(GameEvent::MoveApplied(applied));
        self.after_move(&applied, events);
        if matches!(self.phase, GamePhase::GameOver { .. }) {
            return;
        }

        // Rook or en-passant victim still to be moved by hand.
        if applied.rook_move.is_some() || applied.en_passant_victim.is_some() {
            let pending = PendingMove::from_applied(MoveSource::Player, &applied, Evaluation::Pawns(self.evaluation));
            feedback::show_pending_move(self.board, &pending);
            self.phase = GamePhase::AwaitingPhysicalCompletion {
                pending,
                progress: CompletionProgress::default(),
            };
            return;
        }

        self.begin_next_turn();
    }

    fn request_bot_move(&mut self, events: &mut Vec<GameEvent>) {
        let fen = self.state.to_fen();
        let reply = match &mut self.mode {
            PlayMode::Bot { depth, evaluator, .. } => {
                info!("asking {} for a move at depth {depth}", evaluator.name());
                self.board.connecting_animation();
                evaluator.best_move(&fen, *depth)
            }
            PlayMode::Moves => {
                self.phase = GamePhase::Idle;
                return;
            }
        };

        let planned = reply
            .map_err(GameError::from)
            .and_then(|reply| plan_bot_move(&self.state, &reply));

        match planned {
            Ok(pending) => {
                self.evaluation = pending.evaluation.score();
                feedback::show_pending_move(self.board, &pending);
                events.push(GameEvent::BotMoveAnnounced {
                    from: pending.from,
                    to: pending.to,
                });
                self.phase = GamePhase::BotAnnounced { pending };
            }
            Err(reason) => {
                warn!("bot move failed: {reason}");
                if let Some(king) = king_square(&self.state.board, self.state.side_to_move) {
                    feedback::show_error(self.board, king);
                }
                events.push(GameEvent::EvaluatorFailed(reason.clone()));
                self.phase = GamePhase::AwaitingManualRetry { reason };
            }
        }
    }

    fn tick_completion(&mut self, pending: PendingMove, progress: CompletionProgress, events: &mut Vec<GameEvent>) {
        let (progress, complete) = advance_completion(&*self.board, &pending, progress);
        if !complete {
            self.phase = GamePhase::AwaitingPhysicalCompletion { pending, progress };
            return;
        }

        match pending.source {
            MoveSource::Player => {
                feedback::clear(self.board);
                self.begin_next_turn();
            }
            MoveSource::Bot => {
                let applied = match apply_move(&mut self.state, pending.from, pending.to, pending.promotion) {
                    Ok(applied) => applied,
                    Err(err) => {
                        let reason = GameError::EvaluatorParseFailure(err.to_string());
                        events.push(GameEvent::EvaluatorFailed(reason.clone()));
                        self.phase = GamePhase::AwaitingManualRetry { reason };
                        return;
                    }
                };
                self.evaluation = pending.evaluation.score();
                events.push(GameEvent::BotMoveCompleted(applied));
                self.after_move(&applied, events);
                if !matches!(self.phase, GamePhase::GameOver { .. }) {
                    self.phase = GamePhase::Idle;
                }
            }
        }
    }

    /// Record, publish, feedback and end-of-game detection shared by player
    /// and bot moves.
    fn after_move(&mut self, applied: &AppliedMove, events: &mut Vec<GameEvent>) {
        self.history.add_move(applied.from, applied.to, applied.promotion);
        self.entries_since_snapshot = self.entries_since_snapshot.saturating_add(1);
        if self.snapshot_interval > 0 && self.entries_since_snapshot >= self.snapshot_interval {
            self.snapshot();
        }
        self.collect_storage_warning(events);

        feedback::show_move_applied(self.board, applied);
        self.publish();
        debug!("after {:?}->{:?}:\n{}", applied.from, applied.to, render_game_state(&self.state));

        let mover = applied.moved.color;
        match game_status(&self.state) {
            GameStatus::Checkmate => self.end_game(GameOutcome::Checkmate { winner: mover }),
            GameStatus::Stalemate => self.end_game(GameOutcome::Stalemate),
            GameStatus::Check => {
                if let Some(king) = king_square(&self.state.board, self.state.side_to_move) {
                    feedback::show_check(self.board, king);
                    events.push(GameEvent::Check { king });
                }
            }
            GameStatus::Ongoing => {}
        }

        if let GamePhase::GameOver { outcome } = self.phase {
            events.push(GameEvent::GameOver(outcome));
        }
    }

    fn end_game(&mut self, outcome: GameOutcome) {
        info!("game over: {outcome:?}");
        self.history.finish_game(outcome.result());
        self.board.celebration_animation();
        self.phase = GamePhase::GameOver { outcome };
    }

    fn begin_next_turn(&mut self) {
        self.phase = self.next_turn_phase();
        if self.phase == GamePhase::BotRequesting {
            feedback::show_thinking(self.board);
        }
    }

    fn next_turn_phase(&self) -> GamePhase {
        match self.mode.player_color() {
            Some(player) if player != self.state.side_to_move => GamePhase::BotRequesting,
            _ => GamePhase::Idle,
        }
    }

    fn snapshot(&mut self) {
        self.history.add_fen(&self.state.to_fen());
        self.entries_since_snapshot = 0;
    }

    fn publish(&mut self) {
        self.publisher.publish_board_state(&self.state, self.evaluation);
    }

    fn collect_storage_warning(&mut self, events: &mut Vec<GameEvent>) {
        if let Some(reason) = self.history.take_write_failure() {
            events.push(GameEvent::StorageWarning(GameError::StorageWriteFailure(reason)));
        }
    }

    /// First square with a pickup (`lifted == true`) or placement edge,
    /// scanning rank 8 to rank 1.
    fn first_edge(&self, lifted: bool) -> Option<Square> {
        (0..8u8)
            .flat_map(|row| (0..8u8).map(move |col| Square::new(row, col)))
            .find(|&square| {
                let prev = self.board.sensor_prev(square);
                let now = self.board.sensor_state(square);
                if lifted {
                    prev && !now
                } else {
                    !prev && now
                }
            })
    }
}
