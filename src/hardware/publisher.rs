//! Board-state notifications for viewers (web page, companion app).

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::game_state::game_state::GameState;

/// Fire-and-forget sink for the position after each change.
pub trait BoardStatePublisher {
    fn publish_board_state(&mut self, game_state: &GameState, evaluation: f32);
}

/// JSON shape published to viewers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardStateView {
    /// Rank 8 first; `' '` for empty squares.
    pub board: [[char; 8]; 8],
    pub fen: String,
    pub evaluation: f32,
}

impl BoardStateView {
    pub fn new(game_state: &GameState, evaluation: f32) -> Self {
        Self {
            board: game_state.board.to_char_grid(),
            fen: game_state.to_fen(),
            evaluation,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Keeps the latest view for readers on other threads.
#[derive(Debug, Clone, Default)]
pub struct LatestBoardState {
    latest: Arc<Mutex<Option<BoardStateView>>>,
}

impl LatestBoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<BoardStateView> {
        self.latest.lock().ok().and_then(|guard| guard.clone())
    }
}

impl BoardStatePublisher for LatestBoardState {
    fn publish_board_state(&mut self, game_state: &GameState, evaluation: f32) {
        if let Ok(mut guard) = self.latest.lock() {
            *guard = Some(BoardStateView::new(game_state, evaluation));
        }
    }
}

/// Publisher that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPublisher;

impl BoardStatePublisher for NullPublisher {
    fn publish_board_state(&mut self, _game_state: &GameState, _evaluation: f32) {}
}
