//! Crate root module declarations for the Plum sensor-board controller.
//!
//! Exposes the rules engine (game state, move generation, FEN utilities),
//! the persistent move log, evaluator clients, hardware seams, and the game
//! orchestrator that ties them together so the demo binary, benches, and
//! firmware glue can import stable module paths.

pub mod errors;
pub mod config;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_bishop;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_queen;
    pub mod legal_moves_rook;
    pub mod move_generator;
    pub mod perft;
}

pub mod history {
    pub mod archive;
    pub mod game_header;
    pub mod move_codec;
    pub mod move_history;
    pub mod storage;
}

pub mod evaluator {
    pub mod evaluator_random;
    pub mod evaluator_remote;
    pub mod evaluator_trait;
    pub mod http_transport;
    pub mod retry_policy;
    pub mod stockfish_api;
}

pub mod hardware {
    pub mod board_driver;
    pub mod led_colors;
    pub mod publisher;
    pub mod simulated_board;
}

pub mod orchestrator {
    pub mod bot_turn;
    pub mod feedback;
    pub mod game_orchestrator;
    pub mod game_phase;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod material;
    pub mod render_game_state;
}
