//! LED patterns for each phase of play.

use crate::game_state::chess_types::Square;
use crate::game_state::game_state::GameState;
use crate::hardware::board_driver::BoardDriver;
use crate::hardware::led_colors::LedColor;
use crate::move_generation::legal_move_apply::AppliedMove;
use crate::orchestrator::game_phase::PendingMove;

const THINKING_SQUARES: [Square; 4] = [Square::new(3, 3), Square::new(3, 4), Square::new(4, 3), Square::new(4, 4)];

fn each_square() -> impl Iterator<Item = Square> {
    (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square::new(row, col)))
}

/// Orange where a piece is missing, red where one should not be. Returns
/// true once the board matches.
pub fn show_setup_diff(board: &mut dyn BoardDriver, expected: &[[bool; 8]; 8]) -> bool {
    let mut matches = true;
    for square in each_square() {
        let want = expected[square.row as usize][square.col as usize];
        let have = board.sensor_state(square);
        let color = match (want, have) {
            (true, false) => LedColor::Setup,
            (false, true) => LedColor::Attack,
            _ => LedColor::Off,
        };
        matches &= color == LedColor::Off;
        board.set_square_led(square, color);
    }
    board.show_leds();
    matches
}

/// Cyan origin, red on captures, white on quiet destinations.
pub fn show_selection(board: &mut dyn BoardDriver, game_state: &GameState, origin: Square, destinations: &[Square]) {
    board.clear_all_leds();
    board.set_square_led(origin, LedColor::Pickup);
    for &to in destinations {
        let color = if game_state.board.piece_at(to).is_some() {
            LedColor::Attack
        } else if game_state.en_passant == Some(to) {
            LedColor::EnPassant
        } else {
            LedColor::Move
        };
        board.set_square_led(to, color);
    }
    board.show_leds();
}

pub fn show_thinking(board: &mut dyn BoardDriver) {
    board.clear_all_leds();
    for square in THINKING_SQUARES {
        board.set_square_led(square, LedColor::BotThinking);
    }
    board.show_leds();
}

/// Squares the player has to act on to carry out `pending`.
pub fn show_pending_move(board: &mut dyn BoardDriver, pending: &PendingMove) {
    board.clear_all_leds();
    board.set_square_led(pending.from, LedColor::Pickup);
    let destination = if pending.captures_on_destination() { LedColor::Attack } else { LedColor::Move };
    board.set_square_led(pending.to, destination);
    if let Some((rook_from, rook_to)) = pending.rook_move {
        board.set_square_led(rook_from, LedColor::Pickup);
        board.set_square_led(rook_to, LedColor::Move);
    }
    if let Some(victim) = pending.en_passant_victim {
        board.set_square_led(victim, LedColor::EnPassant);
    }
    board.show_leds();
}

/// Capture and promotion animations, then a confirm flash on the destination.
pub fn show_move_applied(board: &mut dyn BoardDriver, applied: &AppliedMove) {
    if let Some(square) = applied.captured_on {
        board.capture_animation(square);
    }
    if applied.promotion.is_some() {
        board.promotion_animation(applied.to.col);
    }
    board.confirm_square(applied.to);
    board.clear_all_leds();
    board.show_leds();
}

pub fn show_check(board: &mut dyn BoardDriver, king: Square) {
    board.blink_square(king, LedColor::Check);
}

pub fn show_error(board: &mut dyn BoardDriver, square: Square) {
    board.blink_square(square, LedColor::Attack);
}

pub fn clear(board: &mut dyn BoardDriver) {
    board.clear_all_leds();
    board.show_leds();
}
