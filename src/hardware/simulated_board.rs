//! In-memory board used by tests and the demo binary.
//!
//! `lift`/`place` change the physical occupancy; the driver only sees the
//! change after the next `read_sensors`, like the real scanner.

use std::cell::RefCell;
use std::rc::Rc;

use crate::game_state::chess_types::{Board, Square};
use crate::hardware::board_driver::BoardDriver;
use crate::hardware::led_colors::LedColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    Confirm(Square),
    Blink(Square, LedColor),
    Capture(Square),
    Promotion(u8),
    Connecting,
    Celebration,
}

#[derive(Debug, Clone)]
struct SimState {
    physical: [[bool; 8]; 8],
    sampled: [[bool; 8]; 8],
    prev: [[bool; 8]; 8],
    leds: [[LedColor; 8]; 8],
    animations: Vec<Animation>,
    frames_shown: usize,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            physical: [[false; 8]; 8],
            sampled: [[false; 8]; 8],
            prev: [[false; 8]; 8],
            leds: [[LedColor::Off; 8]; 8],
            animations: Vec::new(),
            frames_shown: 0,
        }
    }
}

/// Cloning yields another handle onto the same board, so a test can move
/// pieces while the orchestrator holds the driver.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBoard {
    inner: Rc<RefCell<SimState>>,
}

fn cell<T: Copy>(grid: &[[T; 8]; 8], square: Square) -> Option<T> {
    square
        .is_valid()
        .then(|| grid[square.row as usize][square.col as usize])
}

impl SimulatedBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pieces standing where `board` has them, already latched as the
    /// previous sample.
    pub fn with_pieces(board: &Board) -> Self {
        let occupancy = board.occupancy();
        let state = SimState {
            physical: occupancy,
            sampled: occupancy,
            prev: occupancy,
            ..SimState::default()
        };
        Self {
            inner: Rc::new(RefCell::new(state)),
        }
    }

    pub fn lift(&self, square: Square) {
        if square.is_valid() {
            self.inner.borrow_mut().physical[square.row as usize][square.col as usize] = false;
        }
    }

    pub fn place(&self, square: Square) {
        if square.is_valid() {
            self.inner.borrow_mut().physical[square.row as usize][square.col as usize] = true;
        }
    }

    /// Lift from `from` and put down on `to`.
    pub fn slide(&self, from: Square, to: Square) {
        self.lift(from);
        self.place(to);
    }

    pub fn set_physical(&self, occupancy: [[bool; 8]; 8]) {
        self.inner.borrow_mut().physical = occupancy;
    }

    pub fn led(&self, square: Square) -> LedColor {
        cell(&self.inner.borrow().leds, square).unwrap_or(LedColor::Off)
    }

    pub fn lit_squares(&self) -> Vec<(Square, LedColor)> {
        let state = self.inner.borrow();
        let mut lit = Vec::new();
        for row in 0..8u8 {
            for col in 0..8u8 {
                let color = state.leds[row as usize][col as usize];
                if color != LedColor::Off {
                    lit.push((Square::new(row, col), color));
                }
            }
        }
        lit
    }

    pub fn animations(&self) -> Vec<Animation> {
        self.inner.borrow().animations.clone()
    }

    pub fn clear_animations(&self) {
        self.inner.borrow_mut().animations.clear();
    }

    pub fn frames_shown(&self) -> usize {
        self.inner.borrow().frames_shown
    }

    fn animate(&self, animation: Animation) {
        self.inner.borrow_mut().animations.push(animation);
    }
}

impl BoardDriver for SimulatedBoard {
    fn read_sensors(&mut self) {
        let mut state = self.inner.borrow_mut();
        let physical = state.physical;
        state.sampled = physical;
    }

    fn sensor_state(&self, square: Square) -> bool {
        cell(&self.inner.borrow().sampled, square).unwrap_or(false)
    }

    fn sensor_prev(&self, square: Square) -> bool {
        cell(&self.inner.borrow().prev, square).unwrap_or(false)
    }

    fn update_sensor_prev(&mut self) {
        let mut state = self.inner.borrow_mut();
        let sampled = state.sampled;
        state.prev = sampled;
    }

    fn set_square_led(&mut self, square: Square, color: LedColor) {
        if square.is_valid() {
            self.inner.borrow_mut().leds[square.row as usize][square.col as usize] = color;
        }
    }

    fn clear_all_leds(&mut self) {
        self.inner.borrow_mut().leds = [[LedColor::Off; 8]; 8];
    }

    fn show_leds(&mut self) {
        self.inner.borrow_mut().frames_shown += 1;
    }

    fn confirm_square(&mut self, square: Square) {
        self.animate(Animation::Confirm(square));
    }

    fn blink_square(&mut self, square: Square, color: LedColor) {
        self.animate(Animation::Blink(square, color));
    }

    fn capture_animation(&mut self, square: Square) {
        self.animate(Animation::Capture(square));
    }

    fn promotion_animation(&mut self, col: u8) {
        self.animate(Animation::Promotion(col));
    }

    fn connecting_animation(&mut self) {
        self.animate(Animation::Connecting);
    }

    fn celebration_animation(&mut self) {
        self.animate(Animation::Celebration);
    }
}
