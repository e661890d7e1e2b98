//! Interface to the physical board: presence sensors, square LEDs, and the
//! canned feedback animations.
//!
//! Sensor reads are latched: `read_sensors` samples every square once, and
//! `sensor_state`/`sensor_prev` compare the latest sample against the one
//! committed by the previous `update_sensor_prev`.

use crate::game_state::chess_types::Square;
use crate::hardware::led_colors::LedColor;

pub trait BoardDriver {
    fn read_sensors(&mut self);
    fn sensor_state(&self, square: Square) -> bool;
    fn sensor_prev(&self, square: Square) -> bool;
    fn update_sensor_prev(&mut self);

    fn set_square_led(&mut self, square: Square, color: LedColor);
    fn clear_all_leds(&mut self);
    fn show_leds(&mut self);

    fn confirm_square(&mut self, square: Square);
    fn blink_square(&mut self, square: Square, color: LedColor);
    fn capture_animation(&mut self, square: Square);
    fn promotion_animation(&mut self, col: u8);
    fn connecting_animation(&mut self);
    fn celebration_animation(&mut self);

    /// Current sample as an occupancy grid.
    fn occupancy(&self) -> [[bool; 8]; 8] {
        let mut grid = [[false; 8]; 8];
        for (row, cells) in grid.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = self.sensor_state(Square::new(row as u8, col as u8));
            }
        }
        grid
    }
}
