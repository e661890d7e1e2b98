//! Square LED palette shared by both game modes.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedColor {
    /// Origin of a lifted or announced piece.
    Pickup,
    /// Quiet destination.
    Move,
    /// Capture destination, wrong placement, error.
    Attack,
    /// Completed move.
    Confirm,
    /// King in check, promotion.
    Check,
    BotThinking,
    EnPassant,
    /// Board setup and Moves-mode accents.
    Setup,
    Off,
}

impl LedColor {
    pub const fn rgb(self) -> Rgb {
        match self {
            LedColor::Pickup => Rgb::new(0, 255, 255),
            LedColor::Move => Rgb::new(255, 255, 255),
            LedColor::Attack => Rgb::new(255, 0, 0),
            LedColor::Confirm => Rgb::new(0, 255, 0),
            LedColor::Check => Rgb::new(255, 215, 0),
            LedColor::BotThinking => Rgb::new(0, 0, 255),
            LedColor::EnPassant => Rgb::new(128, 0, 255),
            LedColor::Setup => Rgb::new(255, 165, 0),
            LedColor::Off => Rgb::new(0, 0, 0),
        }
    }
}
