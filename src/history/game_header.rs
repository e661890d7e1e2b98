//! Fixed 20-byte little-endian header at the start of every game log.
//!
//! ```text
//! off size field
//!   0    1 format version
//!   1    1 mode (0 moves, 1 bot)
//!   2    1 result (0 in progress, 1 white, 2 black, 3 draw)
//!   3    1 winner ('w', 'b', 'd', '?')
//!   4    1 player side in bot mode ('w', 'b', 0)
//!   5    1 bot depth
//!   6    4 timestamp, unix seconds (0 when the clock is not synced)
//!  10    2 move-stream entry count, snapshots included
//!  12    2 snapshot count
//!  14    4 byte offset of the newest snapshot-table entry
//!  18    2 reserved
//! ```

use crate::game_state::chess_types::Color;

pub const FORMAT_VERSION: u8 = 2;
pub const HEADER_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Moves,
    Bot,
}

impl GameMode {
    pub const fn code(self) -> u8 {
        match self {
            GameMode::Moves => 0,
            GameMode::Bot => 1,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(GameMode::Moves),
            1 => Some(GameMode::Bot),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    InProgress,
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    pub const fn code(self) -> u8 {
        match self {
            GameResult::InProgress => 0,
            GameResult::WhiteWins => 1,
            GameResult::BlackWins => 2,
            GameResult::Draw => 3,
        }
    }

    pub const fn from_code(code: u8) -> Self {
        match code {
            1 => GameResult::WhiteWins,
            2 => GameResult::BlackWins,
            3 => GameResult::Draw,
            _ => GameResult::InProgress,
        }
    }

    pub const fn winner_char(self) -> char {
        match self {
            GameResult::WhiteWins => 'w',
            GameResult::BlackWins => 'b',
            GameResult::Draw => 'd',
            GameResult::InProgress => '?',
        }
    }

    pub const fn win_for(color: Color) -> Self {
        match color {
            Color::White => GameResult::WhiteWins,
            Color::Black => GameResult::BlackWins,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameHeader {
    pub version: u8,
    pub mode: u8,
    pub result: u8,
    pub winner: u8,
    pub player_color: u8,
    pub bot_depth: u8,
    pub timestamp: u32,
    pub move_count: u16,
    pub snapshot_count: u16,
    pub last_snapshot_offset: u32,
}

impl Default for GameHeader {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            mode: GameMode::Moves.code(),
            result: GameResult::InProgress.code(),
            winner: b'?',
            player_color: 0,
            bot_depth: 0,
            timestamp: 0,
            move_count: 0,
            snapshot_count: 0,
            last_snapshot_offset: 0,
        }
    }
}

impl GameHeader {
    pub fn new(mode: GameMode, player_color: Option<Color>, bot_depth: u8, timestamp: u32) -> Self {
        Self {
            mode: mode.code(),
            player_color: player_color.map_or(0, |c| c.to_char() as u8),
            bot_depth,
            timestamp,
            ..Self::default()
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0] = self.version;
        out[1] = self.mode;
        out[2] = self.result;
        out[3] = self.winner;
        out[4] = self.player_color;
        out[5] = self.bot_depth;
        out[6..10].copy_from_slice(&self.timestamp.to_le_bytes());
        out[10..12].copy_from_slice(&self.move_count.to_le_bytes());
        out[12..14].copy_from_slice(&self.snapshot_count.to_le_bytes());
        out[14..18].copy_from_slice(&self.last_snapshot_offset.to_le_bytes());
        out
    }

    /// `None` when fewer than `HEADER_SIZE` bytes are available. The version
    /// byte is returned as stored; callers decide what is compatible.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes = bytes.get(..HEADER_SIZE)?;
        Some(Self {
            version: bytes[0],
            mode: bytes[1],
            result: bytes[2],
            winner: bytes[3],
            player_color: bytes[4],
            bot_depth: bytes[5],
            timestamp: u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]),
            move_count: u16::from_le_bytes([bytes[10], bytes[11]]),
            snapshot_count: u16::from_le_bytes([bytes[12], bytes[13]]),
            last_snapshot_offset: u32::from_le_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]),
        })
    }

    #[inline]
    pub fn is_compatible(&self) -> bool {
        self.version == FORMAT_VERSION
    }

    pub fn game_mode(&self) -> Option<GameMode> {
        GameMode::from_code(self.mode)
    }

    pub fn game_result(&self) -> GameResult {
        GameResult::from_code(self.result)
    }

    pub fn player(&self) -> Option<Color> {
        Color::from_char(self.player_color as char)
    }

    /// Byte length of header plus move stream.
    pub fn stream_end(&self) -> u64 {
        (HEADER_SIZE + usize::from(self.move_count) * crate::history::move_codec::ENTRY_SIZE) as u64
    }
}
