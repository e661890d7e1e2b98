//! 16-bit move encoding for the history stream.
//!
//! ```text
//! bits 15..10  from-square index (row*8 + col)
//! bits  9.. 4  to-square index
//! bits  3.. 0  promotion (0 none, 1 queen, 2 rook, 3 bishop, 4 knight)
//! ```
//!
//! `0xFFFF` marks a snapshot. It would need promotion code 15, so no real
//! move ever encodes to it.

use crate::game_state::chess_types::{PieceKind, Square};
use crate::utils::long_algebraic::to_long_algebraic;

pub const SNAPSHOT_SENTINEL: u16 = 0xFFFF;
pub const ENTRY_SIZE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl EncodedMove {
    pub const fn new(from: Square, to: Square, promotion: Option<PieceKind>) -> Self {
        Self { from, to, promotion }
    }

    pub fn encode(self) -> u16 {
        let from = u16::from(self.from.index() & 0x3F);
        let to = u16::from(self.to.index() & 0x3F);
        (from << 10) | (to << 4) | u16::from(promotion_code(self.promotion))
    }

    /// Unknown promotion codes decode as "no promotion".
    pub fn decode(raw: u16) -> Self {
        let from = ((raw >> 10) & 0x3F) as u8;
        let to = ((raw >> 4) & 0x3F) as u8;
        Self {
            from: Square::new(from / 8, from % 8),
            to: Square::new(to / 8, to % 8),
            promotion: promotion_from_code((raw & 0x0F) as u8),
        }
    }

    pub fn to_uci(self) -> String {
        to_long_algebraic(self.from, self.to, self.promotion).unwrap_or_default()
    }
}

/// One 2-byte slot of the move stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEntry {
    Move(EncodedMove),
    Snapshot,
}

impl LogEntry {
    pub fn from_raw(raw: u16) -> Self {
        if raw == SNAPSHOT_SENTINEL {
            LogEntry::Snapshot
        } else {
            LogEntry::Move(EncodedMove::decode(raw))
        }
    }

    pub fn to_raw(self) -> u16 {
        match self {
            LogEntry::Move(mv) => mv.encode(),
            LogEntry::Snapshot => SNAPSHOT_SENTINEL,
        }
    }

    pub fn to_le_bytes(self) -> [u8; ENTRY_SIZE] {
        self.to_raw().to_le_bytes()
    }
}

/// Decodes as many whole little-endian entries as `bytes` holds, up to `count`.
pub fn decode_entries(bytes: &[u8], count: usize) -> Vec<LogEntry> {
    bytes
        .chunks_exact(ENTRY_SIZE)
        .take(count)
        .map(|pair| LogEntry::from_raw(u16::from_le_bytes([pair[0], pair[1]])))
        .collect()
}

pub fn promotion_code(promotion: Option<PieceKind>) -> u8 {
    match promotion {
        Some(PieceKind::Queen) => 1,
        Some(PieceKind::Rook) => 2,
        Some(PieceKind::Bishop) => 3,
        Some(PieceKind::Knight) => 4,
        _ => 0,
    }
}

pub fn promotion_from_code(code: u8) -> Option<PieceKind> {
    match code {
        1 => Some(PieceKind::Queen),
        2 => Some(PieceKind::Rook),
        3 => Some(PieceKind::Bishop),
        4 => Some(PieceKind::Knight),
        _ => None,
    }
}
