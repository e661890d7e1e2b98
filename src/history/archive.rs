//! Finished games: `[header][entries][snapshot table]` files under `games/`.

use serde::Serialize;

use crate::errors::HistoryError;
use crate::game_state::game_state::GameState;
use crate::history::game_header::{GameHeader, GameMode, GameResult, HEADER_SIZE};
use crate::history::move_codec::{decode_entries, EncodedMove, LogEntry};
use crate::move_generation::legal_move_apply::apply_move;

/// `game_NN.bin` -> `NN`; ids start at 1.
pub fn parse_game_file_name(name: &str) -> Option<u32> {
    let id: u32 = name.strip_prefix("game_")?.strip_suffix(".bin")?.parse().ok()?;
    (id > 0).then_some(id)
}

/// One row of the game list served to viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub id: u32,
    pub mode: u8,
    pub result: u8,
    pub winner: String,
    pub player_color: String,
    pub bot_depth: u8,
    pub move_count: u16,
    pub timestamp: u32,
}

impl GameSummary {
    pub fn from_header(id: u32, header: &GameHeader) -> Self {
        let player_color = match header.player_color {
            0 => "?".to_owned(),
            ch => (ch as char).to_string(),
        };
        Self {
            id,
            mode: header.mode,
            result: header.result,
            winner: (header.winner as char).to_string(),
            player_color,
            bot_depth: header.bot_depth,
            move_count: header.move_count,
            timestamp: header.timestamp,
        }
    }
}

#[derive(Serialize)]
struct GameList<'a> {
    games: &'a [GameSummary],
}

pub fn game_list_json(games: &[GameSummary]) -> Result<String, HistoryError> {
    Ok(serde_json::to_string(&GameList { games })?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedGame {
    pub id: u32,
    pub header: GameHeader,
    pub entries: Vec<LogEntry>,
    /// Snapshot FENs in the order their markers appear in `entries`.
    pub snapshots: Vec<String>,
}

impl ArchivedGame {
    pub fn from_bytes(id: u32, bytes: &[u8]) -> Result<Self, HistoryError> {
        let corrupted = |reason: &str| HistoryError::CorruptedOrIncompatibleSave(format!("game {id}: {reason}"));

        let header = GameHeader::from_bytes(bytes).ok_or_else(|| corrupted("file shorter than header"))?;
        if !header.is_compatible() {
            return Err(corrupted("unsupported format version"));
        }

        let count = usize::from(header.move_count);
        let stream_end = usize::try_from(header.stream_end()).map_err(|_| corrupted("stream too long"))?;
        let entries = decode_entries(bytes.get(HEADER_SIZE..).unwrap_or_default(), count);
        if entries.len() != count {
            return Err(corrupted("move stream truncated"));
        }

        let mut snapshots = Vec::with_capacity(usize::from(header.snapshot_count));
        let mut table = bytes.get(stream_end..).unwrap_or_default();
        while let Some((&len, rest)) = table.split_first() {
            let len = usize::from(len);
            let fen = rest.get(..len).ok_or_else(|| corrupted("snapshot table truncated"))?;
            snapshots.push(String::from_utf8_lossy(fen).into_owned());
            table = &rest[len..];
        }

        Ok(Self {
            id,
            header,
            entries,
            snapshots,
        })
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.header.game_mode()
    }

    pub fn result(&self) -> GameResult {
        self.header.game_result()
    }

    pub fn moves(&self) -> Vec<EncodedMove> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                LogEntry::Move(mv) => Some(*mv),
                LogEntry::Snapshot => None,
            })
            .collect()
    }

    pub fn move_count(&self) -> usize {
        self.moves().len()
    }

    /// Position after the first `up_to` moves (clamped). Each snapshot marker
    /// on the way resets the position to its stored FEN, which keeps replay
    /// correct across board corrections.
    pub fn replay(&self, up_to: usize) -> Result<GameState, HistoryError> {
        let mut state = GameState::new_game();
        let mut snapshot_index = 0;
        let mut applied = 0;

        for entry in &self.entries {
            match entry {
                LogEntry::Snapshot => {
                    let fen = self.snapshots.get(snapshot_index).ok_or_else(|| {
                        HistoryError::CorruptedOrIncompatibleSave(format!("game {}: missing snapshot {snapshot_index}", self.id))
                    })?;
                    state = GameState::from_fen(fen)
                        .map_err(|err| HistoryError::CorruptedOrIncompatibleSave(err.to_string()))?;
                    snapshot_index += 1;
                }
                LogEntry::Move(mv) => {
                    if applied == up_to {
                        break;
                    }
                    apply_move(&mut state, mv.from, mv.to, mv.promotion)
                        .map_err(|err| HistoryError::CorruptedOrIncompatibleSave(err.to_string()))?;
                    applied += 1;
                }
            }
        }

        Ok(state)
    }

    pub fn replay_full(&self) -> Result<GameState, HistoryError> {
        self.replay(usize::MAX)
    }
}
