//! Append-only move log with periodic FEN snapshots.
//!
//! A live game is two files: `live.bin` (header + 2-byte entries) and
//! `live_fen.bin` (length-prefixed FEN strings). Finishing a game appends the
//! snapshot table to the log and renames it into `games/`. A crash leaves
//! the live pair behind, which `replay_into_game` turns back into a position.
//!
//! Write failures never propagate: they are logged, the in-memory counts stay
//! as they were, and the last failure can be collected with
//! [`MoveHistory::take_write_failure`].

use log::{debug, info, warn};

use crate::config::StorageConfig;
use crate::errors::HistoryError;
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::game_state::game_state::GameState;
use crate::history::archive::{parse_game_file_name, ArchivedGame, GameSummary};
use crate::history::game_header::{GameHeader, GameMode, GameResult, FORMAT_VERSION, HEADER_SIZE};
use crate::history::move_codec::{decode_entries, EncodedMove, LogEntry};
use crate::history::storage::{FsStorage, Storage};
use crate::move_generation::legal_move_apply::apply_move;

pub const LIVE_MOVES_PATH: &str = "live.bin";
pub const LIVE_FEN_PATH: &str = "live_fen.bin";
pub const GAMES_DIR: &str = "games";

/// Unix time below which the clock is considered unsynchronized.
pub const MIN_SYNCED_TIMESTAMP: i64 = 1_771_008_768;

const MAX_SNAPSHOT_LEN: usize = 255;

pub type Clock = fn() -> i64;

fn system_clock() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn game_path(id: u32) -> String {
    format!("{GAMES_DIR}/game_{id:02}.bin")
}

/// Position rebuilt from a live log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumedGame {
    pub state: GameState,
    pub header: GameHeader,
    pub snapshot_fen: String,
    pub replayed_moves: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveGameInfo {
    pub mode: GameMode,
    pub player_color: Option<Color>,
    pub bot_depth: u8,
}

pub struct MoveHistory {
    storage: Box<dyn Storage>,
    header: GameHeader,
    recording: bool,
    max_games: usize,
    max_usage_fraction: f32,
    clock: Clock,
    write_failure: Option<String>,
}

impl MoveHistory {
    pub fn new(storage: Box<dyn Storage>, max_games: usize, max_usage_fraction: f32) -> Self {
        Self {
            storage,
            header: GameHeader::default(),
            recording: false,
            max_games,
            max_usage_fraction,
            clock: system_clock,
            write_failure: None,
        }
    }

    /// History on the host filesystem, laid out under `config.root_dir`.
    pub fn open(config: &StorageConfig) -> Self {
        let storage = FsStorage::new(&config.root_dir, config.capacity_bytes);
        Self::new(Box::new(storage), config.max_games, config.max_usage_fraction)
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn header(&self) -> &GameHeader {
        &self.header
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn take_write_failure(&mut self) -> Option<String> {
        self.write_failure.take()
    }

    pub fn begin(&mut self) -> Result<(), HistoryError> {
        if !self.storage.exists(GAMES_DIR) {
            self.storage.create_dir_all(GAMES_DIR)?;
        }
        Ok(())
    }

    fn timestamp(&self) -> u32 {
        let now = (self.clock)();
        if now > MIN_SYNCED_TIMESTAMP {
            u32::try_from(now).unwrap_or(0)
        } else {
            0
        }
    }

    fn record_failure(&mut self, action: &str, err: impl std::fmt::Display) {
        warn!("history: {action} failed: {err}");
        self.write_failure = Some(format!("{action}: {err}"));
    }

    pub fn start_game(&mut self, mode: GameMode, player_color: Option<Color>, bot_depth: u8) {
        self.discard_live_game();

        self.header = GameHeader::new(mode, player_color, bot_depth, self.timestamp());

        let header_bytes = self.header.to_bytes();
        if let Err(err) = self.storage.write(LIVE_MOVES_PATH, &header_bytes) {
            self.record_failure("creating live log", err);
        }
        if let Err(err) = self.storage.write(LIVE_FEN_PATH, &[]) {
            self.record_failure("creating snapshot table", err);
        }

        self.recording = true;
        info!("history: new live game started ({mode:?})");
    }

    pub fn add_move(&mut self, from: Square, to: Square, promotion: Option<PieceKind>) {
        if !self.recording {
            return;
        }
        let entry = LogEntry::Move(EncodedMove::new(from, to, promotion));
        if self.append_entry(entry) {
            self.rewrite_header();
        }
    }

    /// The FEN record goes in first and the marker second; the header only
    /// moves to the new snapshot once both are on disk, so a failure leaves
    /// the previous snapshot and its marker in charge.
    pub fn add_fen(&mut self, fen: &str) {
        if !self.recording {
            return;
        }

        let bytes = fen.as_bytes();
        let len = bytes.len().min(MAX_SNAPSHOT_LEN);
        let mut record = Vec::with_capacity(len + 1);
        record.push(len as u8);
        record.extend_from_slice(&bytes[..len]);

        let offset = match self.storage.append(LIVE_FEN_PATH, &record) {
            Ok(offset) => offset,
            Err(err) => {
                self.record_failure("appending snapshot", err);
                return;
            }
        };
        if !self.append_entry(LogEntry::Snapshot) {
            return;
        }

        self.header.last_snapshot_offset = u32::try_from(offset).unwrap_or(u32::MAX);
        self.header.snapshot_count = self.header.snapshot_count.saturating_add(1);
        self.rewrite_header();
    }

    /// Writes one entry at the end of the header-described stream, so a torn
    /// tail from an earlier crash is overwritten rather than kept.
    fn append_entry(&mut self, entry: LogEntry) -> bool {
        let offset = self.header.stream_end();
        match self.storage.write_at(LIVE_MOVES_PATH, offset, &entry.to_le_bytes()) {
            Ok(()) => {
                self.header.move_count = self.header.move_count.saturating_add(1);
                true
            }
            Err(err) => {
                self.record_failure("appending move entry", err);
                false
            }
        }
    }

    fn rewrite_header(&mut self) {
        let bytes = self.header.to_bytes();
        if let Err(err) = self.storage.write_at(LIVE_MOVES_PATH, 0, &bytes) {
            self.record_failure("rewriting header", err);
        }
    }

    pub fn finish_game(&mut self, result: GameResult) {
        if !self.recording {
            debug!("history: finish_game without a live game");
            return;
        }
        self.recording = false;

        self.header.result = result.code();
        self.header.winner = result.winner_char() as u8;
        let now = self.timestamp();
        if now > 0 {
            self.header.timestamp = now;
        }
        self.rewrite_header();

        let snapshots = match self.storage.read(LIVE_FEN_PATH) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.record_failure("reading snapshot table", err);
                Vec::new()
            }
        };
        let stream_end = self.header.stream_end();
        if let Err(err) = self.storage.truncate(LIVE_MOVES_PATH, stream_end) {
            self.record_failure("trimming live log", err);
        }
        if !snapshots.is_empty() {
            if let Err(err) = self.storage.append(LIVE_MOVES_PATH, &snapshots) {
                self.record_failure("appending snapshot table", err);
            }
        }

        let id = self.next_game_id();
        self.enforce_limits(1);

        let dest = game_path(id);
        if let Err(err) = self.storage.create_dir_all(GAMES_DIR) {
            self.record_failure("creating games directory", err);
        }
        if let Err(err) = self.storage.rename(LIVE_MOVES_PATH, &dest) {
            // The stamped live log stays behind as the only copy.
            self.record_failure("archiving live log", err);
            return;
        }
        self.discard_live_game();

        info!(
            "history: game saved as {dest} ({} entries, {} snapshots)",
            self.header.move_count, self.header.snapshot_count
        );
    }

    pub fn discard_live_game(&mut self) {
        self.recording = false;
        for path in [LIVE_MOVES_PATH, LIVE_FEN_PATH] {
            if self.storage.exists(path) {
                if let Err(err) = self.storage.remove(path) {
                    self.record_failure("removing live file", err);
                }
            }
        }
    }

    pub fn has_live_game(&self) -> bool {
        self.storage.exists(LIVE_MOVES_PATH)
    }

    pub fn live_game_info(&self) -> Option<LiveGameInfo> {
        let bytes = self.storage.read(LIVE_MOVES_PATH).ok()?;
        let header = GameHeader::from_bytes(&bytes)?;
        if !header.is_compatible() {
            return None;
        }
        Some(LiveGameInfo {
            mode: header.game_mode()?,
            player_color: header.player(),
            bot_depth: header.bot_depth,
        })
    }

    /// Rebuilds the live game: the newest snapshot plus every move recorded
    /// after it. Recording resumes on success.
    pub fn replay_into_game(&mut self) -> Result<ResumedGame, HistoryError> {
        let corrupted = |reason: &str| HistoryError::CorruptedOrIncompatibleSave(reason.to_owned());

        if !self.has_live_game() {
            return Err(HistoryError::NoLiveGame);
        }
        let log = self.storage.read(LIVE_MOVES_PATH)?;
        let header = GameHeader::from_bytes(&log).ok_or_else(|| corrupted("live log shorter than its header"))?;
        if !header.is_compatible() {
            return Err(HistoryError::CorruptedOrIncompatibleSave(format!(
                "format version {} (expected {})",
                header.version, FORMAT_VERSION
            )));
        }
        if header.snapshot_count == 0 {
            return Err(corrupted("no snapshot recorded"));
        }

        let count = usize::from(header.move_count);
        let entries = decode_entries(&log[HEADER_SIZE..], count);
        if entries.len() != count {
            return Err(corrupted("move stream shorter than header count"));
        }

        let table = self.storage.read(LIVE_FEN_PATH)?;
        let snapshot_fen = read_snapshot(&table, header.last_snapshot_offset as usize)
            .ok_or_else(|| corrupted("snapshot entry unreadable"))?;

        let last_marker = entries
            .iter()
            .rposition(|entry| *entry == LogEntry::Snapshot)
            .ok_or_else(|| corrupted("no snapshot marker in move stream"))?;

        let mut state = GameState::from_fen(&snapshot_fen).map_err(|err| corrupted(&err.to_string()))?;
        let mut replayed_moves = 0;
        for entry in &entries[last_marker + 1..] {
            if let LogEntry::Move(mv) = entry {
                apply_move(&mut state, mv.from, mv.to, mv.promotion).map_err(|err| corrupted(&err.to_string()))?;
                replayed_moves += 1;
            }
        }

        if log.len() as u64 > header.stream_end() {
            warn!("history: dropping {} torn bytes from live log", log.len() as u64 - header.stream_end());
            self.storage.truncate(LIVE_MOVES_PATH, header.stream_end())?;
        }

        self.header = header;
        self.recording = true;
        info!("history: resumed from snapshot {snapshot_fen} with {replayed_moves} move(s)");

        Ok(ResumedGame {
            state,
            header,
            snapshot_fen,
            replayed_moves,
        })
    }

    pub fn list_game_ids(&self) -> Vec<u32> {
        let names = match self.storage.list_dir(GAMES_DIR) {
            Ok(names) => names,
            Err(err) => {
                debug!("history: cannot list {GAMES_DIR}: {err}");
                return Vec::new();
            }
        };
        let mut ids: Vec<u32> = names.iter().filter_map(|name| parse_game_file_name(name)).collect();
        ids.sort_unstable();
        ids
    }

    pub fn next_game_id(&self) -> u32 {
        self.list_game_ids().last().map_or(1, |id| id + 1)
    }

    pub fn enforce_storage_limits(&mut self) {
        self.enforce_limits(0);
    }

    /// Deletes the oldest archives until the game count leaves `reserve`
    /// free slots, then until usage is back under the configured fraction.
    fn enforce_limits(&mut self, reserve: usize) {
        let mut ids = self.list_game_ids();
        let max_games = self.max_games.saturating_sub(reserve);

        while ids.len() > max_games {
            let oldest = ids.remove(0);
            self.remove_archive(oldest, "max game limit");
        }

        while !ids.is_empty() {
            let total = self.storage.total_bytes();
            let Ok(used) = self.storage.used_bytes() else {
                break;
            };
            if total == 0 || used as f64 / total as f64 <= f64::from(self.max_usage_fraction) {
                break;
            }
            let oldest = ids.remove(0);
            self.remove_archive(oldest, "storage limit");
        }
    }

    fn remove_archive(&mut self, id: u32, reason: &str) {
        match self.storage.remove(&game_path(id)) {
            Ok(()) => info!("history: deleted game {id} ({reason})"),
            Err(err) => self.record_failure("deleting old game", err),
        }
    }

    pub fn delete_game(&mut self, id: u32) -> Result<(), HistoryError> {
        let path = game_path(id);
        if !self.storage.exists(&path) {
            return Err(HistoryError::GameNotFound(id));
        }
        self.storage.remove(&path)?;
        Ok(())
    }

    pub fn load_game(&self, id: u32) -> Result<ArchivedGame, HistoryError> {
        let path = game_path(id);
        if !self.storage.exists(&path) {
            return Err(HistoryError::GameNotFound(id));
        }
        let bytes = self.storage.read(&path)?;
        ArchivedGame::from_bytes(id, &bytes)
    }

    /// Headers of every archived game; unreadable files are skipped.
    pub fn list_games(&self) -> Vec<GameSummary> {
        self.list_game_ids()
            .into_iter()
            .filter_map(|id| {
                let bytes = self.storage.read(&game_path(id)).ok()?;
                let header = GameHeader::from_bytes(&bytes)?;
                Some(GameSummary::from_header(id, &header))
            })
            .collect()
    }

    pub fn game_list_json(&self) -> Result<String, HistoryError> {
        crate::history::archive::game_list_json(&self.list_games())
    }
}

fn read_snapshot(table: &[u8], offset: usize) -> Option<String> {
    let len = usize::from(*table.get(offset)?);
    if len == 0 {
        return None;
    }
    let bytes = table.get(offset + 1..offset + 1 + len)?;
    String::from_utf8(bytes.to_vec()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::utils::algebraic::algebraic_to_square;
    use std::cell::Cell;
    use std::io;
    use std::rc::Rc;

    const SYNCED_NOW: i64 = 1_800_000_000;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("valid square")
    }

    fn history_in(dir: &std::path::Path, max_games: usize) -> MoveHistory {
        let storage = FsStorage::new(dir, 0);
        let mut history = MoveHistory::new(Box::new(storage), max_games, 0.8).with_clock(|| SYNCED_NOW);
        history.begin().expect("games dir");
        history
    }

    fn play(history: &mut MoveHistory, moves: &[(&str, &str)]) {
        for (from, to) in moves {
            history.add_move(sq(from), sq(to), None);
        }
    }

    #[test]
    fn start_game_writes_header_and_empty_table() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut history = history_in(dir.path(), 50);
        history.start_game(GameMode::Bot, Some(Color::White), 8);

        assert!(history.is_recording());
        let log = std::fs::read(dir.path().join(LIVE_MOVES_PATH)).expect("live log");
        assert_eq!(log.len(), HEADER_SIZE);
        let header = GameHeader::from_bytes(&log).expect("header");
        assert_eq!(header.version, FORMAT_VERSION);
        assert_eq!(header.timestamp, SYNCED_NOW as u32);
        assert_eq!(header.player(), Some(Color::White));
        assert!(dir.path().join(LIVE_FEN_PATH).exists());

        let info = history.live_game_info().expect("live info");
        assert_eq!(info.mode, GameMode::Bot);
        assert_eq!(info.bot_depth, 8);
    }

    #[test]
    fn unsynced_clock_stores_zero_timestamp() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut history = history_in(dir.path(), 50).with_clock(|| 1_000);
        history.start_game(GameMode::Moves, None, 0);
        assert_eq!(history.header().timestamp, 0);
    }

    #[test]
    fn resume_replays_moves_after_last_snapshot() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut history = history_in(dir.path(), 50);
        history.start_game(GameMode::Moves, None, 0);
        history.add_fen(STARTING_POSITION_FEN);
        play(&mut history, &[("e2", "e4"), ("e7", "e5")]);

        let mut expected = GameState::new_game();
        for (from, to) in [("e2", "e4"), ("e7", "e5")] {
            apply_move(&mut expected, sq(from), sq(to), None).expect("move applies");
        }
        history.add_fen(&expected.to_fen());
        play(&mut history, &[("g1", "f3"), ("b8", "c6")]);
        for (from, to) in [("g1", "f3"), ("b8", "c6")] {
            apply_move(&mut expected, sq(from), sq(to), None).expect("move applies");
        }

        // Simulated restart: a fresh log object over the same directory.
        let mut restarted = history_in(dir.path(), 50);
        let resumed = restarted.replay_into_game().expect("resume");
        assert_eq!(resumed.replayed_moves, 2);
        assert_eq!(resumed.header.move_count, 6);
        assert_eq!(resumed.header.snapshot_count, 2);
        assert_eq!(resumed.state.board, expected.board);
        assert_eq!(resumed.state.side_to_move, Color::White);
        assert!(restarted.is_recording());
    }

    #[test]
    fn resume_drops_torn_tail() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut history = history_in(dir.path(), 50);
        history.start_game(GameMode::Moves, None, 0);
        history.add_fen(STARTING_POSITION_FEN);
        play(&mut history, &[("e2", "e4")]);

        let live = dir.path().join(LIVE_MOVES_PATH);
        let mut bytes = std::fs::read(&live).expect("read");
        bytes.push(0xAB);
        std::fs::write(&live, &bytes).expect("write");

        let mut restarted = history_in(dir.path(), 50);
        let resumed = restarted.replay_into_game().expect("resume");
        assert_eq!(resumed.replayed_moves, 1);
        assert_eq!(std::fs::metadata(&live).expect("meta").len(), (HEADER_SIZE + 4) as u64);
    }

    #[test]
    fn resume_without_snapshot_or_with_wrong_version_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut history = history_in(dir.path(), 50);
        assert!(matches!(history.replay_into_game(), Err(HistoryError::NoLiveGame)));

        history.start_game(GameMode::Moves, None, 0);
        play(&mut history, &[("e2", "e4")]);
        let mut restarted = history_in(dir.path(), 50);
        assert!(matches!(
            restarted.replay_into_game(),
            Err(HistoryError::CorruptedOrIncompatibleSave(_))
        ));

        history.add_fen(STARTING_POSITION_FEN);
        let live = dir.path().join(LIVE_MOVES_PATH);
        let mut bytes = std::fs::read(&live).expect("read");
        bytes[0] = FORMAT_VERSION + 1;
        std::fs::write(&live, &bytes).expect("write");
        let mut restarted = history_in(dir.path(), 50);
        assert!(matches!(
            restarted.replay_into_game(),
            Err(HistoryError::CorruptedOrIncompatibleSave(_))
        ));
    }

    #[test]
    fn finish_game_archives_with_ascending_ids() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut history = history_in(dir.path(), 50);

        for _ in 0..2 {
            history.start_game(GameMode::Moves, None, 0);
            history.add_fen(STARTING_POSITION_FEN);
            play(&mut history, &[("e2", "e4")]);
            history.finish_game(GameResult::Draw);
        }

        assert!(!history.has_live_game());
        assert!(!dir.path().join(LIVE_FEN_PATH).exists());
        assert_eq!(history.list_game_ids(), vec![1, 2]);

        let summaries = history.list_games();
        assert_eq!(summaries[1].winner, "d");
        assert_eq!(summaries[1].move_count, 2);

        let archived = history.load_game(2).expect("load");
        assert_eq!(archived.snapshots, vec![STARTING_POSITION_FEN.to_owned()]);
    }

    #[test]
    fn quota_removes_lowest_ids_and_keeps_ids_ascending() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut history = history_in(dir.path(), 3);

        for _ in 0..5 {
            history.start_game(GameMode::Moves, None, 0);
            history.add_fen(STARTING_POSITION_FEN);
            history.finish_game(GameResult::WhiteWins);
        }

        assert_eq!(history.list_game_ids(), vec![3, 4, 5]);
    }

    #[test]
    fn enforce_storage_limits_trims_by_count() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut history = history_in(dir.path(), 50);
        for id in [2, 7, 9] {
            std::fs::write(dir.path().join(game_path(id)), [0u8; 20]).expect("write");
        }
        history.max_games = 1;
        history.enforce_storage_limits();
        assert_eq!(history.list_game_ids(), vec![9]);
    }

    #[test]
    fn delete_game_reports_missing_ids() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut history = history_in(dir.path(), 50);
        assert!(matches!(history.delete_game(4), Err(HistoryError::GameNotFound(4))));
    }

    /// Storage whose writes all fail.
    struct ReadOnlyStorage(FsStorage);

    impl Storage for ReadOnlyStorage {
        fn create_dir_all(&mut self, path: &str) -> io::Result<()> {
            self.0.create_dir_all(path)
        }
        fn exists(&self, path: &str) -> bool {
            self.0.exists(path)
        }
        fn read(&self, path: &str) -> io::Result<Vec<u8>> {
            self.0.read(path)
        }
        fn write(&mut self, _: &str, _: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
        fn write_at(&mut self, _: &str, _: u64, _: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
        fn append(&mut self, _: &str, _: &[u8]) -> io::Result<u64> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
        fn file_len(&self, path: &str) -> io::Result<u64> {
            self.0.file_len(path)
        }
        fn truncate(&mut self, _: &str, _: u64) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
        fn rename(&mut self, _: &str, _: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
        fn remove(&mut self, _: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
        fn list_dir(&self, dir: &str) -> io::Result<Vec<String>> {
            self.0.list_dir(dir)
        }
        fn used_bytes(&self) -> io::Result<u64> {
            self.0.used_bytes()
        }
        fn total_bytes(&self) -> u64 {
            0
        }
    }

    #[test]
    fn write_failures_are_absorbed_and_counts_not_bumped() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = ReadOnlyStorage(FsStorage::new(dir.path(), 0));
        let mut history = MoveHistory::new(Box::new(storage), 50, 0.8);

        history.start_game(GameMode::Moves, None, 0);
        assert!(history.take_write_failure().is_some());

        history.add_move(sq("e2"), sq("e4"), None);
        history.add_fen(STARTING_POSITION_FEN);
        assert_eq!(history.header().move_count, 0);
        assert_eq!(history.header().snapshot_count, 0);
        assert!(history.take_write_failure().is_some());

        history.finish_game(GameResult::Draw);
        assert!(!history.is_recording());
    }

    /// Failures that `FlakyStorage` injects, shared with the test body.
    #[derive(Default)]
    struct Faults {
        appends: Cell<u32>,
        write_ats: Cell<u32>,
        renames: Cell<u32>,
    }

    fn trip(counter: &Cell<u32>) -> io::Result<()> {
        match counter.get() {
            0 => Ok(()),
            n => {
                counter.set(n - 1);
                Err(io::Error::new(io::ErrorKind::Other, "injected failure"))
            }
        }
    }

    /// Host storage that fails the next N calls of selected operations.
    struct FlakyStorage {
        inner: FsStorage,
        faults: Rc<Faults>,
    }

    impl Storage for FlakyStorage {
        fn create_dir_all(&mut self, path: &str) -> io::Result<()> {
            self.inner.create_dir_all(path)
        }
        fn exists(&self, path: &str) -> bool {
            self.inner.exists(path)
        }
        fn read(&self, path: &str) -> io::Result<Vec<u8>> {
            self.inner.read(path)
        }
        fn write(&mut self, path: &str, data: &[u8]) -> io::Result<()> {
            self.inner.write(path, data)
        }
        fn write_at(&mut self, path: &str, offset: u64, data: &[u8]) -> io::Result<()> {
            trip(&self.faults.write_ats)?;
            self.inner.write_at(path, offset, data)
        }
        fn append(&mut self, path: &str, data: &[u8]) -> io::Result<u64> {
            trip(&self.faults.appends)?;
            self.inner.append(path, data)
        }
        fn file_len(&self, path: &str) -> io::Result<u64> {
            self.inner.file_len(path)
        }
        fn truncate(&mut self, path: &str, len: u64) -> io::Result<()> {
            self.inner.truncate(path, len)
        }
        fn rename(&mut self, from: &str, to: &str) -> io::Result<()> {
            trip(&self.faults.renames)?;
            self.inner.rename(from, to)
        }
        fn remove(&mut self, path: &str) -> io::Result<()> {
            self.inner.remove(path)
        }
        fn list_dir(&self, dir: &str) -> io::Result<Vec<String>> {
            self.inner.list_dir(dir)
        }
        fn used_bytes(&self) -> io::Result<u64> {
            self.inner.used_bytes()
        }
        fn total_bytes(&self) -> u64 {
            self.inner.total_bytes()
        }
    }

    fn flaky_history_in(dir: &std::path::Path) -> (MoveHistory, Rc<Faults>) {
        let faults = Rc::new(Faults::default());
        let storage = FlakyStorage {
            inner: FsStorage::new(dir, 0),
            faults: Rc::clone(&faults),
        };
        let mut history = MoveHistory::new(Box::new(storage), 50, 0.8).with_clock(|| SYNCED_NOW);
        history.begin().expect("games dir");
        (history, faults)
    }

    fn position_after(moves: &[(&str, &str)]) -> GameState {
        let mut state = GameState::new_game();
        for (from, to) in moves {
            apply_move(&mut state, sq(from), sq(to), None).expect("move applies");
        }
        state
    }

    const OPEN_GAME: [(&str, &str); 3] = [("e2", "e4"), ("e7", "e5"), ("g1", "f3")];

    #[test]
    fn failed_snapshot_write_keeps_previous_snapshot_authoritative() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (mut history, faults) = flaky_history_in(dir.path());
        history.start_game(GameMode::Moves, None, 0);
        history.add_fen(STARTING_POSITION_FEN);
        play(&mut history, &OPEN_GAME[..2]);

        faults.appends.set(1);
        history.add_fen(&position_after(&OPEN_GAME[..2]).to_fen());
        assert!(history.take_write_failure().is_some());
        assert_eq!(history.header().snapshot_count, 1);
        play(&mut history, &OPEN_GAME[2..]);

        let mut restarted = history_in(dir.path(), 50);
        let resumed = restarted.replay_into_game().expect("resume");
        assert_eq!(resumed.snapshot_fen, STARTING_POSITION_FEN);
        assert_eq!(resumed.replayed_moves, 3);
        assert_eq!(resumed.state.to_fen(), position_after(&OPEN_GAME).to_fen());
        assert_eq!(
            resumed.state.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 0 1"
        );
    }

    #[test]
    fn failed_snapshot_marker_keeps_previous_snapshot_authoritative() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (mut history, faults) = flaky_history_in(dir.path());
        history.start_game(GameMode::Moves, None, 0);
        history.add_fen(STARTING_POSITION_FEN);
        play(&mut history, &OPEN_GAME[..2]);

        faults.write_ats.set(1);
        history.add_fen(&position_after(&OPEN_GAME[..2]).to_fen());
        assert!(history.take_write_failure().is_some());
        assert_eq!(history.header().snapshot_count, 1);
        assert_eq!(history.header().last_snapshot_offset, 0);
        play(&mut history, &OPEN_GAME[2..]);

        let mut restarted = history_in(dir.path(), 50);
        let resumed = restarted.replay_into_game().expect("resume");
        assert_eq!(resumed.snapshot_fen, STARTING_POSITION_FEN);
        assert_eq!(resumed.replayed_moves, 3);
        assert_eq!(resumed.state.to_fen(), position_after(&OPEN_GAME).to_fen());
    }

    #[test]
    fn failed_archive_rename_keeps_finished_live_log() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (mut history, faults) = flaky_history_in(dir.path());
        history.start_game(GameMode::Moves, None, 0);
        history.add_fen(STARTING_POSITION_FEN);
        play(&mut history, &OPEN_GAME[..1]);

        faults.renames.set(1);
        history.finish_game(GameResult::WhiteWins);

        assert!(history.take_write_failure().is_some());
        assert!(!history.is_recording());
        assert!(history.has_live_game());
        assert!(history.list_game_ids().is_empty());
        let log = std::fs::read(dir.path().join(LIVE_MOVES_PATH)).expect("live log");
        let header = GameHeader::from_bytes(&log).expect("header");
        assert_eq!(header.game_result(), GameResult::WhiteWins);
        assert_eq!(header.move_count, 2);
    }

    #[test]
    fn usage_pass_deletes_oldest_archives() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut history = MoveHistory::new(Box::new(FsStorage::new(dir.path(), 100)), 50, 0.5);
        history.begin().expect("games dir");
        for id in 1..=4 {
            std::fs::write(dir.path().join(game_path(id)), [0u8; 20]).expect("write");
        }

        history.enforce_storage_limits();
        assert_eq!(history.list_game_ids(), vec![3, 4]);
    }

    #[test]
    fn finish_game_frees_space_by_usage() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = FsStorage::new(dir.path(), 1000);
        let mut history = MoveHistory::new(Box::new(storage), 50, 0.5).with_clock(|| SYNCED_NOW);
        history.begin().expect("games dir");
        for id in 1..=4 {
            std::fs::write(dir.path().join(game_path(id)), [0u8; 100]).expect("write");
        }

        // 400 archived bytes plus about 136 bytes of live log and table.
        history.start_game(GameMode::Moves, None, 0);
        history.add_fen(STARTING_POSITION_FEN);
        history.finish_game(GameResult::Draw);

        assert_eq!(history.list_game_ids(), vec![2, 3, 4, 5]);
    }
}
