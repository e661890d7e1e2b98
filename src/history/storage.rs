//! File access behind a small trait so the history log can run on a flash
//! filesystem, a host directory, or a test double.
//!
//! Paths are relative, `/`-separated names such as `live.bin` or
//! `games/game_03.bin`.

use std::fs::{self, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub trait Storage {
    fn create_dir_all(&mut self, path: &str) -> io::Result<()>;
    fn exists(&self, path: &str) -> bool;
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;
    /// Creates or truncates `path` and writes `data`.
    fn write(&mut self, path: &str, data: &[u8]) -> io::Result<()>;
    /// Overwrites bytes starting at `offset`, extending the file if needed.
    fn write_at(&mut self, path: &str, offset: u64, data: &[u8]) -> io::Result<()>;
    /// Appends `data` and returns the offset it was written at.
    fn append(&mut self, path: &str, data: &[u8]) -> io::Result<u64>;
    fn file_len(&self, path: &str) -> io::Result<u64>;
    fn truncate(&mut self, path: &str, len: u64) -> io::Result<()>;
    fn rename(&mut self, from: &str, to: &str) -> io::Result<()>;
    fn remove(&mut self, path: &str) -> io::Result<()>;
    /// File names directly inside `dir`.
    fn list_dir(&self, dir: &str) -> io::Result<Vec<String>>;
    fn used_bytes(&self) -> io::Result<u64>;
    /// Capacity of the backing store; 0 when unknown.
    fn total_bytes(&self) -> u64;
}

/// Host-filesystem storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
    capacity_bytes: u64,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>, capacity_bytes: u64) -> Self {
        Self {
            root: root.into(),
            capacity_bytes,
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl Storage for FsStorage {
    fn create_dir_all(&mut self, path: &str) -> io::Result<()> {
        fs::create_dir_all(self.resolve(path))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(path))
    }

    fn write(&mut self, path: &str, data: &[u8]) -> io::Result<()> {
        fs::write(self.resolve(path), data)
    }

    fn write_at(&mut self, path: &str, offset: u64, data: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new().write(true).open(self.resolve(path))?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(data)
    }

    fn append(&mut self, path: &str, data: &[u8]) -> io::Result<u64> {
        let mut file = OpenOptions::new().create(true).append(true).open(self.resolve(path))?;
        let offset = file.metadata()?.len();
        file.write_all(data)?;
        Ok(offset)
    }

    fn file_len(&self, path: &str) -> io::Result<u64> {
        Ok(fs::metadata(self.resolve(path))?.len())
    }

    fn truncate(&mut self, path: &str, len: u64) -> io::Result<()> {
        OpenOptions::new().write(true).open(self.resolve(path))?.set_len(len)
    }

    fn rename(&mut self, from: &str, to: &str) -> io::Result<()> {
        fs::rename(self.resolve(from), self.resolve(to))
    }

    fn remove(&mut self, path: &str) -> io::Result<()> {
        fs::remove_file(self.resolve(path))
    }

    fn list_dir(&self, dir: &str) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.resolve(dir))? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    fn used_bytes(&self) -> io::Result<u64> {
        dir_size(&self.root)
    }

    fn total_bytes(&self) -> u64 {
        self.capacity_bytes
    }
}

fn dir_size(dir: &Path) -> io::Result<u64> {
    let mut total = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        total += if meta.is_dir() { dir_size(&entry.path())? } else { meta.len() };
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::{FsStorage, Storage};

    #[test]
    fn append_reports_offsets_and_write_at_patches() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut storage = FsStorage::new(dir.path(), 0);

        storage.write("log.bin", &[0, 0, 0]).expect("write");
        assert_eq!(storage.append("log.bin", &[7, 8]).expect("append"), 3);
        storage.write_at("log.bin", 1, &[9]).expect("write_at");
        assert_eq!(storage.read("log.bin").expect("read"), vec![0, 9, 0, 7, 8]);

        storage.truncate("log.bin", 2).expect("truncate");
        assert_eq!(storage.file_len("log.bin").expect("len"), 2);
    }

    #[test]
    fn lists_files_and_measures_usage() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut storage = FsStorage::new(dir.path(), 1000);
        storage.create_dir_all("games").expect("mkdir");
        storage.write("games/game_01.bin", &[1; 10]).expect("write");
        storage.write("live.bin", &[1; 5]).expect("write");

        assert_eq!(storage.list_dir("games").expect("list"), vec!["game_01.bin".to_owned()]);
        assert_eq!(storage.used_bytes().expect("usage"), 15);
        assert_eq!(storage.total_bytes(), 1000);
    }
}
