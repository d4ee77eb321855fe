//! Named durable string slots.
//!
//! A slot backend only moves raw text around; encoding the collection is the
//! store's job.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;

#[cfg(test)]
pub use memory::MemorySlot;

pub trait Slot {
    /// Read the text stored under `key`, `None` if nothing is stored.
    /// Stored bytes that are not UTF-8 fail with [`ErrorKind::InvalidData`].
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    /// Overwrite `key` with `data`.
    fn write(&mut self, key: &str, data: &str) -> io::Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> io::Result<()>;

    /// Move whatever is stored under `from` to `to` unchanged, replacing `to`.
    fn rename(&mut self, from: &str, to: &str) -> io::Result<()>;

    /// Human-readable location of `key`, for messages.
    fn locate(&self, key: &str) -> String;
}

/// One `<key>.json` file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default data directory (~/.local/share/webcards on Linux)
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("webcards"))
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Slot for FileSlot {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        let bytes = match fs::read(self.path_for(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))
    }

    fn write(&mut self, key: &str, data: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Write next to the target and rename over it so a crash mid-write
        // leaves the previous contents in place
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &path)
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn rename(&mut self, from: &str, to: &str) -> io::Result<()> {
        fs::rename(self.path_for(from), self.path_for(to))
    }

    fn locate(&self, key: &str) -> String {
        self.path_for(key).display().to_string()
    }
}
