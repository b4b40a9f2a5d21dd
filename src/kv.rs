//! Local key-value persistence.
//!
//! Values are opaque strings stored under string keys, the same contract a
//! browser's local storage offers. `FileKvStore` keeps them in one JSON
//! object on disk; `MemoryKvStore` keeps them in memory for tests and
//! throwaway sessions.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

/// String-keyed, string-valued persistent slots.
pub trait KvStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Erase every key.
    fn clear(&mut self) -> Result<()>;
}

/// Key-value store backed by a single JSON object file.
#[derive(Debug)]
pub struct FileKvStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileKvStore {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable or malformed one is treated as empty too.
    pub fn open(path: &Path) -> Self {
        let entries = Self::read_entries(path);
        debug!(path = %path.display(), keys = entries.len(), "opened key-value file");
        FileKvStore {
            path: path.to_path_buf(),
            entries,
        }
    }

    fn read_entries(path: &Path) -> BTreeMap<String, String> {
        if !path.exists() {
            return BTreeMap::new();
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "key-value file is malformed, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "key-value file is unreadable, starting empty");
                BTreeMap::new()
            }
        }
    }

    /// Write all entries using an atomic write (temp file + rename).
    fn flush(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(&self.entries)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Key-value store that lives only as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryKvStore {
    entries: BTreeMap<String, String>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut kv = FileKvStore::open(&path);
        assert_eq!(kv.get("TODO").unwrap(), None);
        kv.set("TODO", "[]").unwrap();
        kv.set("other", "x").unwrap();

        let reopened = FileKvStore::open(&path);
        assert_eq!(reopened.get("TODO").unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("x"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_store_clear_removes_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut kv = FileKvStore::open(&path);
        kv.set("TODO", "[]").unwrap();
        kv.clear().unwrap();
        assert!(!path.exists());
        assert_eq!(kv.get("TODO").unwrap(), None);

        // Clearing twice is fine.
        kv.clear().unwrap();
    }

    #[test]
    fn test_file_store_malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        let kv = FileKvStore::open(&path);
        assert_eq!(kv.get("TODO").unwrap(), None);
    }

    #[test]
    fn test_file_store_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut kv = FileKvStore::open(&path);
        kv.set("TODO", "[]").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_memory_store() {
        let mut kv = MemoryKvStore::new();
        kv.set("a", "1").unwrap();
        kv.set("a", "2").unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("2"));
        kv.clear().unwrap();
        assert_eq!(kv.get("a").unwrap(), None);
    }
}
