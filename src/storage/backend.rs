//! String-keyed, string-valued stores that hold saved progress.
//!
//! Three backends share one trait:
//! - [`MemoryStore`]: process-local map, used by tests and the `--no-save` play mode
//! - [`FileStore`]: one JSON object at `<data_dir>/progress.json`, fs2-locked, atomic write+rename
//! - [`SledStore`]: a sled tree at `<data_dir>/progress.sled`
//!
//! Every backend is cheap to clone and clones share the same underlying data.

use fs2::FileExt;
use log::warn;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

const PROGRESS_FILE: &str = "progress.json";
const PROGRESS_SLED_DIR: &str = "progress.sled";
const SLED_TREE: &str = "progress";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("store lock poisoned")]
    Poisoned,
}

pub trait KeyValueStore {
    /// `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk. Reads take a shared lock, writes an exclusive lock on a
/// sidecar `.lock` file for the whole read-modify-write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(PROGRESS_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    fn open_lock(&self) -> Result<File, StoreError> {
        Ok(OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(self.lock_path())?)
    }

    /// A corrupt file reads as empty so a bad write never locks the player out.
    fn read_map(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let mut f = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        let cleaned = s.trim_start_matches('\0');
        if cleaned.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str(cleaned) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!("progress store {:?} unreadable, starting fresh: {}", self.path, e);
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(map)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let base = self
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(PROGRESS_FILE);
        let mut counter = 0u32;
        let tmp_path = loop {
            let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(mut tmp) => {
                    tmp.write_all(content.as_bytes())?;
                    tmp.flush()?;
                    let _ = tmp.sync_all();
                    break candidate;
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    counter = counter.saturating_add(1);
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        };
        fs::rename(&tmp_path, &self.path)?;
        if let Ok(dir_file) = File::open(dir) {
            let _ = dir_file.sync_all();
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let lock = self.open_lock()?;
        lock.lock_shared()?;
        let map = self.read_map();
        let _ = lock.unlock();
        Ok(map?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let lock = self.open_lock()?;
        lock.lock_exclusive()?;
        let result = self.read_map().and_then(|mut map| {
            map.insert(key.to_string(), value.to_string());
            self.write_map(&map)
        });
        let _ = lock.unlock();
        result
    }
}

#[derive(Clone)]
pub struct SledStore {
    _db: sled::Db,
    tree: sled::Tree,
}

impl std::fmt::Debug for SledStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStore")
            .field("entries", &self.tree.len())
            .finish()
    }
}

impl SledStore {
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = data_dir.as_ref().join(PROGRESS_SLED_DIR);
        fs::create_dir_all(&path)?;
        let db = sled::open(&path)?;
        let tree = db.open_tree(SLED_TREE)?;
        Ok(Self { _db: db, tree })
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.tree.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(String::from_utf8(bytes.to_vec())?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.tree.insert(key.as_bytes(), value.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }
}

/// Backend chosen at runtime from `[storage] backend`.
#[derive(Debug, Clone)]
pub enum AnyStore {
    Memory(MemoryStore),
    File(FileStore),
    Sled(SledStore),
}

impl AnyStore {
    /// Open the named backend (`"memory"`, `"file"` or `"sled"`) under `data_dir`.
    pub fn open(backend: &str, data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        match backend {
            "memory" => Ok(AnyStore::Memory(MemoryStore::new())),
            "sled" => Ok(AnyStore::Sled(SledStore::open(data_dir)?)),
            _ => Ok(AnyStore::File(FileStore::open(data_dir)?)),
        }
    }
}

impl KeyValueStore for AnyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            AnyStore::Memory(s) => s.get(key),
            AnyStore::File(s) => s.get(key),
            AnyStore::Sled(s) => s.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            AnyStore::Memory(s) => s.set(key, value),
            AnyStore::File(s) => s.set(key, value),
            AnyStore::Sled(s) => s.set(key, value),
        }
    }
}
