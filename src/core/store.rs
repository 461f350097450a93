//! # Keyword Store
//!
//! Persists the recent-keyword list in a string key-value preference file.
//!
//! The preference file is a flat JSON object (`key → string`), by default
//! `~/.ibooku/preferences.json`. The keyword list is itself serialized to a
//! JSON array string under `search_keyword_list`. Writes use atomic rename
//! (write `.tmp`, then `rename()`).

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, warn};

/// Preference key holding the serialized recent-keyword list.
pub const SEARCH_KEYWORD_LIST_KEY: &str = "search_keyword_list";

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    /// The stored value exists but does not parse as a keyword list.
    Corrupt(serde_json::Error),
    /// A previous holder of the lock panicked mid-write.
    Poisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "store I/O error: {e}"),
            StoreError::Corrupt(e) => write!(f, "stored keyword list is corrupt: {e}"),
            StoreError::Poisoned => write!(f, "store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {}

pub trait KeywordStore: Send + Sync {
    /// Loads the persisted list. An absent value is an empty list.
    fn load(&self) -> Result<Vec<String>, StoreError>;

    /// Replaces the persisted list.
    fn save(&self, keywords: &[String]) -> Result<(), StoreError>;

    /// Loads the list, degrading any failure to an empty list.
    fn load_or_empty(&self) -> Vec<String> {
        match self.load() {
            Ok(list) => list,
            Err(e) => {
                warn!("Falling back to empty keyword list: {}", e);
                Vec::new()
            }
        }
    }
}

fn decode_keywords(raw: Option<&str>) -> Result<Vec<String>, StoreError> {
    match raw {
        Some(s) if !s.trim().is_empty() => serde_json::from_str(s).map_err(StoreError::Corrupt),
        _ => Ok(Vec::new()),
    }
}

fn encode_keywords(keywords: &[String]) -> Result<String, StoreError> {
    serde_json::to_string(keywords)
        .map_err(|e| StoreError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

// ============================================================================
// Preference file
// ============================================================================

/// A file-backed string key-value store.
pub struct PreferenceFile {
    path: PathBuf,
}

impl PreferenceFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path).map_err(StoreError::Io)?;
        if json.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&json).map_err(StoreError::Corrupt)
    }

    pub fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    /// Writes one key, keeping every other key in the file.
    ///
    /// A corrupt file is replaced rather than blocking all future writes.
    pub fn put_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut all = match self.read_all() {
            Ok(all) => all,
            Err(StoreError::Corrupt(e)) => {
                warn!("Replacing corrupt preference file {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        all.insert(key.to_string(), value.to_string());
        atomic_write_json(&self.path, &all).map_err(StoreError::Io)?;
        debug!("Preference {} written to {}", key, self.path.display());
        Ok(())
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: serde::Serialize>(path: &Path, data: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Keyword store backed by a `PreferenceFile`.
pub struct PreferenceKeywordStore {
    prefs: PreferenceFile,
}

impl PreferenceKeywordStore {
    pub fn new(prefs: PreferenceFile) -> Self {
        Self { prefs }
    }
}

impl KeywordStore for PreferenceKeywordStore {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        let raw = self.prefs.get_string(SEARCH_KEYWORD_LIST_KEY)?;
        decode_keywords(raw.as_deref())
    }

    fn save(&self, keywords: &[String]) -> Result<(), StoreError> {
        let encoded = encode_keywords(keywords)?;
        self.prefs.put_string(SEARCH_KEYWORD_LIST_KEY, &encoded)
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Keeps the serialized list in memory. Used when persistence is disabled
/// and in tests.
#[derive(Default)]
pub struct MemoryKeywordStore {
    raw: Mutex<Option<String>>,
}

impl MemoryKeywordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a raw serialized value, as another writer would.
    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: Mutex::new(Some(raw.to_string())),
        }
    }

    pub fn with_keywords(keywords: &[&str]) -> Self {
        let list: Vec<String> = keywords.iter().map(|k| k.to_string()).collect();
        Self {
            raw: Mutex::new(serde_json::to_string(&list).ok()),
        }
    }
}

impl KeywordStore for MemoryKeywordStore {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        let raw = self.raw.lock().map_err(|_| StoreError::Poisoned)?;
        decode_keywords(raw.as_deref())
    }

    fn save(&self, keywords: &[String]) -> Result<(), StoreError> {
        let encoded = encode_keywords(keywords)?;
        *self.raw.lock().map_err(|_| StoreError::Poisoned)? = Some(encoded);
        Ok(())
    }
}
