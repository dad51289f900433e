//! Persistent key-value storage
//!
//! Engines persist one JSON string record per key:
//! - `slotMachine`: coin balance, bet, last daily claim
//! - `cardCollection`: owned cards and packs opened
//!
//! Two implementations ship with the crate. `MemoryStore` lives for the
//! process and can be given a byte quota to exercise write failures.
//! `JsonFileStore` keeps every record in a single JSON object on disk.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::error::{FaError, FaResult};

/// Store key for the slot machine record
pub const SLOT_STORE_KEY: &str = "slotMachine";

/// Store key for the card collection record
pub const CARD_STORE_KEY: &str = "cardCollection";

/// String-keyed store of JSON text records
///
/// Implementations synchronise internally so a single store can be shared
/// between both engines behind an `Arc`.
pub trait KeyValueStore: Send + Sync {
    /// Read a record, `None` when absent
    fn get(&self, key: &str) -> FaResult<Option<String>>;

    /// Write a record, replacing any previous value
    fn set(&self, key: &str, value: &str) -> FaResult<()>;

    /// Remove a record; removing an absent key is not an error
    fn delete(&self, key: &str) -> FaResult<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// MEMORY STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, String>>,
    /// Maximum total bytes of keys + values, `None` for unbounded
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes once keys + values would exceed `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Total bytes currently held
    pub fn used_bytes(&self) -> usize {
        self.records
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> FaResult<Option<String>> {
        Ok(self.records.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> FaResult<()> {
        let mut records = self.records.write();

        if let Some(quota) = self.quota_bytes {
            let others: usize = records
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(FaError::PersistenceWriteFailure(format!(
                    "quota exceeded writing '{}': {} of {} bytes",
                    key, needed, quota
                )));
            }
        }

        records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> FaResult<()> {
        self.records.write().remove(key);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON FILE STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// Store backed by one JSON object file
///
/// The whole object is rewritten on every `set`/`delete`. A missing file
/// opens as an empty store; parent directories are created on first save.
/// A file that does not parse as a JSON object is moved aside to
/// `<name>.bak` and the store starts empty with a recovery notice.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: RwLock<Map<String, Value>>,
    recovery: Option<String>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`
    ///
    /// Only a read error on an existing file is returned as `Err`.
    pub fn open<P: AsRef<Path>>(path: P) -> FaResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut recovery = None;

        let records = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match Self::parse(&path, &content) {
                Ok(map) => map,
                Err(e) => {
                    log::warn!("Unreadable save file {}: {}", path.display(), e);
                    recovery = Some(Self::set_aside(&path, &e));
                    Map::new()
                }
            }
        } else {
            Map::new()
        };

        log::debug!(
            "Opened store {} ({} records)",
            path.display(),
            records.len()
        );

        Ok(Self {
            path,
            records: RwLock::new(records),
            recovery,
        })
    }

    fn parse(path: &Path, content: &str) -> FaResult<Map<String, Value>> {
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(content)? {
            Value::Object(map) => Ok(map),
            _ => Err(FaError::InvalidPersistedState(format!(
                "{} is not a JSON object",
                path.display()
            ))),
        }
    }

    /// Rename an unreadable file to `<name>.bak`, returning the notice text
    fn set_aside(path: &Path, error: &FaError) -> String {
        let mut backup = path.as_os_str().to_owned();
        backup.push(".bak");
        let backup = PathBuf::from(backup);

        match fs::rename(path, &backup) {
            Ok(()) => format!(
                "Saved progress could not be read ({}); starting fresh, old file kept at {}",
                error,
                backup.display()
            ),
            Err(rename_err) => {
                log::warn!("Could not move {} aside: {}", path.display(), rename_err);
                format!("Saved progress could not be read ({}); starting fresh", error)
            }
        }
    }

    /// Notice set when the file on disk was unreadable at open
    pub fn recovery_notice(&self) -> Option<&str> {
        self.recovery.as_deref()
    }

    /// Open the store at the platform default location
    pub fn open_default() -> FaResult<Self> {
        Self::open(Self::default_path())
    }

    /// Default store file path
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("folio-arcade"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("arcade.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, records: &Map<String, Value>) -> FaResult<()> {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let json = serde_json::to_string_pretty(records)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            fs::write(&self.path, json)
        };

        write().map_err(|e| {
            FaError::PersistenceWriteFailure(format!("{}: {}", self.path.display(), e))
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> FaResult<Option<String>> {
        Ok(self.records.read().get(key).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }))
    }

    fn set(&self, key: &str, value: &str) -> FaResult<()> {
        let mut records = self.records.write();
        let previous = records.insert(key.to_string(), Value::String(value.to_string()));

        if let Err(e) = self.flush(&records) {
            match previous {
                Some(old) => records.insert(key.to_string(), old),
                None => records.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> FaResult<()> {
        let mut records = self.records.write();
        if records.remove(key).is_some() {
            self.flush(&records)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "{\"x\":1}").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("{\"x\":1}"));

        store.delete("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        store.delete("a").unwrap();
    }

    #[test]
    fn test_memory_store_quota() {
        let store = MemoryStore::with_quota(10);
        store.set("k", "12345").unwrap();

        let err = store.set("k2", "123456789").unwrap_err();
        assert!(matches!(err, FaError::PersistenceWriteFailure(_)));
        assert_eq!(store.get("k2").unwrap(), None);

        // Overwriting an existing key only counts the new value
        store.set("k", "123456789").unwrap();
        assert_eq!(store.used_bytes(), 10);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("arcade.json");

        {
            let store = JsonFileStore::open(&path).unwrap();
            store.set(SLOT_STORE_KEY, "{\"coins\":120}").unwrap();
            store.set(CARD_STORE_KEY, "{\"packsOpened\":2}").unwrap();
        }

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get(SLOT_STORE_KEY).unwrap().as_deref(),
            Some("{\"coins\":120}")
        );

        reopened.delete(CARD_STORE_KEY).unwrap();
        let again = JsonFileStore::open(&path).unwrap();
        assert_eq!(again.get(CARD_STORE_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_sets_aside_non_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "[1,2,3]").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.recovery_notice().is_some());
        assert_eq!(store.get(SLOT_STORE_KEY).unwrap(), None);
        assert_eq!(
            fs::read_to_string(dir.path().join("bad.json.bak")).unwrap(),
            "[1,2,3]"
        );
    }

    #[test]
    fn test_file_store_recovers_truncated_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("arcade.json");
        fs::write(&path, "{\"slotMachine\": \"{\\\"coins\\\":1").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(
            store
                .recovery_notice()
                .unwrap()
                .starts_with("Saved progress could not be read")
        );
        assert_eq!(store.get(SLOT_STORE_KEY).unwrap(), None);

        store.set(SLOT_STORE_KEY, "{\"coins\":100}").unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert!(reopened.recovery_notice().is_none());
        assert_eq!(
            reopened.get(SLOT_STORE_KEY).unwrap().as_deref(),
            Some("{\"coins\":100}")
        );
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("none.json")).unwrap();
        assert_eq!(store.get(SLOT_STORE_KEY).unwrap(), None);
    }
}
