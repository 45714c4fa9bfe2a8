//! Log stores: where exported game records live.

use super::StoreError;
use crate::game::GameRecord;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, instrument};

/// Durable home for game records, keyed by game id.
pub trait LogStore: Send + Sync {
    /// Stores `record` under `id`, replacing any previous version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record cannot be written.
    fn save(&self, id: &str, record: &GameRecord) -> Result<(), StoreError>;

    /// Loads the record stored under `id`. Returns `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record exists but cannot be read.
    fn load(&self, id: &str) -> Result<Option<GameRecord>, StoreError>;

    /// Ids of all stored games, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be listed.
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

/// Checks that `id` is usable as a file stem.
#[track_caller]
fn validate_id(id: &str) -> Result<(), StoreError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::new(format!("Invalid game id '{}'", id)))
    }
}

/// One pretty-printed JSON file per game in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory cannot be created.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            StoreError::new(format!("Failed to create '{}': {}", dir.display(), e))
        })?;
        info!("Opened JSON log store");
        Ok(Self { dir })
    }

    /// Directory the store writes to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl LogStore for JsonFileStore {
    #[instrument(skip(self, record), fields(moves = record.moves.len()))]
    fn save(&self, id: &str, record: &GameRecord) -> Result<(), StoreError> {
        validate_id(id)?;
        let json = serde_json::to_string_pretty(record)?;

        // Write then rename so a crash never leaves a truncated log behind.
        let tmp = self.dir.join(format!(".{}.json.tmp", id));
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, self.path(id))?;

        debug!("Record saved");
        Ok(())
    }

    #[instrument(skip(self))]
    fn load(&self, id: &str) -> Result<Option<GameRecord>, StoreError> {
        validate_id(id)?;
        let path = self.path(id);
        if !path.exists() {
            debug!("No record stored");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let record: GameRecord = serde_json::from_str(&content)?;
        debug!(moves = record.moves.len(), "Record loaded");
        Ok(Some(record))
    }

    #[instrument(skip(self))]
    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if !stem.starts_with('.') => ids.push(stem.to_string()),
                _ => {}
            }
        }
        ids.sort();
        debug!(count = ids.len(), "Listed records");
        Ok(ids)
    }
}

/// In-process store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, GameRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogStore for MemoryStore {
    fn save(&self, id: &str, record: &GameRecord) -> Result<(), StoreError> {
        validate_id(id)?;
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), record.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<GameRecord>, StoreError> {
        validate_id(id)?;
        Ok(self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned())
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect())
    }
}
