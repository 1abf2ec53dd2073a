//! Persistence of "tutorial completed" flags

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::TourError;

const COMPLETED: &str = "true";

/// Storage key for a tour's completion flag
pub fn completion_key(tour_id: &str) -> String {
    format!("tutorial:{tour_id}:completed")
}

/// Key-value store shared by every engine in the process
///
/// Writes are plain overwrites; the last write wins.
pub trait CompletionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, TourError>;
    fn set(&self, key: &str, value: &str) -> Result<(), TourError>;
    fn remove(&self, key: &str) -> Result<(), TourError>;

    /// Whether the tour was completed
    fn is_completed(&self, tour_id: &str) -> Result<bool, TourError> {
        Ok(self.get(&completion_key(tour_id))?.as_deref() == Some(COMPLETED))
    }

    /// Record a completed tour
    fn mark_completed(&self, tour_id: &str) -> Result<(), TourError> {
        self.set(&completion_key(tour_id), COMPLETED)
    }

    /// Forget a completed tour
    fn reset_completion(&self, tour_id: &str) -> Result<(), TourError> {
        self.remove(&completion_key(tour_id))
    }
}

/// In-memory store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CompletionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, TourError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TourError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), TourError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object file
///
/// The file is read once on open and rewritten in full on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TourError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(TourError::Storage(format!(
                    "reading {}: {err}",
                    path.display()
                )))
            }
        };
        debug!(path = %path.display(), entries = entries.len(), "opened completion store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), TourError> {
        let text = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, text).map_err(|err| {
            TourError::Storage(format!("writing {}: {err}", self.path.display()))
        })
    }
}

impl CompletionStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, TourError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TourError> {
        let mut entries = self.lock();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), TourError> {
        let mut entries = self.lock();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}
