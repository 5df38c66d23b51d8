//! Directory-backed storage host.
//!
//! Each key lives in `<dir>/<key>.json`. Writes go through a temporary file in
//! the same directory followed by a rename, so readers in other processes see
//! the old document or the new one and never a torn write. Processes sharing a
//! directory behave like browser tabs sharing one storage scope: last write
//! wins and the only change signal between them is [`StorageWatcher`].

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::bus::StorageEvent;

use super::{KeyValueStorage, StorageError};

/// Storage persisted as one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] when the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();

        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;

        Ok(Self { dir })
    }

    /// Directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Watch `keys` for writes made by other storage handles on this directory.
    pub fn watch(&self, keys: &[&str]) -> StorageWatcher {
        StorageWatcher::new(self.clone(), keys)
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        is_valid_key(key).then(|| self.dir.join(format!("{key}.json")))
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn invalid_key(key: &str) -> StorageError {
    StorageError::Unavailable(format!("unsupported key `{key}`"))
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => {
                debug!(key, %error, "unreadable storage file treated as absent");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key).ok_or_else(|| invalid_key(key))?;

        let io_error = |source: io::Error| StorageError::Io {
            key: key.to_string(),
            source,
        };

        let mut file = NamedTempFile::new_in(&self.dir).map_err(io_error)?;
        file.write_all(value.as_bytes()).map_err(io_error)?;
        file.as_file().sync_all().map_err(io_error)?;
        file.persist(&path).map_err(|error| io_error(error.error))?;

        trace!(key, bytes = value.len(), "storage key written");

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key).ok_or_else(|| invalid_key(key))?;

        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// Polls a [`FileStorage`] directory and reports keys whose contents changed.
///
/// Delivery is best effort: two writes between polls collapse into one event,
/// and a write that restores the previously seen document is not reported.
/// Writes made through this process's own handle are reported too.
#[derive(Debug)]
pub struct StorageWatcher {
    storage: FileStorage,
    seen: FxHashMap<String, Option<String>>,
}

impl StorageWatcher {
    fn new(storage: FileStorage, keys: &[&str]) -> Self {
        let seen = keys
            .iter()
            .map(|key| ((*key).to_string(), storage.get_item(key)))
            .collect();

        Self { storage, seen }
    }

    /// Check every watched key once, returning one event per changed key.
    pub fn poll(&mut self) -> Vec<StorageEvent> {
        let mut events = Vec::new();

        for (key, last) in &mut self.seen {
            let current = self.storage.get_item(key);

            if current != *last {
                debug!(key = key.as_str(), "external storage change detected");
                events.push(StorageEvent::for_key(key.clone()));
                *last = current;
            }
        }

        events.sort_by(|a, b| a.key.cmp(&b.key));

        events
    }
}
