//! Saved client state.
//!
//! State lives in one JSON object document. Each concern owns a top-level key
//! so the location, filters and bookmarks can be read and written
//! independently:
//!
//! ```json
//! {
//!   "locationObject": { "latitude": 43.85, "longitude": -79.43, "locationString": "Richmond Hill, ON" },
//!   "searchFilters": { "radiusMeters": 5000, "price": "moderate" },
//!   "bookmarks": ["kinton-ramen-toronto"]
//! }
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use localeats_core::LocationObject;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StorageError;

pub const LOCATION_KEY: &str = "locationObject";
pub const FILTERS_KEY: &str = "searchFilters";
pub const BOOKMARKS_KEY: &str = "bookmarks";

/// Where the resolver persists the submitted location.
pub trait LocationStorage: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read or holds
    /// something that is not a location.
    fn load(&self) -> Result<Option<LocationObject>, StorageError>;

    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn save(&self, location: &LocationObject) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn clear(&self) -> Result<(), StorageError>;
}

/// JSON state document on disk. A missing or empty file reads as `{}`.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file exists but cannot be read and
    /// [`StorageError::Json`] if the document or the value under `key` is
    /// malformed.
    pub fn read_key<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let mut document = self.read_document()?;
        document
            .remove(key)
            .map(|value| serde_json::from_value(value).map_err(|e| self.json_error(e)))
            .transpose()
    }

    /// # Errors
    ///
    /// Returns [`StorageError`] if the document cannot be read back or written.
    pub fn write_key<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let mut document = self.read_document()?;
        let value = serde_json::to_value(value).map_err(|e| self.json_error(e))?;
        document.insert(key.to_owned(), value);
        self.write_document(&document)
    }

    /// Removing a key that is not there is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document cannot be read back or written.
    pub fn remove_key(&self, key: &str) -> Result<(), StorageError> {
        let mut document = self.read_document()?;
        if document.remove(key).is_some() {
            self.write_document(&document)?;
        }
        Ok(())
    }

    fn read_document(&self) -> Result<Map<String, Value>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&raw).map_err(|e| self.json_error(e))
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let raw = serde_json::to_string_pretty(document).map_err(|e| self.json_error(e))?;
        std::fs::write(&self.path, raw).map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn json_error(&self, source: serde_json::Error) -> StorageError {
        StorageError::Json {
            path: self.path.clone(),
            source,
        }
    }
}

impl LocationStorage for StateFile {
    fn load(&self) -> Result<Option<LocationObject>, StorageError> {
        self.read_key(LOCATION_KEY)
    }

    fn save(&self, location: &LocationObject) -> Result<(), StorageError> {
        self.write_key(LOCATION_KEY, location)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.remove_key(LOCATION_KEY)
    }
}

/// In-process storage for tests and sessions that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    location: Mutex<Option<LocationObject>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn with_location(location: LocationObject) -> Self {
        Self {
            location: Mutex::new(Some(location)),
        }
    }
}

impl LocationStorage for MemoryStorage {
    fn load(&self) -> Result<Option<LocationObject>, StorageError> {
        Ok(self
            .location
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, location: &LocationObject) -> Result<(), StorageError> {
        *self.location.lock().unwrap_or_else(PoisonError::into_inner) = Some(location.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.location.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
